// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless scenario runner.

use crate::scenario::{Command, Scenario, ScenarioError};
use cuetrack_core::{
    Action, CueEvent, CueRegistry, PlaybackController, PlaybackSettings, TimelineInstance,
};
use serde::Serialize;
use std::sync::Arc;

/// An emitted event with the frame it happened on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameEvent {
    /// Timeline frame at emission
    pub frame: u32,
    /// Name of the emitting cue
    pub cue_name: String,
    /// The event itself
    pub event: CueEvent,
}

impl FrameEvent {
    /// Single-line human readable form
    pub fn describe(&self) -> String {
        let detail = match &self.event {
            CueEvent::CameraActivated { position, fov, .. } => {
                format!("position={position:?} fov={fov}")
            }
            CueEvent::CameraMoved { position, .. } => format!("position={position:?}"),
            CueEvent::HitboxRegistered { bone, size, .. } => format!("bone={bone} size={size:?}"),
            CueEvent::HitLanded { damage, .. } => format!("damage={damage}"),
            CueEvent::EffectSpawned { effect, bone, .. } => format!("effect={effect} bone={bone}"),
            CueEvent::ParticlesEmitted { total, .. } => format!("total={total}"),
            CueEvent::EffectDestroyed { detached, .. } => format!("detached={detached}"),
            CueEvent::SoundStarted {
                bank,
                cue_number,
                volume,
                ..
            } => format!("bank={bank} cue={cue_number} volume={volume}"),
            CueEvent::FunctionCalled {
                function,
                arguments,
                ..
            } => format!("{function}{arguments:?}"),
            CueEvent::CameraReleased { .. }
            | CueEvent::HitboxCleared { .. }
            | CueEvent::SoundStopped { .. }
            | CueEvent::SoundReleased { .. } => String::new(),
        };
        format!(
            "{:>6}  {:<20} {:<18} {}",
            self.frame,
            self.cue_name,
            self.event.name(),
            detail
        )
        .trim_end()
        .to_string()
    }
}

/// Drives one timeline instance through scenario commands
#[derive(Debug)]
pub struct Runner {
    controller: PlaybackController,
    instance: TimelineInstance,
    events: Vec<(u32, CueEvent)>,
}

impl Runner {
    /// Create a runner for an action with the built-in cue kinds
    pub fn new(action: Action, settings: PlaybackSettings) -> Self {
        Self {
            controller: PlaybackController::new(settings),
            instance: TimelineInstance::new(Arc::new(action), Arc::new(CueRegistry::default())),
            events: Vec::new(),
        }
    }

    /// Build a runner from a loaded scenario
    pub fn from_scenario(
        scenario: &Scenario,
        settings: PlaybackSettings,
    ) -> Result<Self, ScenarioError> {
        let mut runner = Self::new(scenario.action.build()?, settings);
        runner.controller.loop_range = scenario.loop_range;
        Ok(runner)
    }

    /// Current frame of the driven instance
    pub fn current_frame(&self) -> u32 {
        self.instance.current_frame()
    }

    /// Apply one command
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::Play(frames) => {
                self.controller.play();
                for _ in 0..frames {
                    if !self.controller.is_playing() {
                        break;
                    }
                    self.controller.step_forward(&mut self.instance, &mut self.events);
                }
            }
            Command::Reverse(frames) => {
                self.controller.play_reverse();
                for _ in 0..frames {
                    if !self.controller.is_playing() {
                        break;
                    }
                    self.controller.step_backward(&mut self.instance, &mut self.events);
                }
            }
            Command::Tick(seconds) => {
                self.controller.update(seconds, &mut self.instance, &mut self.events);
            }
            Command::Seek(frame) => {
                self.controller.seek(frame, &mut self.instance, &mut self.events);
            }
            Command::Step => {
                self.controller.step_forward(&mut self.instance, &mut self.events);
            }
            Command::Pause => self.controller.pause(),
            Command::OwnerState(state) => self.instance.state_mut().owner_state = state,
            Command::Contact(contact) => self.instance.state_mut().target_contact = contact,
            Command::Restart => {
                self.instance.restart(&mut self.events);
            }
            Command::Stop => {
                self.controller.stop(&mut self.instance, &mut self.events);
            }
        }
        tracing::debug!(
            ?command,
            frame = self.instance.current_frame(),
            state = ?self.controller.state,
            live = self.instance.live_count(),
            "Applied command"
        );
    }

    /// Stop whatever is still live and return every event in emission order
    pub fn finish(self) -> Vec<FrameEvent> {
        let Self {
            instance,
            mut events,
            ..
        } = self;
        let action = Arc::clone(instance.action());
        instance.finish(&mut events);

        events
            .into_iter()
            .map(|(frame, event)| FrameEvent {
                frame,
                cue_name: action
                    .cue(event.cue())
                    .map(|cue| cue.name().to_string())
                    .unwrap_or_default(),
                event,
            })
            .collect()
    }
}

/// Run a whole scenario
pub fn run(
    scenario: &Scenario,
    settings: PlaybackSettings,
) -> Result<Vec<FrameEvent>, ScenarioError> {
    let mut runner = Runner::from_scenario(scenario, settings)?;
    for command in &scenario.script {
        runner.apply(command);
    }
    tracing::info!(
        action = %scenario.action.name,
        commands = scenario.script.len(),
        frame = runner.current_frame(),
        "Scenario finished"
    );
    Ok(runner.finish())
}
