// SPDX-License-Identifier: MIT OR Apache-2.0
//! Outbound cue events and the sink that receives them.
//!
//! Cue objects never touch a renderer, mixer or physics world directly. They
//! describe what should happen as [`CueEvent`]s and hand them to whatever
//! [`CueSink`] the caller supplied for the tick.

use crate::descriptor::CueId;
use serde::Serialize;

/// Instruction from a cue to the outside world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CueEvent {
    /// Camera takes control
    CameraActivated {
        /// Source cue
        cue: CueId,
        /// Initial position
        position: [f32; 3],
        /// Field of view (degrees)
        fov: f32,
    },
    /// Camera moved to a new position
    CameraMoved {
        /// Source cue
        cue: CueId,
        /// New position
        position: [f32; 3],
    },
    /// Camera control released
    CameraReleased {
        /// Source cue
        cue: CueId,
    },
    /// Attack volume registered with the collision world
    HitboxRegistered {
        /// Source cue
        cue: CueId,
        /// Bone the volume follows
        bone: String,
        /// Volume extents
        size: [f32; 3],
    },
    /// Attack connected
    HitLanded {
        /// Source cue
        cue: CueId,
        /// Frame of the hit
        frame: u32,
        /// Damage dealt
        damage: u16,
    },
    /// Attack volume removed
    HitboxCleared {
        /// Source cue
        cue: CueId,
    },
    /// Effect instance spawned
    EffectSpawned {
        /// Source cue
        cue: CueId,
        /// Effect asset name
        effect: String,
        /// Attachment bone
        bone: String,
    },
    /// Total particle bursts emitted so far changed
    ParticlesEmitted {
        /// Source cue
        cue: CueId,
        /// Bursts emitted since activation
        total: u32,
    },
    /// Effect instance removed
    EffectDestroyed {
        /// Source cue
        cue: CueId,
        /// Spawned particles outlive the effect
        detached: bool,
    },
    /// Voice opened
    SoundStarted {
        /// Source cue
        cue: CueId,
        /// Sound bank
        bank: String,
        /// Cue number inside the bank
        cue_number: u32,
        /// Playback volume
        volume: f32,
    },
    /// Voice cut
    SoundStopped {
        /// Source cue
        cue: CueId,
    },
    /// Voice left to ring out
    SoundReleased {
        /// Source cue
        cue: CueId,
    },
    /// Scripted function invoked
    FunctionCalled {
        /// Source cue
        cue: CueId,
        /// Function name
        function: String,
        /// Positional arguments
        arguments: Vec<f32>,
    },
}

impl CueEvent {
    /// Cue that emitted this event
    pub fn cue(&self) -> CueId {
        match self {
            Self::CameraActivated { cue, .. }
            | Self::CameraMoved { cue, .. }
            | Self::CameraReleased { cue }
            | Self::HitboxRegistered { cue, .. }
            | Self::HitLanded { cue, .. }
            | Self::HitboxCleared { cue }
            | Self::EffectSpawned { cue, .. }
            | Self::ParticlesEmitted { cue, .. }
            | Self::EffectDestroyed { cue, .. }
            | Self::SoundStarted { cue, .. }
            | Self::SoundStopped { cue }
            | Self::SoundReleased { cue }
            | Self::FunctionCalled { cue, .. } => *cue,
        }
    }

    /// Short event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraActivated { .. } => "CameraActivated",
            Self::CameraMoved { .. } => "CameraMoved",
            Self::CameraReleased { .. } => "CameraReleased",
            Self::HitboxRegistered { .. } => "HitboxRegistered",
            Self::HitLanded { .. } => "HitLanded",
            Self::HitboxCleared { .. } => "HitboxCleared",
            Self::EffectSpawned { .. } => "EffectSpawned",
            Self::ParticlesEmitted { .. } => "ParticlesEmitted",
            Self::EffectDestroyed { .. } => "EffectDestroyed",
            Self::SoundStarted { .. } => "SoundStarted",
            Self::SoundStopped { .. } => "SoundStopped",
            Self::SoundReleased { .. } => "SoundReleased",
            Self::FunctionCalled { .. } => "FunctionCalled",
        }
    }
}

/// Receiver of cue events (renderer, mixer, gameplay bridge)
pub trait CueSink {
    /// Handle one event emitted while the timeline clock was at `frame`
    fn emit(&mut self, frame: u32, event: CueEvent);
}

impl CueSink for Vec<CueEvent> {
    fn emit(&mut self, _frame: u32, event: CueEvent) {
        self.push(event);
    }
}

impl CueSink for Vec<(u32, CueEvent)> {
    fn emit(&mut self, frame: u32, event: CueEvent) {
        self.push((frame, event));
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CueSink for NullSink {
    fn emit(&mut self, _frame: u32, _event: CueEvent) {}
}
