// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline instance: the frame clock of one running action and its live
//! cue objects.
//!
//! ## Reconciliation
//!
//! Every [`TimelineInstance::advance_to`] call runs three passes in a fixed
//! order:
//! 1. stop and drop live cues whose window or context became invalid
//! 2. seek the survivors to the new frame
//! 3. build and play cues for descriptors that just became valid
//!
//! Validity is recomputed from the clock on every pass, which is what makes
//! backward seeks and repeated frames behave exactly like forward playback.

use crate::action::Action;
use crate::cue::{CueContext, CueObject, InstanceState, TimelineView};
use crate::descriptor::CueId;
use crate::event::{CueSink, NullSink};
use crate::registry::CueRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a timeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Create a new random instance ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// What one reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Frame the clock was set to
    pub frame: u32,
    /// Cues stopped, in stop order
    pub stopped: Vec<CueId>,
    /// Cues started, in start order
    pub started: Vec<CueId>,
    /// Number of live cues that received a seek
    pub seeked: usize,
}

impl ReconcileReport {
    /// Whether the live set changed
    pub fn changed(&self) -> bool {
        !self.stopped.is_empty() || !self.started.is_empty()
    }
}

/// One running instance of an action
#[derive(Debug)]
pub struct TimelineInstance {
    id: InstanceId,
    action: Arc<Action>,
    registry: Arc<CueRegistry>,
    current_frame: u32,
    /// Set by the first advance, cleared by reset
    synchronized: bool,
    state: InstanceState,
    /// Live cues in activation order
    live: IndexMap<CueId, Box<dyn CueObject>>,
}

impl TimelineInstance {
    /// Create an idle instance at frame 0.
    ///
    /// Nothing is live until the first [`advance_to`](Self::advance_to),
    /// which is normally `advance_to(0)`.
    pub fn new(action: Arc<Action>, registry: Arc<CueRegistry>) -> Self {
        Self {
            id: InstanceId::new(),
            action,
            registry,
            current_frame: 0,
            synchronized: false,
            state: InstanceState::default(),
            live: IndexMap::new(),
        }
    }

    /// Instance id
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The action being played
    pub fn action(&self) -> &Arc<Action> {
        &self.action
    }

    /// The frame clock
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Whether the live set reflects the clock. False for a new or reset
    /// instance until the next [`advance_to`](Self::advance_to)
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Gameplay state seen by context hooks
    pub fn state(&self) -> &InstanceState {
        &self.state
    }

    /// Mutable gameplay state; changes take effect on the next reconciliation
    pub fn state_mut(&mut self) -> &mut InstanceState {
        &mut self.state
    }

    /// Read-only view handed to cue objects
    pub fn view(&self) -> TimelineView<'_> {
        TimelineView::new(self.current_frame, &self.state)
    }

    /// Whether a descriptor currently has a live cue object
    pub fn is_live(&self, cue: CueId) -> bool {
        self.live.contains_key(&cue)
    }

    /// Live cue ids in activation order
    pub fn live_cues(&self) -> impl Iterator<Item = CueId> + '_ {
        self.live.keys().copied()
    }

    /// Live cue object for a descriptor
    pub fn live_cue(&self, cue: CueId) -> Option<&dyn CueObject> {
        self.live.get(&cue).map(|cue| &**cue)
    }

    /// Number of live cues
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Move the clock to `frame` and reconcile the live set
    pub fn advance_to(&mut self, frame: u32, sink: &mut dyn CueSink) -> ReconcileReport {
        self.current_frame = frame;
        self.synchronized = true;
        let mut report = ReconcileReport {
            frame,
            ..ReconcileReport::default()
        };
        let view = TimelineView::new(frame, &self.state);
        let mut ctx = CueContext::new(view, sink);

        let expired: Vec<CueId> = self
            .live
            .iter()
            .filter(|(_, cue)| {
                !(cue.is_valid_for_current_frame(view) && cue.is_context_valid(view))
            })
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            if let Some(mut cue) = self.live.shift_remove(&id) {
                cue.stop(&mut ctx);
                tracing::debug!(cue = %cue.descriptor().name(), frame, "Cue stopped");
                report.stopped.push(id);
            }
        }

        for cue in self.live.values_mut() {
            cue.seek(frame, &mut ctx);
            report.seeked += 1;
        }
        if report.seeked > 0 {
            tracing::trace!(frame, live = report.seeked, "Seeked live cues");
        }

        for descriptor in self.action.valid_at(frame) {
            let id = descriptor.id();
            // A cue stopped in this pass is not recreated in the same pass
            if self.live.contains_key(&id) || report.stopped.contains(&id) {
                continue;
            }
            let mut cue = self.registry.instantiate(descriptor);
            debug_assert!(
                cue.is_valid_for_current_frame(view),
                "cue object built outside its window"
            );
            if !cue.is_context_valid(view) {
                continue;
            }
            cue.play(&mut ctx);
            tracing::debug!(
                cue = %descriptor.name(),
                kind = descriptor.kind().name(),
                frame,
                "Cue started"
            );
            self.live.insert(id, cue);
            report.started.push(id);
        }

        report
    }

    /// Stop every live cue once, clear the set and rewind the clock to 0.
    ///
    /// The instance is idle afterwards, like a new one.
    pub fn reset(&mut self, sink: &mut dyn CueSink) -> Vec<CueId> {
        let view = TimelineView::new(self.current_frame, &self.state);
        let mut ctx = CueContext::new(view, sink);
        let mut stopped = Vec::with_capacity(self.live.len());
        for (id, mut cue) in self.live.drain(..) {
            cue.stop(&mut ctx);
            stopped.push(id);
        }
        if !stopped.is_empty() {
            tracing::debug!(
                instance = ?self.id,
                action = %self.action.name,
                stopped = stopped.len(),
                "Timeline reset"
            );
        }
        self.current_frame = 0;
        self.synchronized = false;
        stopped
    }

    /// Reset and resynchronize at frame 0
    pub fn restart(&mut self, sink: &mut dyn CueSink) -> ReconcileReport {
        let stopped = self.reset(sink);
        let mut report = self.advance_to(0, sink);
        let mut all_stopped = stopped;
        all_stopped.append(&mut report.stopped);
        report.stopped = all_stopped;
        report
    }

    /// End the instance, stopping whatever is still live.
    ///
    /// Required before dropping an instance that may have live cues: `Drop`
    /// has no sink, so their stop events would be lost. Debug builds panic
    /// on such a drop.
    pub fn finish(mut self, sink: &mut dyn CueSink) -> Vec<CueId> {
        self.reset(sink)
    }
}

impl Drop for TimelineInstance {
    fn drop(&mut self) {
        if self.live.is_empty() {
            return;
        }
        tracing::error!(
            instance = ?self.id,
            action = %self.action.name,
            live = self.live.len(),
            "Timeline instance dropped with live cues; call finish() to deliver their stop"
        );
        // Cue objects still see their stop, the events are lost
        let leaked = self.live.len();
        self.reset(&mut NullSink);
        if !std::thread::panicking() {
            debug_assert!(leaked == 0, "timeline instance dropped with {leaked} live cues");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CueDescriptor, CuePayload, SoundPayload};
    use crate::event::CueEvent;

    fn voice_instance() -> (TimelineInstance, CueId) {
        let voice = CueDescriptor::new(
            0,
            10,
            CuePayload::Sound(SoundPayload {
                bank: "CAR_BTL_CMN".into(),
                cue_number: 2,
                ..SoundPayload::default()
            }),
        );
        let id = voice.id();
        let action = Action::from_descriptors("voice", [voice]).unwrap();
        let instance = TimelineInstance::new(Arc::new(action), Arc::new(CueRegistry::default()));
        (instance, id)
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let (first, _) = voice_instance();
        let (second, _) = voice_instance();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_live_cue_lookup() {
        let (mut instance, id) = voice_instance();
        assert!(instance.live_cue(id).is_none());

        instance.advance_to(3, &mut NullSink);
        let live = instance.live_cue(id).unwrap();
        assert_eq!(live.descriptor().id(), id);
        assert_eq!(instance.live_cues().collect::<Vec<_>>(), [id]);

        instance.finish(&mut NullSink);
    }

    #[test]
    fn test_finish_delivers_stop() {
        let (mut instance, id) = voice_instance();
        let mut events: Vec<(u32, CueEvent)> = Vec::new();
        instance.advance_to(0, &mut events);
        instance.advance_to(3, &mut events);

        let stopped = instance.finish(&mut events);
        assert_eq!(stopped, [id]);
        assert_eq!(events.last(), Some(&(3, CueEvent::SoundStopped { cue: id })));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "dropped with 1 live cues")]
    fn test_drop_with_live_cues_panics() {
        let (mut instance, _) = voice_instance();
        instance.advance_to(3, &mut NullSink);
        drop(instance);
    }

    #[test]
    fn test_drop_after_reset_is_quiet() {
        let (mut instance, _) = voice_instance();
        instance.advance_to(3, &mut NullSink);
        instance.reset(&mut NullSink);
        drop(instance);
    }
}
