// SPDX-License-Identifier: MIT OR Apache-2.0
//! The runtime cue contract.
//!
//! A [`CueObject`] is the live materialization of one descriptor while the
//! owning timeline's clock sits inside the descriptor's window. Cue objects
//! never own or store their timeline; every call receives a borrowed,
//! read-only [`TimelineView`] instead.

use crate::descriptor::CueDescriptor;
use crate::event::{CueEvent, CueSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Gameplay state of the character or object driving a timeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceState {
    /// Current owner state id (e.g. standing, airborne, guard broken)
    pub owner_state: u32,
    /// Whether an attack volume of this instance currently touches a target
    pub target_contact: bool,
}

/// Read-only view of the parent timeline
#[derive(Debug, Clone, Copy)]
pub struct TimelineView<'a> {
    current_frame: u32,
    state: &'a InstanceState,
}

impl<'a> TimelineView<'a> {
    /// Create a view
    pub fn new(current_frame: u32, state: &'a InstanceState) -> Self {
        Self {
            current_frame,
            state,
        }
    }

    /// The timeline clock
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Gameplay state of the owner
    pub fn state(&self) -> &'a InstanceState {
        self.state
    }
}

/// Per-call context: the timeline view plus the outbound sink
pub struct CueContext<'a> {
    timeline: TimelineView<'a>,
    sink: &'a mut dyn CueSink,
}

impl<'a> CueContext<'a> {
    /// Create a context
    pub fn new(timeline: TimelineView<'a>, sink: &'a mut dyn CueSink) -> Self {
        Self { timeline, sink }
    }

    /// The parent timeline
    pub fn timeline(&self) -> TimelineView<'a> {
        self.timeline
    }

    /// The timeline clock
    pub fn current_frame(&self) -> u32 {
        self.timeline.current_frame
    }

    /// Send an event to the outside world
    pub fn emit(&mut self, event: CueEvent) {
        self.sink.emit(self.timeline.current_frame, event);
    }
}

/// Lifecycle contract shared by every cue kind.
///
/// The owning timeline guarantees the call order
/// `play` -> `seek`* -> `stop`, each `play` and `stop` exactly once per
/// object. Objects are built only for frames inside their window.
pub trait CueObject: fmt::Debug + Send {
    /// The descriptor this object materializes
    fn descriptor(&self) -> &Arc<CueDescriptor>;

    /// One-time activation side effects
    fn play(&mut self, ctx: &mut CueContext<'_>);

    /// Per-frame update for every live frame after activation.
    ///
    /// Must be a function of `frame` and previously seen frames only, and
    /// safe to call repeatedly with the same frame.
    fn seek(&mut self, frame: u32, ctx: &mut CueContext<'_>) {
        let _ = (frame, ctx);
    }

    /// Reverse the activation side effects
    fn stop(&mut self, ctx: &mut CueContext<'_>);

    /// Extra invalidation beyond the frame window
    fn is_context_valid(&self, timeline: TimelineView<'_>) -> bool {
        let _ = timeline;
        true
    }

    /// Window check against the parent clock, recomputed on every call
    fn is_valid_for_current_frame(&self, timeline: TimelineView<'_>) -> bool {
        self.descriptor().is_valid_for(timeline.current_frame())
    }
}
