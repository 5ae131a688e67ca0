// SPDX-License-Identifier: MIT OR Apache-2.0
//! Function call cue: fires a scripted function once per activation.

use crate::cue::{CueContext, CueObject};
use crate::descriptor::{CueDescriptor, CuePayload, FunctionPayload};
use crate::event::CueEvent;
use std::sync::Arc;

/// Live function call cue
#[derive(Debug)]
pub struct FunctionCue {
    descriptor: Arc<CueDescriptor>,
    payload: FunctionPayload,
    called: bool,
}

impl FunctionCue {
    /// Build from a function descriptor
    pub fn from_descriptor(descriptor: Arc<CueDescriptor>) -> Option<Self> {
        let CuePayload::Function(payload) = descriptor.payload() else {
            return None;
        };
        let payload = payload.clone();
        Some(Self {
            descriptor,
            payload,
            called: false,
        })
    }
}

impl CueObject for FunctionCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(!self.called, "function cue played twice");
        self.called = true;
        ctx.emit(CueEvent::FunctionCalled {
            cue: self.descriptor.id(),
            function: self.payload.function.clone(),
            arguments: self.payload.arguments.clone(),
        });
    }

    // Calls are fire-and-forget; there is nothing to undo.
    fn stop(&mut self, _ctx: &mut CueContext<'_>) {
        debug_assert!(self.called, "function cue stopped while inactive");
        self.called = false;
        tracing::trace!(function = %self.payload.function, "function cue ended");
    }
}
