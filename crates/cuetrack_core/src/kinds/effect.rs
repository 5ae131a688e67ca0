// SPDX-License-Identifier: MIT OR Apache-2.0
//! Particle effect cue.

use crate::cue::{CueContext, CueObject};
use crate::descriptor::{CueDescriptor, CuePayload, EffectPayload};
use crate::event::CueEvent;
use std::sync::Arc;

/// Live particle effect cue.
///
/// The emitted burst count is derived from the frame alone, so scrubbing
/// backwards inside the window rewinds it.
#[derive(Debug)]
pub struct EffectCue {
    descriptor: Arc<CueDescriptor>,
    payload: EffectPayload,
    /// Bursts emitted so far, 0 while inactive
    emitted: u32,
}

impl EffectCue {
    /// Build from an effect descriptor
    pub fn from_descriptor(descriptor: Arc<CueDescriptor>) -> Option<Self> {
        let CuePayload::Effect(payload) = descriptor.payload() else {
            return None;
        };
        let payload = payload.clone();
        Some(Self {
            descriptor,
            payload,
            emitted: 0,
        })
    }

    /// Bursts that have fired by `frame`
    pub fn bursts_at(&self, frame: u32) -> u32 {
        if self.payload.spawn_interval == 0 {
            return 1;
        }
        let offset = frame.saturating_sub(self.descriptor.start_time());
        offset / self.payload.spawn_interval + 1
    }

    /// Bursts emitted so far
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl CueObject for EffectCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert_eq!(self.emitted, 0, "effect cue played twice");
        let id = self.descriptor.id();
        ctx.emit(CueEvent::EffectSpawned {
            cue: id,
            effect: self.payload.effect.clone(),
            bone: self.payload.bone.clone(),
        });
        self.emitted = self.bursts_at(ctx.current_frame());
        ctx.emit(CueEvent::ParticlesEmitted {
            cue: id,
            total: self.emitted,
        });
    }

    fn seek(&mut self, frame: u32, ctx: &mut CueContext<'_>) {
        let total = self.bursts_at(frame);
        if total == self.emitted {
            return;
        }
        self.emitted = total;
        ctx.emit(CueEvent::ParticlesEmitted {
            cue: self.descriptor.id(),
            total,
        });
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(self.emitted > 0, "effect cue stopped while inactive");
        self.emitted = 0;
        ctx.emit(CueEvent::EffectDestroyed {
            cue: self.descriptor.id(),
            detached: self.payload.detach_on_stop,
        });
    }
}
