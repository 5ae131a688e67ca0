// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sound cue.

use crate::cue::{CueContext, CueObject};
use crate::descriptor::{CueDescriptor, CuePayload, SoundPayload};
use crate::event::CueEvent;
use std::sync::Arc;

/// Live sound cue. Opens one voice on activation and either cuts it or lets
/// it ring out on deactivation.
#[derive(Debug)]
pub struct SoundCue {
    descriptor: Arc<CueDescriptor>,
    payload: SoundPayload,
    playing: bool,
}

impl SoundCue {
    /// Build from a sound descriptor
    pub fn from_descriptor(descriptor: Arc<CueDescriptor>) -> Option<Self> {
        let CuePayload::Sound(payload) = descriptor.payload() else {
            return None;
        };
        let payload = payload.clone();
        Some(Self {
            descriptor,
            payload,
            playing: false,
        })
    }

    /// Whether the voice is open
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl CueObject for SoundCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(!self.playing, "sound cue played twice");
        self.playing = true;
        ctx.emit(CueEvent::SoundStarted {
            cue: self.descriptor.id(),
            bank: self.payload.bank.clone(),
            cue_number: self.payload.cue_number,
            volume: self.payload.volume,
        });
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(self.playing, "sound cue stopped while inactive");
        self.playing = false;
        let cue = self.descriptor.id();
        if self.payload.stop_on_end {
            ctx.emit(CueEvent::SoundStopped { cue });
        } else {
            ctx.emit(CueEvent::SoundReleased { cue });
        }
    }
}
