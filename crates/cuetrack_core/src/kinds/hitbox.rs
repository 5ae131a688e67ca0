// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hitbox cue: an attack volume that lands hits while the owner touches a
//! target.

use crate::cue::{CueContext, CueObject, TimelineView};
use crate::descriptor::{CueDescriptor, CuePayload, HitboxPayload};
use crate::event::CueEvent;
use std::sync::Arc;

/// Live hitbox cue
#[derive(Debug)]
pub struct HitboxCue {
    descriptor: Arc<CueDescriptor>,
    payload: HitboxPayload,
    registered: bool,
    hits: u32,
    last_hit_frame: Option<u32>,
}

impl HitboxCue {
    /// Build from a hitbox descriptor
    pub fn from_descriptor(descriptor: Arc<CueDescriptor>) -> Option<Self> {
        let CuePayload::Hitbox(payload) = descriptor.payload() else {
            return None;
        };
        let payload = payload.clone();
        Some(Self {
            descriptor,
            payload,
            registered: false,
            hits: 0,
            last_hit_frame: None,
        })
    }

    /// Hits landed during this activation
    pub fn hits(&self) -> u32 {
        self.hits
    }

    fn resolve_contact(&mut self, frame: u32, ctx: &mut CueContext<'_>) {
        if !ctx.timeline().state().target_contact {
            return;
        }
        // One hit per frame, one hit per activation for single-hit volumes
        if self.last_hit_frame == Some(frame) || (self.payload.single_hit && self.hits > 0) {
            return;
        }
        self.hits += 1;
        self.last_hit_frame = Some(frame);
        ctx.emit(CueEvent::HitLanded {
            cue: self.descriptor.id(),
            frame,
            damage: self.payload.damage,
        });
    }
}

impl CueObject for HitboxCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(!self.registered, "hitbox cue played twice");
        self.registered = true;
        ctx.emit(CueEvent::HitboxRegistered {
            cue: self.descriptor.id(),
            bone: self.payload.bone.clone(),
            size: self.payload.size,
        });
        let frame = ctx.current_frame();
        self.resolve_contact(frame, ctx);
    }

    fn seek(&mut self, frame: u32, ctx: &mut CueContext<'_>) {
        self.resolve_contact(frame, ctx);
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(self.registered, "hitbox cue stopped while inactive");
        self.registered = false;
        ctx.emit(CueEvent::HitboxCleared {
            cue: self.descriptor.id(),
        });
    }

    fn is_context_valid(&self, timeline: TimelineView<'_>) -> bool {
        self.payload
            .required_owner_state
            .map_or(true, |required| timeline.state().owner_state == required)
    }
}
