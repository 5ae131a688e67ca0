// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera cue: takes the camera for its window and glides between two
//! positions.

use crate::cue::{CueContext, CueObject};
use crate::descriptor::{CameraPayload, CueDescriptor, CuePayload};
use crate::event::CueEvent;
use crate::interpolation::Interpolation;
use std::sync::Arc;

/// Live camera cue
#[derive(Debug)]
pub struct CameraCue {
    descriptor: Arc<CueDescriptor>,
    payload: CameraPayload,
    /// Last position sent out, `None` while inactive
    position: Option<[f32; 3]>,
}

impl CameraCue {
    /// Build from a camera descriptor
    pub fn from_descriptor(descriptor: Arc<CueDescriptor>) -> Option<Self> {
        let CuePayload::Camera(payload) = descriptor.payload() else {
            return None;
        };
        let payload = payload.clone();
        Some(Self {
            descriptor,
            payload,
            position: None,
        })
    }

    /// Camera position on `frame`
    pub fn position_at(&self, frame: u32) -> [f32; 3] {
        let progress = self.descriptor.window().progress(frame);
        let t = self.payload.interpolation.apply(progress);
        Interpolation::lerp_vec3(self.payload.from, self.payload.to, t)
    }

    /// Last position sent out
    pub fn position(&self) -> Option<[f32; 3]> {
        self.position
    }
}

impl CueObject for CameraCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(self.position.is_none(), "camera cue played twice");
        let position = self.position_at(ctx.current_frame());
        self.position = Some(position);
        ctx.emit(CueEvent::CameraActivated {
            cue: self.descriptor.id(),
            position,
            fov: self.payload.fov,
        });
    }

    fn seek(&mut self, frame: u32, ctx: &mut CueContext<'_>) {
        let position = self.position_at(frame);
        if self.position == Some(position) {
            return;
        }
        self.position = Some(position);
        ctx.emit(CueEvent::CameraMoved {
            cue: self.descriptor.id(),
            position,
        });
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        debug_assert!(self.position.is_some(), "camera cue stopped while inactive");
        self.position = None;
        ctx.emit(CueEvent::CameraReleased {
            cue: self.descriptor.id(),
        });
    }
}
