// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in cue kinds.

mod camera;
mod effect;
mod function;
mod hitbox;
mod sound;

pub use camera::CameraCue;
pub use effect::EffectCue;
pub use function::FunctionCue;
pub use hitbox::HitboxCue;
pub use sound::SoundCue;

use crate::cue::{CueContext, CueObject};
use crate::descriptor::CueDescriptor;
use std::sync::Arc;

/// Cue with no side effects. Used for markers and for kinds without
/// registered logic; it still follows the full lifecycle.
#[derive(Debug)]
pub struct InertCue {
    descriptor: Arc<CueDescriptor>,
    active: bool,
}

impl InertCue {
    /// Wrap any descriptor
    pub fn new(descriptor: Arc<CueDescriptor>) -> Self {
        Self {
            descriptor,
            active: false,
        }
    }
}

impl CueObject for InertCue {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, _ctx: &mut CueContext<'_>) {
        debug_assert!(!self.active, "inert cue played twice");
        self.active = true;
    }

    fn stop(&mut self, _ctx: &mut CueContext<'_>) {
        debug_assert!(self.active, "inert cue stopped while inactive");
        self.active = false;
    }
}
