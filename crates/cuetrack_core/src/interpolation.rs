// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interpolation helpers used by continuously updating cue kinds.

use serde::{Deserialize, Serialize};

/// How a cue blends between its start and end values over its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Hold the start value for the whole window
    Constant,
    /// Linear interpolation
    #[default]
    Linear,
    /// Smoothstep ease in/out
    EaseInOut,
}

impl InterpolationMode {
    /// Remap a linear progress value in `[0, 1]` through this mode
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Constant => 0.0,
            Self::Linear => t,
            Self::EaseInOut => Interpolation::smoothstep(t),
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Hermite smoothstep on `[0, 1]`
    pub fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }
}
