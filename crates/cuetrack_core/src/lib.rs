// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-accurate cue simulation.
//!
//! This crate decides, frame by frame, which time-bounded cues of an action
//! exist, and drives their lifecycles:
//! - Camera cues
//! - Hitbox cues
//! - Particle effect cues
//! - Sound cues
//! - Function call cues
//!
//! ## Architecture
//!
//! The simulation is built on:
//! - Immutable descriptors with half-open activation windows
//! - Actions sharing descriptor lists between instances
//! - Timeline instances owning the frame clock and the live cue set
//! - A registry mapping cue kinds to runtime logic
//! - Playback control
//!
//! Cue objects talk to the outside world only through [`CueSink`].

pub mod action;
pub mod cue;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod instance;
pub mod interpolation;
pub mod kinds;
pub mod playback;
pub mod registry;

pub use action::{Action, ActionId};
pub use cue::{CueContext, CueObject, InstanceState, TimelineView};
pub use descriptor::{
    ActivationWindow, CameraPayload, CueDescriptor, CueId, CueKind, CuePayload, EffectPayload,
    FunctionPayload, HitboxPayload, RawCueDescriptor, SoundPayload,
};
pub use error::{ActionError, DescriptorError};
pub use event::{CueEvent, CueSink, NullSink};
pub use instance::{InstanceId, ReconcileReport, TimelineInstance};
pub use interpolation::{Interpolation, InterpolationMode};
pub use kinds::{CameraCue, EffectCue, FunctionCue, HitboxCue, InertCue, SoundCue};
pub use playback::{FrameRange, PlaybackController, PlaybackSettings, PlaybackState};
pub use registry::{CueFactory, CueRegistry};
