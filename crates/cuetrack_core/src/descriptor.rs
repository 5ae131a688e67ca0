// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cue descriptors: immutable, schedulable cue data.
//!
//! A descriptor only says *when* a cue exists (its activation window) and
//! carries an opaque payload for the kind-specific logic. Descriptors are
//! validated once, at load time, through [`RawCueDescriptor`].

use crate::error::DescriptorError;
use crate::interpolation::InterpolationMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a cue descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CueId(pub Uuid);

impl CueId {
    /// Create a new random cue ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CueId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of cue, used to pick the registered runtime logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueKind {
    /// Camera placement and motion
    Camera,
    /// Attack volume
    Hitbox,
    /// Particle effect
    Effect,
    /// Sound playback
    Sound,
    /// Scripted function call
    Function,
    /// Payload-less timing marker
    Marker,
}

impl CueKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Camera => "Camera",
            Self::Hitbox => "Hitbox",
            Self::Effect => "Effect",
            Self::Sound => "Sound",
            Self::Function => "Function",
            Self::Marker => "Marker",
        }
    }

    /// All cue kinds
    pub fn all() -> &'static [CueKind] {
        &[
            Self::Camera,
            Self::Hitbox,
            Self::Effect,
            Self::Sound,
            Self::Function,
            Self::Marker,
        ]
    }
}

/// Half-open frame interval `[start, start + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivationWindow {
    /// First valid frame
    pub start: u32,
    /// Number of valid frames
    pub duration: u32,
}

impl ActivationWindow {
    /// Create a window
    pub fn new(start: u32, duration: u32) -> Self {
        Self { start, duration }
    }

    /// First frame past the window
    pub fn end(&self) -> u64 {
        u64::from(self.start) + u64::from(self.duration)
    }

    /// Whether `frame` lies inside the window
    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start && frame - self.start < self.duration
    }

    /// Zero-length windows never contain any frame
    pub fn is_empty(&self) -> bool {
        self.duration == 0
    }

    /// Frames elapsed since the window opened, if `frame` is inside it
    pub fn offset_of(&self, frame: u32) -> Option<u32> {
        self.contains(frame).then(|| frame - self.start)
    }

    /// Linear progress of `frame` through the window, `0.0` on the first
    /// frame and `1.0` on the last
    pub fn progress(&self, frame: u32) -> f32 {
        let Some(offset) = self.offset_of(frame) else {
            return if frame < self.start { 0.0 } else { 1.0 };
        };
        if self.duration <= 1 {
            return 1.0;
        }
        offset as f32 / (self.duration - 1) as f32
    }
}

/// Camera cue payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPayload {
    /// Camera position on the first frame
    pub from: [f32; 3],
    /// Camera position on the last frame
    pub to: [f32; 3],
    /// Field of view (degrees)
    pub fov: f32,
    /// Blend between `from` and `to`
    pub interpolation: InterpolationMode,
}

impl Default for CameraPayload {
    fn default() -> Self {
        Self {
            from: [0.0; 3],
            to: [0.0; 3],
            fov: 40.0,
            interpolation: InterpolationMode::Linear,
        }
    }
}

/// Hitbox cue payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxPayload {
    /// Bone the volume follows
    pub bone: String,
    /// Volume extents
    pub size: [f32; 3],
    /// Damage per landed hit
    pub damage: u16,
    /// Land at most one hit per activation
    pub single_hit: bool,
    /// Owner state the hitbox is bound to; the cue ends early when the
    /// owner leaves it
    pub required_owner_state: Option<u32>,
}

impl Default for HitboxPayload {
    fn default() -> Self {
        Self {
            bone: String::from("b_C_Base"),
            size: [1.0; 3],
            damage: 0,
            single_hit: true,
            required_owner_state: None,
        }
    }
}

/// Particle effect cue payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectPayload {
    /// Effect asset name
    pub effect: String,
    /// Attachment bone
    pub bone: String,
    /// Frames between particle bursts (0 = single burst)
    pub spawn_interval: u32,
    /// Leave spawned particles alive when the cue stops
    pub detach_on_stop: bool,
}

/// Sound cue payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPayload {
    /// Sound bank name
    pub bank: String,
    /// Cue number inside the bank
    pub cue_number: u32,
    /// Playback volume
    pub volume: f32,
    /// Cut the voice when the cue ends instead of letting it ring out
    pub stop_on_end: bool,
}

impl Default for SoundPayload {
    fn default() -> Self {
        Self {
            bank: String::new(),
            cue_number: 0,
            volume: 1.0,
            stop_on_end: true,
        }
    }
}

/// Function call cue payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionPayload {
    /// Function name
    pub function: String,
    /// Positional arguments
    pub arguments: Vec<f32>,
}

/// Kind-specific descriptor data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CuePayload {
    /// Camera cue
    Camera(CameraPayload),
    /// Hitbox cue
    Hitbox(HitboxPayload),
    /// Particle effect cue
    Effect(EffectPayload),
    /// Sound cue
    Sound(SoundPayload),
    /// Function call cue
    Function(FunctionPayload),
    /// No payload
    #[default]
    Marker,
}

impl CuePayload {
    /// Kind of this payload
    pub fn kind(&self) -> CueKind {
        match self {
            Self::Camera(_) => CueKind::Camera,
            Self::Hitbox(_) => CueKind::Hitbox,
            Self::Effect(_) => CueKind::Effect,
            Self::Sound(_) => CueKind::Sound,
            Self::Function(_) => CueKind::Function,
            Self::Marker => CueKind::Marker,
        }
    }
}

/// A validated, immutable cue descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCueDescriptor")]
pub struct CueDescriptor {
    id: CueId,
    name: String,
    start_time: u32,
    duration: u32,
    payload: CuePayload,
}

impl CueDescriptor {
    /// Create a descriptor named after its kind
    pub fn new(start_time: u32, duration: u32, payload: CuePayload) -> Self {
        Self {
            id: CueId::new(),
            name: payload.kind().name().to_string(),
            start_time,
            duration,
            payload,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set an explicit id
    pub fn with_id(mut self, id: CueId) -> Self {
        self.id = id;
        self
    }

    /// Descriptor id
    pub fn id(&self) -> CueId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Activation frame
    pub fn start_time(&self) -> u32 {
        self.start_time
    }

    /// Length of the activation window in frames
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Kind-specific payload
    pub fn payload(&self) -> &CuePayload {
        &self.payload
    }

    /// Kind of cue
    pub fn kind(&self) -> CueKind {
        self.payload.kind()
    }

    /// The activation window
    pub fn window(&self) -> ActivationWindow {
        ActivationWindow::new(self.start_time, self.duration)
    }

    /// Whether this cue must exist on `frame`
    pub fn is_valid_for(&self, frame: u32) -> bool {
        self.window().contains(frame)
    }
}

/// Unvalidated descriptor as handed over by a loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCueDescriptor {
    /// Descriptor id, random when omitted
    #[serde(default)]
    pub id: CueId,
    /// Display name, the kind name when empty
    #[serde(default)]
    pub name: String,
    /// Activation frame
    pub start_time: i64,
    /// Window length in frames
    pub duration: i64,
    /// Kind-specific data
    #[serde(default)]
    pub payload: CuePayload,
}

impl TryFrom<RawCueDescriptor> for CueDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawCueDescriptor) -> Result<Self, Self::Error> {
        if raw.start_time < 0 {
            return Err(DescriptorError::NegativeStartTime(raw.start_time));
        }
        if raw.duration < 0 {
            return Err(DescriptorError::NegativeDuration(raw.duration));
        }
        let start_time = u32::try_from(raw.start_time)
            .map_err(|_| DescriptorError::StartTimeOutOfRange(raw.start_time))?;
        let window_end = raw.start_time.checked_add(raw.duration);
        let duration = match window_end {
            Some(end) if end <= i64::from(u32::MAX) => raw.duration as u32,
            _ => {
                return Err(DescriptorError::WindowOverflow {
                    start: raw.start_time,
                    duration: raw.duration,
                })
            }
        };

        let name = if raw.name.is_empty() {
            raw.payload.kind().name().to_string()
        } else {
            raw.name
        };

        Ok(Self {
            id: raw.id,
            name,
            start_time,
            duration,
            payload: raw.payload,
        })
    }
}

impl From<&CueDescriptor> for RawCueDescriptor {
    fn from(descriptor: &CueDescriptor) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name.clone(),
            start_time: i64::from(descriptor.start_time),
            duration: i64::from(descriptor.duration),
            payload: descriptor.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start_time: i64, duration: i64) -> RawCueDescriptor {
        RawCueDescriptor {
            id: CueId::new(),
            name: String::new(),
            start_time,
            duration,
            payload: CuePayload::Marker,
        }
    }

    #[test]
    fn test_window_boundaries() {
        let window = ActivationWindow::new(10, 5);
        assert!(!window.contains(9));
        for frame in 10..15 {
            assert!(window.contains(frame), "frame {frame} should be inside");
        }
        assert!(!window.contains(15));
        assert_eq!(window.end(), 15);
    }

    #[test]
    fn test_zero_duration_is_never_valid() {
        let window = ActivationWindow::new(10, 0);
        assert!(window.is_empty());
        assert!((0..32).all(|frame| !window.contains(frame)));
    }

    #[test]
    fn test_window_matches_half_open_definition() {
        for start in 0..6u32 {
            for duration in 0..6u32 {
                let window = ActivationWindow::new(start, duration);
                for frame in 0..16u32 {
                    let expected = start <= frame && frame < start + duration;
                    assert_eq!(window.contains(frame), expected, "({start},{duration}) @ {frame}");
                }
            }
        }
    }

    #[test]
    fn test_window_at_top_of_range() {
        let window = ActivationWindow::new(u32::MAX - 1, 1);
        assert!(window.contains(u32::MAX - 1));
        assert!(!window.contains(u32::MAX));
    }

    #[test]
    fn test_progress() {
        let window = ActivationWindow::new(10, 5);
        assert_eq!(window.progress(10), 0.0);
        assert_eq!(window.progress(12), 0.5);
        assert_eq!(window.progress(14), 1.0);
        assert_eq!(window.progress(3), 0.0);
        assert_eq!(window.progress(40), 1.0);
        assert_eq!(ActivationWindow::new(4, 1).progress(4), 1.0);
    }

    #[test]
    fn test_raw_validation() {
        assert_eq!(
            CueDescriptor::try_from(raw(-1, 4)),
            Err(DescriptorError::NegativeStartTime(-1))
        );
        assert_eq!(
            CueDescriptor::try_from(raw(3, -2)),
            Err(DescriptorError::NegativeDuration(-2))
        );
        assert!(matches!(
            CueDescriptor::try_from(raw(i64::from(u32::MAX), 1)),
            Err(DescriptorError::WindowOverflow { .. })
        ));
        assert_eq!(
            CueDescriptor::try_from(raw(i64::from(u32::MAX) + 1, 0)),
            Err(DescriptorError::StartTimeOutOfRange(i64::from(u32::MAX) + 1))
        );

        let descriptor = CueDescriptor::try_from(raw(3, 0)).unwrap();
        assert_eq!(descriptor.start_time(), 3);
        assert_eq!(descriptor.duration(), 0);
        assert_eq!(descriptor.name(), "Marker");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: CueDescriptor = ron::from_str(
            "(start_time: 4, duration: 2, payload: Sound((bank: \"CAR_BTL_CMN\", cue_number: 12)))",
        )
        .unwrap();
        assert_eq!(ok.kind(), CueKind::Sound);
        assert!(ok.is_valid_for(5));
        match ok.payload() {
            CuePayload::Sound(sound) => {
                assert_eq!(sound.cue_number, 12);
                assert!(sound.stop_on_end);
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let err = ron::from_str::<CueDescriptor>("(start_time: -5, duration: 2)").unwrap_err();
        assert!(err.to_string().contains("Negative start time"));
    }

    #[test]
    fn test_serialize_round_trip_keeps_id() {
        let descriptor = CueDescriptor::new(1, 2, CuePayload::Marker).with_name("tick");
        let text = ron::to_string(&descriptor).unwrap();
        let back: CueDescriptor = ron::from_str(&text).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_raw_conversion_keeps_everything() {
        let id = CueId::new();
        let descriptor = CueDescriptor::new(7, 3, CuePayload::Marker)
            .with_name("cancel")
            .with_id(id);
        assert_eq!(descriptor.id(), id);

        let raw = RawCueDescriptor::from(&descriptor);
        assert_eq!(raw.id, id);
        assert_eq!((raw.start_time, raw.duration), (7, 3));
        assert_eq!(CueDescriptor::try_from(raw), Ok(descriptor));
    }
}
