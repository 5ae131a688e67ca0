// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback driver: turns wall-clock time and transport commands into frame
//! advances on a timeline instance.

use crate::descriptor::CueId;
use crate::event::CueSink;
use crate::instance::{ReconcileReport, TimelineInstance};
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
    /// Playing in reverse
    Reverse,
}

/// Playback tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Frames per second of the action clock
    pub frame_rate: f32,
    /// Playback speed multiplier
    pub speed: f32,
    /// Most frames a single update may step; leftover time is dropped
    pub max_frames_per_update: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            speed: 1.0,
            max_frames_per_update: 8,
        }
    }
}

/// Half-open loop range `[start, end)` in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame
    pub start: u32,
    /// First frame past the range
    pub end: u32,
}

/// Playback controller for timeline instances
#[derive(Debug, Clone)]
pub struct PlaybackController {
    /// Playback state
    pub state: PlaybackState,
    /// Playback tuning
    pub settings: PlaybackSettings,
    /// Loop range override
    pub loop_range: Option<FrameRange>,
    /// Time not yet converted into frames
    accumulated_time: f32,
}

impl PlaybackController {
    /// Create a new playback controller
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            state: PlaybackState::Stopped,
            settings,
            loop_range: None,
            accumulated_time: 0.0,
        }
    }

    /// Update playback with delta time, stepping every whole frame in order
    pub fn update(
        &mut self,
        delta_time: f32,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> Vec<ReconcileReport> {
        if !self.is_playing() || self.settings.frame_rate <= 0.0 {
            return Vec::new();
        }

        let frame_time = 1.0 / self.settings.frame_rate;
        self.accumulated_time += delta_time * self.settings.speed.max(0.0);

        let mut reports = Vec::new();
        let mut steps = 0;
        while self.accumulated_time >= frame_time && self.is_playing() {
            self.accumulated_time -= frame_time;
            let report = match self.state {
                PlaybackState::Reverse => self.step_backward(instance, sink),
                _ => self.step_forward(instance, sink),
            };
            reports.push(report);

            // Limit steps per update to avoid a spiral after a long stall
            steps += 1;
            if steps >= self.settings.max_frames_per_update {
                self.accumulated_time = 0.0;
                break;
            }
        }

        reports
    }

    /// Advance one frame, wrapping or stopping at the end
    pub fn step_forward(
        &mut self,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> ReconcileReport {
        let range = self.effective_range(instance);
        if !instance.is_synchronized() {
            return instance.advance_to(range.start, sink);
        }
        let next = instance.current_frame().saturating_add(1);
        if next < range.end {
            return instance.advance_to(next, sink);
        }

        if self.loops(instance) && range.start < range.end {
            tracing::debug!(
                action = %instance.action().name,
                frame = range.start,
                "Playback looped"
            );
            return self.wrap_to(range.start, instance, sink);
        }

        tracing::debug!(action = %instance.action().name, "Playback reached the end");
        self.finish(instance, sink)
    }

    /// Step one frame back, wrapping or stopping at the start
    pub fn step_backward(
        &mut self,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> ReconcileReport {
        let range = self.effective_range(instance);
        if !instance.is_synchronized() {
            return instance.advance_to(range.end.saturating_sub(1).max(range.start), sink);
        }
        let current = instance.current_frame();
        if current > range.start {
            return instance.advance_to((current - 1).min(range.end.saturating_sub(1)), sink);
        }

        if self.loops(instance) && range.start < range.end {
            tracing::debug!(
                action = %instance.action().name,
                frame = range.end - 1,
                "Reverse playback looped"
            );
            return self.wrap_to(range.end - 1, instance, sink);
        }

        self.state = PlaybackState::Stopped;
        self.accumulated_time = 0.0;
        instance.advance_to(range.start, sink)
    }

    /// Jump to a frame without changing the playback state
    pub fn seek(
        &mut self,
        frame: u32,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> ReconcileReport {
        self.accumulated_time = 0.0;
        instance.advance_to(frame, sink)
    }

    /// Play from the current position
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Play in reverse
    pub fn play_reverse(&mut self) {
        self.state = PlaybackState::Reverse;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Paused;
        }
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing | PlaybackState::Reverse => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Stop and tear down every live cue. The next step starts over at the
    /// beginning of the loop range
    pub fn stop(
        &mut self,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> Vec<CueId> {
        self.state = PlaybackState::Stopped;
        self.accumulated_time = 0.0;
        instance.reset(sink)
    }

    /// Set loop range
    pub fn set_loop_range(&mut self, start: u32, end: u32) {
        self.loop_range = Some(FrameRange { start, end });
    }

    /// Clear loop range
    pub fn clear_loop_range(&mut self) {
        self.loop_range = None;
    }

    /// Is currently playing (forward or reverse)
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Reverse)
    }

    /// Convert a time in seconds to a frame index
    pub fn time_to_frame(&self, time: f32) -> u32 {
        (time.max(0.0) * self.settings.frame_rate) as u32
    }

    /// Convert a frame index to a time in seconds
    pub fn frame_to_time(&self, frame: u32) -> f32 {
        frame as f32 / self.settings.frame_rate
    }

    fn effective_range(&self, instance: &TimelineInstance) -> FrameRange {
        self.loop_range.unwrap_or(FrameRange {
            start: 0,
            end: instance.action().frame_count(),
        })
    }

    fn loops(&self, instance: &TimelineInstance) -> bool {
        self.loop_range.is_some() || instance.action().looping
    }

    /// Jump back across the loop seam.
    ///
    /// Inside a loop range this is a plain seek: cues whose window spans the
    /// seam stay live and only receive a seek. A looping action that reaches
    /// its end restarts instead, so every cue is torn down and rebuilt.
    fn wrap_to(
        &mut self,
        frame: u32,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> ReconcileReport {
        if self.loop_range.is_some() {
            return instance.advance_to(frame, sink);
        }
        let stopped = instance.reset(sink);
        let mut report = instance.advance_to(frame, sink);
        report.stopped.splice(0..0, stopped);
        report
    }

    fn finish(
        &mut self,
        instance: &mut TimelineInstance,
        sink: &mut dyn CueSink,
    ) -> ReconcileReport {
        let frame = instance.current_frame();
        let stopped = instance.reset(sink);
        self.state = PlaybackState::Stopped;
        self.accumulated_time = 0.0;
        ReconcileReport {
            frame,
            stopped,
            ..ReconcileReport::default()
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(PlaybackSettings::default())
    }
}
