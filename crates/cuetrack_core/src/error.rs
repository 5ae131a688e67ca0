// SPDX-License-Identifier: MIT OR Apache-2.0
//! Load-time errors for cue descriptors and actions.
//!
//! Simulation itself has no error path: anything that could go wrong is
//! rejected here, before a descriptor reaches a timeline instance.

use crate::descriptor::CueId;

/// Error raised while validating a raw cue descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// Start frame below zero
    #[error("Negative start time: {0}")]
    NegativeStartTime(i64),

    /// Duration below zero
    #[error("Negative duration: {0}")]
    NegativeDuration(i64),

    /// Start frame does not fit the frame clock
    #[error("Start time {0} exceeds the frame range")]
    StartTimeOutOfRange(i64),

    /// `start_time + duration` does not fit the frame clock
    #[error("Activation window {start}+{duration} exceeds the frame range")]
    WindowOverflow {
        /// Requested start frame
        start: i64,
        /// Requested duration
        duration: i64,
    },
}

/// Error raised while assembling an action from descriptors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Two descriptors share an id
    #[error("Duplicate cue id: {0:?}")]
    DuplicateCue(CueId),
}
