// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scenario files: one action plus a script of driver commands.

use cuetrack_core::{Action, ActionError, CueDescriptor, FrameRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error raised while loading a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The file could not be read
    #[error("Failed to read scenario {}: {source}", .path.display())]
    Io {
        /// Scenario path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed RON or an invalid cue descriptor
    #[error("Invalid scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The cues do not form a valid action
    #[error("Invalid action: {0}")]
    Action(#[from] ActionError),
}

/// Action section of a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionFile {
    /// Action name
    pub name: String,
    /// Wrap around at the end
    #[serde(default)]
    pub looping: bool,
    /// Explicit length in frames
    #[serde(default)]
    pub length: Option<u32>,
    /// Cue descriptors in action order
    pub cues: Vec<CueDescriptor>,
}

impl ActionFile {
    /// Assemble the runtime action
    pub fn build(&self) -> Result<Action, ActionError> {
        let mut action = Action::from_descriptors(self.name.clone(), self.cues.iter().cloned())?
            .with_looping(self.looping);
        if let Some(length) = self.length {
            action = action.with_length(length);
        }
        Ok(action)
    }
}

/// One driver command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Play forward for up to this many frames
    Play(u32),
    /// Play in reverse for up to this many frames
    Reverse(u32),
    /// Feed wall-clock seconds to the playback controller
    Tick(f32),
    /// Jump to a frame
    Seek(u32),
    /// Step a single frame forward
    Step,
    /// Pause playback
    Pause,
    /// Change the owner state
    OwnerState(u32),
    /// Set whether attacks touch a target
    Contact(bool),
    /// Tear down and resynchronize at frame 0
    Restart,
    /// Stop playback and tear down every live cue
    Stop,
}

/// A complete preview scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// The action under test
    pub action: ActionFile,
    /// Loop range override
    #[serde(default)]
    pub loop_range: Option<FrameRange>,
    /// Commands, run in order
    pub script: Vec<Command>,
}

impl Scenario {
    /// Load a scenario from a file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    /// Parse a scenario from RON text
    pub fn from_ron(content: &str) -> Result<Self, ScenarioError> {
        Ok(ron::from_str(content)?)
    }
}
