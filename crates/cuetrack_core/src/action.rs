// SPDX-License-Identifier: MIT OR Apache-2.0
//! Action: the ordered descriptor list of one move or animation.

use crate::descriptor::{CueDescriptor, CueId};
use crate::error::ActionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub Uuid);

impl ActionId {
    /// Create a new random action ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered set of cue descriptors.
///
/// Actions are built once and then shared read-only (usually behind an
/// [`Arc`]) by every timeline instance that plays them.
#[derive(Debug, Clone)]
pub struct Action {
    /// Unique action ID
    pub id: ActionId,
    /// Action name
    pub name: String,
    /// Descriptors in authoring order
    cues: IndexMap<CueId, Arc<CueDescriptor>>,
    /// Explicit length in frames (can be longer or shorter than the cues)
    pub length: Option<u32>,
    /// Whether playback wraps at the end
    pub looping: bool,
}

impl Action {
    /// Create an empty action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            name: name.into(),
            cues: IndexMap::new(),
            length: None,
            looping: false,
        }
    }

    /// Build an action from validated descriptors, keeping their order
    pub fn from_descriptors(
        name: impl Into<String>,
        descriptors: impl IntoIterator<Item = CueDescriptor>,
    ) -> Result<Self, ActionError> {
        let mut action = Self::new(name);
        for descriptor in descriptors {
            action.add_cue(descriptor)?;
        }
        Ok(action)
    }

    /// Set an explicit length
    pub fn with_length(mut self, frames: u32) -> Self {
        self.length = Some(frames);
        self
    }

    /// Enable looping
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Append a descriptor
    pub fn add_cue(&mut self, descriptor: CueDescriptor) -> Result<CueId, ActionError> {
        let id = descriptor.id();
        if self.cues.contains_key(&id) {
            return Err(ActionError::DuplicateCue(id));
        }
        self.cues.insert(id, Arc::new(descriptor));
        Ok(id)
    }

    /// Remove a descriptor, keeping the order of the rest
    pub fn remove_cue(&mut self, id: CueId) -> Option<Arc<CueDescriptor>> {
        self.cues.shift_remove(&id)
    }

    /// Get a descriptor
    pub fn cue(&self, id: CueId) -> Option<&Arc<CueDescriptor>> {
        self.cues.get(&id)
    }

    /// All descriptors in authoring order
    pub fn cues(&self) -> impl Iterator<Item = &Arc<CueDescriptor>> {
        self.cues.values()
    }

    /// Get descriptor count
    pub fn cue_count(&self) -> usize {
        self.cues.len()
    }

    /// Descriptors whose window contains `frame`
    pub fn valid_at(&self, frame: u32) -> impl Iterator<Item = &Arc<CueDescriptor>> {
        self.cues.values().filter(move |cue| cue.is_valid_for(frame))
    }

    /// First frame past every cue window
    pub fn content_length(&self) -> u32 {
        self.cues
            .values()
            .map(|cue| cue.window().end())
            .max()
            .map_or(0, |end| u32::try_from(end).unwrap_or(u32::MAX))
    }

    /// Playable length: the explicit length, else the content length
    pub fn frame_count(&self) -> u32 {
        self.length.unwrap_or_else(|| self.content_length())
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new("Untitled Action")
    }
}
