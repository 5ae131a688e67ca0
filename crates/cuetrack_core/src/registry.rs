// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cue registry: which runtime logic materializes which cue kind.

use crate::cue::CueObject;
use crate::descriptor::{CueDescriptor, CueKind};
use crate::kinds::{CameraCue, EffectCue, FunctionCue, HitboxCue, InertCue, SoundCue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a cue object for a descriptor, or declines it
pub type CueFactory =
    Box<dyn Fn(&Arc<CueDescriptor>) -> Option<Box<dyn CueObject>> + Send + Sync>;

/// Maps cue kinds to factories.
///
/// Shared read-only between timeline instances. Descriptors whose kind has no
/// factory, or whose factory declines them, become an [`InertCue`].
pub struct CueRegistry {
    factories: HashMap<CueKind, CueFactory>,
}

impl CueRegistry {
    /// Registry without any kind logic
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in camera, hitbox, effect, sound and function
    /// kinds
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::empty();
        registry.register(CueKind::Camera, |descriptor| {
            CameraCue::from_descriptor(Arc::clone(descriptor)).map(boxed)
        });
        registry.register(CueKind::Hitbox, |descriptor| {
            HitboxCue::from_descriptor(Arc::clone(descriptor)).map(boxed)
        });
        registry.register(CueKind::Effect, |descriptor| {
            EffectCue::from_descriptor(Arc::clone(descriptor)).map(boxed)
        });
        registry.register(CueKind::Sound, |descriptor| {
            SoundCue::from_descriptor(Arc::clone(descriptor)).map(boxed)
        });
        registry.register(CueKind::Function, |descriptor| {
            FunctionCue::from_descriptor(Arc::clone(descriptor)).map(boxed)
        });
        registry
    }

    /// Register logic for a kind, returning the factory it replaces
    pub fn register<F>(&mut self, kind: CueKind, factory: F) -> Option<CueFactory>
    where
        F: Fn(&Arc<CueDescriptor>) -> Option<Box<dyn CueObject>> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory))
    }

    /// Remove the logic for a kind
    pub fn unregister(&mut self, kind: CueKind) -> Option<CueFactory> {
        self.factories.remove(&kind)
    }

    /// Whether a kind has registered logic
    pub fn is_registered(&self, kind: CueKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Materialize a cue object for `descriptor`
    pub fn instantiate(&self, descriptor: &Arc<CueDescriptor>) -> Box<dyn CueObject> {
        let kind = descriptor.kind();
        let Some(factory) = self.factories.get(&kind) else {
            return Box::new(InertCue::new(Arc::clone(descriptor)));
        };
        factory(descriptor).unwrap_or_else(|| {
            tracing::warn!(
                cue = %descriptor.name(),
                kind = kind.name(),
                "Cue factory declined descriptor, using inert cue"
            );
            Box::new(InertCue::new(Arc::clone(descriptor)))
        })
    }
}

impl Default for CueRegistry {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

impl fmt::Debug for CueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().map(CueKind::name).collect();
        kinds.sort_unstable();
        f.debug_struct("CueRegistry").field("kinds", &kinds).finish()
    }
}

fn boxed<C: CueObject + 'static>(cue: C) -> Box<dyn CueObject> {
    Box::new(cue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CuePayload, SoundPayload};

    #[test]
    fn test_builtin_kinds() {
        let registry = CueRegistry::default();
        for kind in CueKind::all() {
            assert_eq!(registry.is_registered(*kind), *kind != CueKind::Marker);
        }
    }

    #[test]
    fn test_unregistered_kind_is_inert() {
        let mut registry = CueRegistry::default();
        assert!(registry.unregister(CueKind::Sound).is_some());

        let descriptor = Arc::new(CueDescriptor::new(
            0,
            2,
            CuePayload::Sound(SoundPayload::default()),
        ));
        let cue = registry.instantiate(&descriptor);
        assert!(format!("{cue:?}").starts_with("InertCue"));
    }

    #[test]
    fn test_override_replaces_logic() {
        let mut registry = CueRegistry::empty();
        let previous = registry.register(CueKind::Marker, |descriptor| {
            Some(Box::new(InertCue::new(Arc::clone(descriptor))) as Box<dyn CueObject>)
        });
        assert!(previous.is_none());
        assert!(registry.is_registered(CueKind::Marker));
        assert!(format!("{registry:?}").contains("Marker"));
    }
}
