// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Registry of open meshes
//!
//! Every mesh handed to the viewer gets a [`MeshId`] from an explicit
//! allocator owned by the registry. Ids are never reused, even after removal.

use crate::config::ViewerConfig;
use crate::geometry::Geometry;
use crate::mesh::AnyMesh;
use crate::render::Drawable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u64);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> MeshId {
        let id = MeshId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

/// Owns the drawables of all open meshes
#[derive(Debug, Default)]
pub struct MeshRegistry {
    ids: IdAllocator,
    drawables: BTreeMap<MeshId, Drawable<AnyMesh>>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, drawable: Drawable<AnyMesh>) -> MeshId {
        let id = self.ids.allocate();
        tracing::debug!(%id, name = drawable.mesh().name(), "registered mesh");
        self.drawables.insert(id, drawable);
        id
    }

    /// Load a file, apply display settings and register it
    pub fn open<P: AsRef<Path>>(&mut self, path: P, config: &ViewerConfig) -> Result<MeshId> {
        Ok(self.insert(crate::open(path, config)?))
    }

    pub fn get(&self, id: MeshId) -> Option<&Drawable<AnyMesh>> {
        self.drawables.get(&id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Drawable<AnyMesh>> {
        self.drawables.get_mut(&id)
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Drawable<AnyMesh>> {
        self.drawables.remove(&id)
    }

    /// Registered meshes in id order
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Drawable<AnyMesh>)> {
        self.drawables.iter().map(|(&id, drawable)| (id, drawable))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (MeshId, &mut Drawable<AnyMesh>)> {
        self.drawables.iter_mut().map(|(&id, drawable)| (id, drawable))
    }

    pub fn ids(&self) -> Vec<MeshId> {
        self.drawables.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::Primitive;

    fn demo() -> Drawable<AnyMesh> {
        Drawable::new(Primitive::DemoHex.to_mesh().unwrap())
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = MeshRegistry::new();
        let a = registry.insert(demo());
        let b = registry.insert(demo());
        assert!(registry.remove(a).is_some());
        let c = registry.insert(demo());

        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(registry.ids(), vec![b, c]);
        assert!(registry.get(a).is_none());
    }

    #[test]
    fn test_get_mut_reaches_mesh() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(demo());
        registry.get_mut(id).unwrap().buffer();
        assert!(!registry.get(id).unwrap().mesh().core().is_dirty());
    }

    #[test]
    fn test_allocator_counts() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), MeshId(0));
        assert_eq!(ids.allocate(), MeshId(1));
        assert_eq!(ids.allocated(), 2);
    }
}
