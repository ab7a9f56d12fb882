// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - indexed mesh topology and queries

mod analytics;
mod bbox;
pub mod color;
mod error;
mod mesh_core;
pub mod primitives;
pub mod quality;
mod slice;
mod surface;
mod volume;

pub use analytics::{analyze, MeshStats, QualitySummary};
pub use bbox::BoundingBox;
pub use color::Rgba;
pub use error::TopologyError;
pub use mesh_core::{centroid, cycle_normal, MeshCore, DEFAULT_LABEL_SEED};
pub use primitives::Primitive;
pub use quality::INVALID_QUALITY;
pub use slice::{AxisRange, SliceBox};
pub use surface::{PolyUv, SurfaceMesh};
pub use volume::{CellKind, ColorMode, VolumeMesh};

use nalgebra::Point3;

/// Interaction capability shared by every mesh kind.
///
/// Ids passed to `dig`/`undig` are edge ids on surfaces and face ids on
/// volumes; both return the poly whose visibility changed.
pub trait Geometry {
    fn core(&self) -> &MeshCore;
    fn core_mut(&mut self) -> &mut MeshCore;

    fn is_volumetric(&self) -> bool;

    fn is_surface(&self) -> bool {
        !self.is_volumetric()
    }

    fn dig(&mut self, id: usize) -> Option<usize>;
    fn undig(&mut self, id: usize) -> Option<usize>;

    /// Nearest face on volumes, nearest poly on surfaces
    fn pick_face(&self, point: &Point3<f32>) -> Option<usize>;

    fn pick_vertex(&self, point: &Point3<f32>) -> Option<usize> {
        self.core().pick_vertex(point)
    }

    fn pick_edge(&self, point: &Point3<f32>) -> Option<usize> {
        self.core().pick_edge(point)
    }

    fn pick_poly(&self, point: &Point3<f32>) -> Option<usize> {
        self.core().pick_poly(point)
    }

    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn slice(&mut self, slice: SliceBox) {
        self.core_mut().slice(slice);
    }

    fn is_dirty(&self) -> bool {
        self.core().is_dirty()
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.core_mut().set_dirty(dirty);
    }

    fn bounding_box(&self) -> BoundingBox {
        self.core().bounding_box()
    }

    fn name(&self) -> &str {
        self.core().name()
    }
}

impl Geometry for SurfaceMesh {
    fn core(&self) -> &MeshCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MeshCore {
        &mut self.core
    }

    fn is_volumetric(&self) -> bool {
        false
    }

    fn dig(&mut self, eid: usize) -> Option<usize> {
        SurfaceMesh::dig(self, eid)
    }

    fn undig(&mut self, eid: usize) -> Option<usize> {
        SurfaceMesh::undig(self, eid)
    }

    fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        self.core.pick_poly(point)
    }
}

impl Geometry for VolumeMesh {
    fn core(&self) -> &MeshCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MeshCore {
        &mut self.core
    }

    fn is_volumetric(&self) -> bool {
        true
    }

    fn dig(&mut self, fid: usize) -> Option<usize> {
        VolumeMesh::dig(self, fid)
    }

    fn undig(&mut self, fid: usize) -> Option<usize> {
        VolumeMesh::undig(self, fid)
    }

    fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        VolumeMesh::pick_face(self, point)
    }
}
