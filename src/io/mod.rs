// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh file readers, loading and STL export
//!
//! Readers are pure: they turn text or bytes into a [`RawMesh`] and know
//! nothing about topology. [`load`] picks a reader and a mesh kind for a path.

mod error;
mod export;
mod loader;
pub mod mesh;
pub mod obj;
pub mod off;
pub mod stl;

pub use error::{Format, ReadError};
pub use export::{export_stl, StlEncoding};
pub use loader::{detect_format, load, mesh_name, read_raw};
pub use mesh::{parse_mesh, read_mesh};
pub use obj::{parse_obj, read_obj};
pub use off::{parse_off, read_off};
pub use stl::{parse_stl, read_stl};

use crate::geometry::{CellKind, PolyUv, Rgba};
use nalgebra::Point3;

/// Reader output: vertex positions, connectivity and whatever per-poly data
/// the format carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    pub vertices: Vec<Point3<f32>>,
    pub polys: Vec<Vec<usize>>,
    /// OFF face colors
    pub colors: Option<Vec<Rgba>>,
    /// MEDIT cell reference numbers
    pub labels: Option<Vec<i32>>,
    /// OBJ texture coordinates, one list per poly
    pub uv: Option<PolyUv>,
    /// Set by readers of volumetric formats
    pub cell_kind: Option<CellKind>,
}
