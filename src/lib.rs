// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshview topology engine
//!
//! Indexed triangle, quad, tetrahedral and hexahedral meshes with full
//! vertex/edge/face/cell adjacency, picking, slicing, scaled-Jacobian quality
//! and dirty-flag cached extraction of GPU-ready vertex lists.

pub mod config;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod registry;
pub mod render;

pub use config::ViewerConfig;
pub use geometry::{analyze, BoundingBox, ColorMode, Geometry, MeshStats, Primitive, SliceBox};
pub use io::{export_stl, load, ReadError, StlEncoding};
pub use mesh::{AnyMesh, HexMesh, MeshKind, QuadMesh, TetMesh, TriangleMesh};
pub use registry::{MeshId, MeshRegistry};
pub use render::{Drawable, Extract, RenderVertex, Shading};

use anyhow::Result;
use std::path::Path;

/// Load a mesh file into a drawable configured by `config`
pub fn open<P: AsRef<Path>>(path: P, config: &ViewerConfig) -> Result<Drawable<AnyMesh>> {
    let mut drawable = Drawable::new(load(path)?);
    config.apply(&mut drawable);
    Ok(drawable)
}
