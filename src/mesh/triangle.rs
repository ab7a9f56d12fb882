// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle surface mesh

use super::extract::{surface_triangles, surface_wireframe, TRIANGLE_SPLIT};
use crate::geometry::{Geometry, MeshCore, Rgba, SurfaceMesh, TopologyError};
use crate::io::{self, RawMesh};
use crate::render::{Extract, RenderVertex, Shading};
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TriangleMesh {
    surface: SurfaceMesh,
}

impl TriangleMesh {
    pub const ARITY: usize = 3;

    pub fn new(
        vertices: Vec<Point3<f32>>,
        polys: Vec<Vec<usize>>,
        colors: Option<Vec<Rgba>>,
    ) -> Result<Self, TopologyError> {
        Ok(Self {
            surface: SurfaceMesh::build(Self::ARITY, vertices, polys, colors)?,
        })
    }

    /// Build from reader output, keeping OFF colors and OBJ texture coordinates
    pub fn from_raw(raw: RawMesh) -> Result<Self, TopologyError> {
        let mut mesh = Self::new(raw.vertices, raw.polys, raw.colors)?;
        if raw.uv.is_some() {
            mesh.surface.set_uv(raw.uv);
        }
        Ok(mesh)
    }

    /// Load an `.off`, `.obj` or `.stl` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = io::read_raw(path)?;
        let mut mesh = Self::from_raw(raw)
            .context(format!("Failed to build triangle mesh from {}", path.display()))?;
        mesh.surface.core_mut().set_name(io::mesh_name(path));
        Ok(mesh)
    }

    pub fn surface(&self) -> &SurfaceMesh {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut SurfaceMesh {
        &mut self.surface
    }
}

impl Geometry for TriangleMesh {
    fn core(&self) -> &MeshCore {
        self.surface.core()
    }

    fn core_mut(&mut self) -> &mut MeshCore {
        self.surface.core_mut()
    }

    fn is_volumetric(&self) -> bool {
        false
    }

    fn dig(&mut self, eid: usize) -> Option<usize> {
        self.surface.dig(eid)
    }

    fn undig(&mut self, eid: usize) -> Option<usize> {
        self.surface.undig(eid)
    }

    fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        self.surface.core().pick_poly(point)
    }
}

impl Extract for TriangleMesh {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex> {
        surface_triangles(&self.surface, shading, &TRIANGLE_SPLIT)
    }

    fn extract_wireframe(&self) -> Vec<RenderVertex> {
        surface_wireframe(&self.surface)
    }
}
