// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Quad surface mesh, drawn as two triangles per quad

use super::extract::{surface_triangles, surface_wireframe, QUAD_SPLIT};
use crate::geometry::{Geometry, MeshCore, Rgba, SurfaceMesh, TopologyError};
use crate::io::{self, RawMesh};
use crate::render::{Extract, RenderVertex, Shading};
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct QuadMesh {
    surface: SurfaceMesh,
}

impl QuadMesh {
    pub const ARITY: usize = 4;

    pub fn new(
        vertices: Vec<Point3<f32>>,
        polys: Vec<Vec<usize>>,
        colors: Option<Vec<Rgba>>,
    ) -> Result<Self, TopologyError> {
        Ok(Self {
            surface: SurfaceMesh::build(Self::ARITY, vertices, polys, colors)?,
        })
    }

    pub fn from_raw(raw: RawMesh) -> Result<Self, TopologyError> {
        let mut mesh = Self::new(raw.vertices, raw.polys, raw.colors)?;
        if raw.uv.is_some() {
            mesh.surface.set_uv(raw.uv);
        }
        Ok(mesh)
    }

    /// Load an `.off` or `.obj` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = io::read_raw(path)?;
        let mut mesh =
            Self::from_raw(raw).context(format!("Failed to build quad mesh from {}", path.display()))?;
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

impl Geometry for QuadMesh {
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

impl Extract for QuadMesh {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex> {
        surface_triangles(&self.surface, shading, &QUAD_SPLIT)
    }

    fn extract_wireframe(&self) -> Vec<RenderVertex> {
        surface_wireframe(&self.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::quad_grid;

    fn grid() -> QuadMesh {
        let (vertices, quads) = quad_grid(2, 1, 1.0);
        QuadMesh::new(vertices, quads, None).unwrap()
    }

    #[test]
    fn test_quads_split_along_one_three_diagonal() {
        let mut mesh = grid();
        let tris = mesh.extract_triangles(Shading::Flat);
        assert_eq!(tris.len(), 12);
        // first quad is [0, 1, 4, 3]; second triangle starts at corner 1
        assert_eq!(tris[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(tris[3].position, [1.0, 0.0, 0.0]);
        assert!(tris.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_wireframe_skips_diagonals() {
        let mesh = grid();
        assert_eq!(mesh.extract_wireframe().len(), 7 * 2);
    }

    #[test]
    fn test_adjacent_quads_share_one_edge() {
        let mesh = grid();
        let core = mesh.core();
        assert_eq!(core.adj_p2p(0), &[1]);
        let shared = core.edge_id(1, 4).unwrap();
        assert_eq!(core.adj_e2p(shared), &[0, 1]);
        assert!(mesh.is_surface());
    }

    #[test]
    fn test_rejects_triangles() {
        let err = QuadMesh::new(vec![Point3::origin(); 3], vec![vec![0, 1, 2]], None).unwrap_err();
        assert!(matches!(err, TopologyError::CellSize { expected: 4, .. }));
    }
}
