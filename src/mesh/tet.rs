// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tetrahedral mesh

use super::extract::{volume_triangles, volume_wireframe, TRIANGLE_SPLIT};
use crate::geometry::{CellKind, Geometry, MeshCore, TopologyError, VolumeMesh};
use crate::io::{self, RawMesh};
use crate::render::{Extract, RenderVertex, Shading};
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TetMesh {
    volume: VolumeMesh,
}

impl TetMesh {
    pub fn new(
        vertices: Vec<Point3<f32>>,
        cells: Vec<Vec<usize>>,
        labels: Option<Vec<i32>>,
    ) -> Result<Self, TopologyError> {
        Ok(Self {
            volume: VolumeMesh::build(CellKind::Tetrahedron, vertices, cells, labels)?,
        })
    }

    pub fn from_raw(raw: RawMesh) -> Result<Self, TopologyError> {
        Self::new(raw.vertices, raw.polys, raw.labels)
    }

    /// Load a MEDIT `.mesh` file with a `Tetrahedra` section
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = io::read_raw(path)?;
        let mut mesh =
            Self::from_raw(raw).context(format!("Failed to build tet mesh from {}", path.display()))?;
        mesh.volume.core_mut().set_name(io::mesh_name(path));
        Ok(mesh)
    }

    /// Scaled Jacobian of one cell
    pub fn quality(&self, pid: usize) -> f32 {
        self.volume.quality(pid)
    }

    pub fn qualities(&self) -> Vec<f32> {
        self.volume.qualities()
    }

    pub fn volume(&self) -> &VolumeMesh {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut VolumeMesh {
        &mut self.volume
    }
}

impl Geometry for TetMesh {
    fn core(&self) -> &MeshCore {
        self.volume.core()
    }

    fn core_mut(&mut self) -> &mut MeshCore {
        self.volume.core_mut()
    }

    fn is_volumetric(&self) -> bool {
        true
    }

    fn dig(&mut self, fid: usize) -> Option<usize> {
        self.volume.dig(fid)
    }

    fn undig(&mut self, fid: usize) -> Option<usize> {
        self.volume.undig(fid)
    }

    fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        self.volume.pick_face(point)
    }
}

impl Extract for TetMesh {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex> {
        volume_triangles(&mut self.volume, shading, &TRIANGLE_SPLIT)
    }

    fn extract_wireframe(&self) -> Vec<RenderVertex> {
        volume_wireframe(&self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{color, ColorMode};

    /// Two tets glued on the face (1, 2, 3)
    fn bipyramid() -> TetMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        TetMesh::new(vertices, vec![vec![0, 1, 2, 3], vec![4, 1, 3, 2]], None).unwrap()
    }

    #[test]
    fn test_shared_face_classification() {
        let mesh = bipyramid();
        let volume = mesh.volume();
        assert_eq!(volume.num_faces(), 7);
        assert_eq!(volume.surface_face_count(), 6);
        assert_eq!(mesh.core().num_edges(), 9);
        let shared = volume.face_id(&[1, 2, 3]).unwrap();
        assert_eq!(volume.adj_f2p(shared), &[0, 1]);
        assert!(!volume.face_is_on_surf(shared));
    }

    #[test]
    fn test_surface_faces_point_outward() {
        let mesh = bipyramid();
        let volume = mesh.volume();
        let bottom = volume.face_id(&[0, 1, 2]).unwrap();
        assert_eq!(mesh.core().normals()[bottom], nalgebra::Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_extraction_exposes_internal_face_after_dig() {
        let mut mesh = bipyramid();
        assert_eq!(mesh.extract_triangles(Shading::Flat).len(), 6 * 3);

        let shared = mesh.volume().face_id(&[1, 2, 3]).unwrap();
        assert_eq!(mesh.dig(shared), Some(0));
        let tris = mesh.extract_triangles(Shading::Flat);
        assert_eq!(tris.len(), 4 * 3);

        let internal = color::default_internal_color();
        let tinted = tris.iter().filter(|v| v.color() == internal).count();
        assert_eq!(tinted, 3);
    }

    #[test]
    fn test_quality_color_mode() {
        let mut mesh = bipyramid();
        mesh.volume_mut().set_color_mode(ColorMode::Quality);
        let q = mesh.quality(0);
        let tris = mesh.extract_triangles(Shading::Flat);
        assert_eq!(tris[0].color(), color::quality_to_color(q));
    }

    #[test]
    fn test_wireframe_needs_visible_face_and_cell() {
        let mut mesh = bipyramid();
        assert_eq!(mesh.extract_wireframe().len(), 9 * 2);
        mesh.core_mut().set_visible(0, false);
        // only the edges of the remaining tet are drawn
        assert_eq!(mesh.extract_wireframe().len(), 6 * 2);
    }
}
