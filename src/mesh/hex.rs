// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hexahedral mesh, faces drawn as two triangles each

use super::extract::{volume_triangles, volume_wireframe, QUAD_SPLIT};
use crate::geometry::{CellKind, Geometry, MeshCore, TopologyError, VolumeMesh};
use crate::io::{self, RawMesh};
use crate::render::{Extract, RenderVertex, Shading};
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct HexMesh {
    volume: VolumeMesh,
}

impl HexMesh {
    pub fn new(
        vertices: Vec<Point3<f32>>,
        cells: Vec<Vec<usize>>,
        labels: Option<Vec<i32>>,
    ) -> Result<Self, TopologyError> {
        Ok(Self {
            volume: VolumeMesh::build(CellKind::Hexahedron, vertices, cells, labels)?,
        })
    }

    pub fn from_raw(raw: RawMesh) -> Result<Self, TopologyError> {
        Self::new(raw.vertices, raw.polys, raw.labels)
    }

    /// Load a MEDIT `.mesh` file with a `Hexahedra` section
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = io::read_raw(path)?;
        let mut mesh =
            Self::from_raw(raw).context(format!("Failed to build hex mesh from {}", path.display()))?;
        mesh.volume.core_mut().set_name(io::mesh_name(path));
        Ok(mesh)
    }

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

impl Geometry for HexMesh {
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

impl Extract for HexMesh {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex> {
        volume_triangles(&mut self.volume, shading, &QUAD_SPLIT)
    }

    fn extract_wireframe(&self) -> Vec<RenderVertex> {
        volume_wireframe(&self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::hex_grid;
    use crate::geometry::{color, ColorMode, INVALID_QUALITY};
    use approx::assert_relative_eq;

    fn column(layers: usize) -> HexMesh {
        let (vertices, cells) = hex_grid([1, 1, layers], 1.0);
        let labels = (0..layers as i32).collect();
        HexMesh::new(vertices, cells, Some(labels)).unwrap()
    }

    #[test]
    fn test_unit_cube_quality() {
        let mesh = column(1);
        assert_relative_eq!(mesh.quality(0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_coplanar_hex_is_invalid() {
        let (mut vertices, cells) = hex_grid([1, 1, 1], 1.0);
        for v in vertices.iter_mut() {
            v.z = 0.0;
        }
        let mesh = HexMesh::new(vertices, cells, None).unwrap();
        assert_eq!(mesh.quality(0), INVALID_QUALITY);
    }

    #[test]
    fn test_smooth_surface_normals_ignore_internal_faces() {
        let mut mesh = column(2);
        mesh.extract_triangles(Shading::Smooth);
        // vertex 0 is a bottom corner touching three surface faces
        let n = mesh.core().vertex_normals()[0];
        assert_relative_eq!(n, nalgebra::Vector3::new(-1.0, -1.0, -1.0) / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_label_mode_is_stable_per_label() {
        let mut mesh = column(2);
        mesh.volume_mut().set_color_mode(ColorMode::Label);
        let tris = mesh.extract_triangles(Shading::Flat);
        // 5 surface faces per cell, 6 records per face
        assert_eq!(tris.len(), 2 * 5 * 6);
        let (lower, upper) = tris.split_at(30);
        assert!(lower.iter().all(|v| v.color == lower[0].color));
        assert!(upper.iter().all(|v| v.color == upper[0].color));
        assert_ne!(lower[0].color, upper[0].color);
    }

    #[test]
    fn test_quality_mode_colors_each_cell_by_its_jacobian() {
        let (mut vertices, cells) = hex_grid([1, 1, 2], 1.0);
        // pull a top corner so only the upper cell is distorted
        vertices[8] = Point3::new(-0.4, -0.4, 2.3);
        let mut mesh = HexMesh::new(vertices, cells, None).unwrap();
        mesh.volume_mut().set_color_mode(ColorMode::Quality);

        let qualities = mesh.qualities();
        assert!(qualities[1] < qualities[0]);

        let tris = mesh.extract_triangles(Shading::Flat);
        let (lower, upper) = tris.split_at(30);
        assert!(lower.iter().all(|v| v.color() == color::quality_to_color(qualities[0])));
        assert!(upper.iter().all(|v| v.color() == color::quality_to_color(qualities[1])));
    }

    #[test]
    fn test_dig_exposes_salmon_face() {
        let mut mesh = column(2);
        let volume = mesh.volume();
        let shared = volume.adj_p2f(0).iter().copied().find(|&f| !volume.face_is_on_surf(f)).unwrap();
        mesh.dig(shared);
        let tris = mesh.extract_triangles(Shading::Flat);
        assert_eq!(tris.len(), 6 * 6);
        let internal = color::default_internal_color();
        assert_eq!(tris.iter().filter(|v| v.color() == internal).count(), 6);
    }
}
