// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structured mesh generators for demos, tests and benchmarks

use super::TopologyError;
use crate::mesh::{AnyMesh, HexMesh, QuadMesh, TetMesh, TriangleMesh};
use nalgebra::Point3;

/// Kuhn split of a hex into six positively oriented tets around the 0-6 diagonal
const HEX_TO_TETS: [[usize; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
    [0, 5, 1, 6],
];

/// Generated meshes
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// The single unit hexahedron of the demo scene, centered at the origin
    DemoHex,
    /// `dims` hexes along x, y and z, labeled by z layer
    HexGrid { dims: [usize; 3], spacing: f32 },
    /// Hex grid with every hex split into six tets
    TetGrid { dims: [usize; 3], spacing: f32 },
    /// Planar quads on z = 0
    QuadGrid { nx: usize, ny: usize, spacing: f32 },
    /// Planar quads on z = 0, each split into two triangles
    TriGrid { nx: usize, ny: usize, spacing: f32 },
}

impl Primitive {
    pub fn hex_grid(dims: [usize; 3], spacing: f32) -> Self {
        Self::HexGrid { dims, spacing }
    }

    pub fn tet_grid(dims: [usize; 3], spacing: f32) -> Self {
        Self::TetGrid { dims, spacing }
    }

    pub fn quad_grid(nx: usize, ny: usize, spacing: f32) -> Self {
        Self::QuadGrid { nx, ny, spacing }
    }

    pub fn tri_grid(nx: usize, ny: usize, spacing: f32) -> Self {
        Self::TriGrid { nx, ny, spacing }
    }

    pub fn to_mesh(&self) -> Result<AnyMesh, TopologyError> {
        let mesh = match self {
            Self::DemoHex => {
                let mut hex = HexMesh::new(demo_hex_vertices(), vec![(0..8).collect()], None)?;
                hex.volume_mut().core_mut().set_name("Demo");
                AnyMesh::Hex(hex)
            }
            Self::HexGrid { dims, spacing } => {
                let (vertices, cells) = hex_grid(*dims, *spacing);
                let labels = layer_labels(*dims, 1);
                AnyMesh::Hex(HexMesh::new(vertices, cells, Some(labels))?)
            }
            Self::TetGrid { dims, spacing } => {
                let (vertices, hexes) = hex_grid(*dims, *spacing);
                let cells: Vec<Vec<usize>> = hexes
                    .iter()
                    .flat_map(|hex| {
                        HEX_TO_TETS
                            .iter()
                            .map(move |tet| tet.iter().map(|&corner| hex[corner]).collect::<Vec<_>>())
                    })
                    .collect();
                let labels = layer_labels(*dims, HEX_TO_TETS.len());
                AnyMesh::Tet(TetMesh::new(vertices, cells, Some(labels))?)
            }
            Self::QuadGrid { nx, ny, spacing } => {
                let (vertices, quads) = quad_grid(*nx, *ny, *spacing);
                AnyMesh::Quad(QuadMesh::new(vertices, quads, None)?)
            }
            Self::TriGrid { nx, ny, spacing } => {
                let (vertices, quads) = quad_grid(*nx, *ny, *spacing);
                let triangles = quads
                    .iter()
                    .flat_map(|q| [vec![q[0], q[1], q[2]], vec![q[0], q[2], q[3]]])
                    .collect();
                AnyMesh::Triangle(TriangleMesh::new(vertices, triangles, None)?)
            }
        };
        Ok(mesh)
    }
}

fn demo_hex_vertices() -> Vec<Point3<f32>> {
    vec![
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(-0.5, 0.5, 0.5),
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(0.5, 0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
    ]
}

/// Lattice points and hex cells in the bottom-ring/top-ring corner order
pub fn hex_grid(dims: [usize; 3], spacing: f32) -> (Vec<Point3<f32>>, Vec<Vec<usize>>) {
    let [nx, ny, nz] = dims;
    let at = |x: usize, y: usize, z: usize| x + (nx + 1) * (y + (ny + 1) * z);

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for z in 0..=nz {
        for y in 0..=ny {
            for x in 0..=nx {
                vertices.push(Point3::new(x as f32, y as f32, z as f32) * spacing);
            }
        }
    }

    let mut cells = Vec::with_capacity(nx * ny * nz);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                cells.push(vec![
                    at(x, y, z),
                    at(x + 1, y, z),
                    at(x + 1, y + 1, z),
                    at(x, y + 1, z),
                    at(x, y, z + 1),
                    at(x + 1, y, z + 1),
                    at(x + 1, y + 1, z + 1),
                    at(x, y + 1, z + 1),
                ]);
            }
        }
    }
    (vertices, cells)
}

/// Counter-clockwise quads seen from +z
pub fn quad_grid(nx: usize, ny: usize, spacing: f32) -> (Vec<Point3<f32>>, Vec<Vec<usize>>) {
    let at = |x: usize, y: usize| x + (nx + 1) * y;

    let vertices = (0..=ny)
        .flat_map(|y| (0..=nx).map(move |x| Point3::new(x as f32 * spacing, y as f32 * spacing, 0.0)))
        .collect();
    let quads = (0..ny)
        .flat_map(|y| (0..nx).map(move |x| vec![at(x, y), at(x + 1, y), at(x + 1, y + 1), at(x, y + 1)]))
        .collect();
    (vertices, quads)
}

fn layer_labels(dims: [usize; 3], per_hex: usize) -> Vec<i32> {
    let [nx, ny, nz] = dims;
    (0..nz)
        .flat_map(|z| std::iter::repeat(z as i32).take(nx * ny * per_hex))
        .collect()
}
