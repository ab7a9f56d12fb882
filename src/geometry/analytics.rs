// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh analytics and statistics

use super::{BoundingBox, Geometry, MeshCore, INVALID_QUALITY};
use crate::mesh::{AnyMesh, MeshKind};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Summary of per-cell scaled Jacobians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Minimum over valid cells, `-1` if none is valid
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Cells whose quality is the invalid sentinel
    pub invalid: usize,
}

impl QualitySummary {
    /// `None` for an empty slice
    pub fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let valid: Vec<f32> = values.iter().copied().filter(|&q| q != INVALID_QUALITY).collect();
        let invalid = values.len() - valid.len();
        if valid.is_empty() {
            return Some(Self {
                min: INVALID_QUALITY,
                max: INVALID_QUALITY,
                mean: INVALID_QUALITY,
                invalid,
            });
        }

        let min = valid.iter().copied().fold(f32::INFINITY, f32::min);
        let max = valid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = valid.iter().sum::<f32>() / valid.len() as f32;
        Some(Self { min, max, mean, invalid })
    }
}

/// Element counts, extent and quality of one mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStats {
    pub name: String,
    pub kind: MeshKind,
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Faces of a volumetric mesh; `None` for surfaces
    pub face_count: Option<usize>,
    pub poly_count: usize,
    pub visible_polys: usize,
    /// Boundary faces of a volumetric mesh, or all polys of a surface
    pub surface_faces: usize,
    /// Edges with a single incident poly; always 0 for volumetric meshes
    pub boundary_edges: usize,
    pub bbox: BoundingBox,
    pub surface_area: f32,
    /// Enclosed volume, when the boundary is closed
    pub volume: Option<f32>,
    pub quality: Option<QualitySummary>,
}

impl MeshStats {
    /// Pretty print statistics
    pub fn print(&self) {
        let size = self.bbox.size();
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              MESH ANALYTICS                              ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║ Name:            {:<40}║", self.name);
        println!("║ Kind:            {:<40}║", self.kind.to_string());
        println!("║                                                          ║");
        println!("║ Vertices:        {:>10}                              ║", self.vertex_count);
        println!("║ Edges:           {:>10}                              ║", self.edge_count);
        if let Some(faces) = self.face_count {
            println!("║ Faces:           {:>10}                              ║", faces);
        }
        println!("║ Polys:           {:>10}                              ║", self.poly_count);
        println!("║ Visible:         {:>10}                              ║", self.visible_polys);
        println!("║ Surface faces:   {:>10}                              ║", self.surface_faces);
        println!("║ Boundary edges:  {:>10}                              ║", self.boundary_edges);
        println!("║                                                          ║");
        println!("║ Bounding Box:                                            ║");
        println!(
            "║   Min: ({:>7.2}, {:>7.2}, {:>7.2})                      ║",
            self.bbox.min.x, self.bbox.min.y, self.bbox.min.z
        );
        println!(
            "║   Max: ({:>7.2}, {:>7.2}, {:>7.2})                      ║",
            self.bbox.max.x, self.bbox.max.y, self.bbox.max.z
        );
        println!(
            "║   Size: {:>7.2} × {:>7.2} × {:>7.2}                    ║",
            size.x, size.y, size.z
        );
        println!("║                                                          ║");
        println!("║ Surface Area:    {:>10.4}                              ║", self.surface_area);
        if let Some(volume) = self.volume {
            println!("║ Volume:          {:>10.4}                              ║", volume);
        }
        if let Some(q) = &self.quality {
            println!("║                                                          ║");
            println!("║ Scaled Jacobian:                                         ║");
            println!("║   Min:           {:>10.4}                              ║", q.min);
            println!("║   Max:           {:>10.4}                              ║", q.max);
            println!("║   Mean:          {:>10.4}                              ║", q.mean);
            println!("║   Invalid cells: {:>10}                              ║", q.invalid);
        }
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

/// Fan-triangulated area and signed volume contribution of one boundary cycle
fn cycle_measures(vertices: &[Point3<f32>], cycle: &[usize]) -> (f32, f32) {
    let origin = vertices[cycle[0]];
    cycle[1..].windows(2).fold((0.0, 0.0), |(area, volume), pair| {
        let (a, b) = (vertices[pair[0]], vertices[pair[1]]);
        let tri_area = (a - origin).cross(&(b - origin)).norm() / 2.0;
        let tri_volume = origin.coords.dot(&a.coords.cross(&b.coords)) / 6.0;
        (area + tri_area, volume + tri_volume)
    })
}

fn boundary_measures<'a>(core: &MeshCore, cycles: impl Iterator<Item = &'a [usize]>) -> (f32, f32) {
    cycles.fold((0.0, 0.0), |(area, volume), cycle| {
        let (a, v) = cycle_measures(core.vertices(), cycle);
        (area + a, volume + v)
    })
}

/// Analyze a mesh and compute statistics
pub fn analyze(mesh: &AnyMesh) -> MeshStats {
    let core = mesh.core();
    let mut stats = MeshStats {
        name: core.name().to_string(),
        kind: mesh.kind(),
        vertex_count: core.num_vertices(),
        edge_count: core.num_edges(),
        face_count: None,
        poly_count: core.num_polys(),
        visible_polys: core.visible_count(),
        surface_faces: core.num_polys(),
        boundary_edges: 0,
        bbox: core.bounding_box(),
        surface_area: 0.0,
        volume: None,
        quality: None,
    };

    if let Some(volume) = mesh.as_volume() {
        let surface = (0..volume.num_faces()).filter(|&fid| volume.face_is_on_surf(fid));
        let (area, enclosed) = boundary_measures(core, surface.map(|fid| volume.adj_f2v(fid)));
        stats.face_count = Some(volume.num_faces());
        stats.surface_faces = volume.surface_face_count();
        stats.surface_area = area;
        stats.volume = Some(enclosed.abs());
        stats.quality = QualitySummary::from_values(&volume.qualities());
    } else if let Some(surface) = mesh.as_surface() {
        let (area, enclosed) = boundary_measures(core, (0..core.num_polys()).map(|pid| core.adj_p2v(pid)));
        stats.boundary_edges = (0..core.num_edges()).filter(|&eid| surface.edge_is_boundary(eid)).count();
        stats.surface_area = area;
        stats.volume = (stats.boundary_edges == 0 && stats.poly_count > 0).then_some(enclosed.abs());
    }
    stats
}
