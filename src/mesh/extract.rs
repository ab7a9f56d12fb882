// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex list generation shared by the concrete mesh kinds
//!
//! Every poly or face is emitted as one or more triangles picked from its
//! corner cycle by a split table, so triangles and quads share the same
//! loop and only differ in the table they pass.

use crate::geometry::{color, cycle_normal, ColorMode, SurfaceMesh, VolumeMesh};
use crate::render::{RenderVertex, Shading};
use nalgebra::{Point3, Vector3};

/// Triangles of a triangle cycle
pub(crate) const TRIANGLE_SPLIT: [[usize; 3]; 1] = [[0, 1, 2]];

/// Triangles of a quad cycle, sharing the 1-3 diagonal
pub(crate) const QUAD_SPLIT: [[usize; 3]; 2] = [[0, 1, 3], [1, 2, 3]];

fn triangle_normal(positions: &[Point3<f32>; 3]) -> Vector3<f32> {
    cycle_normal(positions, &[0, 1, 2])
}

pub(crate) fn surface_triangles(
    surface: &SurfaceMesh,
    shading: Shading,
    split: &[[usize; 3]],
) -> Vec<RenderVertex> {
    let core = surface.core();
    let mut out = Vec::with_capacity(core.visible_count() * split.len() * 3);

    for (pid, poly) in core.polys().iter().enumerate() {
        if !core.is_visible(pid) {
            continue;
        }
        let color = core.poly_color(pid);
        let centroid = core.poly_centroid(pid);

        for corners in split {
            let positions = corners.map(|c| core.vertices()[poly[c]]);
            let flat = triangle_normal(&positions);
            for (i, &corner) in corners.iter().enumerate() {
                let normal = match shading {
                    Shading::Smooth => core.vertex_normals()[poly[corner]],
                    _ => flat,
                };
                let uv = surface.corner_uv(pid, corner);
                out.push(RenderVertex::triangle(&positions[i], &color, &normal, &uv, &centroid));
            }
        }
    }
    out
}

/// Edges incident to at least one visible poly
pub(crate) fn surface_wireframe(surface: &SurfaceMesh) -> Vec<RenderVertex> {
    let core = surface.core();
    let color = core.wireframe_color();
    (0..core.num_edges())
        .filter(|&eid| surface.edge_is_visible(eid))
        .flat_map(|eid| core.edges()[eid])
        .map(|vid| RenderVertex::line(&core.vertices()[vid], &color))
        .collect()
}

/// Visible faces of visible cells, colored per the volume's color mode
pub(crate) fn volume_triangles(
    volume: &mut VolumeMesh,
    shading: Shading,
    split: &[[usize; 3]],
) -> Vec<RenderVertex> {
    if shading == Shading::Smooth {
        volume.update_normals();
    }

    // quality coloring is per cell, evaluate every cell once
    let qualities = match volume.color_mode() {
        ColorMode::Quality => Some(volume.qualities()),
        _ => None,
    };

    let mut out = Vec::new();
    for pid in 0..volume.core().num_polys() {
        if !volume.core().is_visible(pid) {
            continue;
        }
        let centroid = volume.core().poly_centroid(pid);
        let faces = volume.adj_p2f(pid).to_vec();

        for fid in faces {
            if !volume.face_is_visible(fid) {
                continue;
            }
            let color = match &qualities {
                Some(q) => color::quality_to_color(q[pid]),
                None => volume.face_color(pid, fid),
            };
            let face = &volume.faces()[fid];
            let core = volume.core();

            for corners in split {
                let positions = corners.map(|c| core.vertices()[face[c]]);
                let flat = triangle_normal(&positions);
                for (i, &corner) in corners.iter().enumerate() {
                    let normal = match shading {
                        Shading::Smooth => core.vertex_normals()[face[corner]],
                        _ => flat,
                    };
                    out.push(RenderVertex::triangle(
                        &positions[i],
                        &color,
                        &normal,
                        &nalgebra::Vector2::zeros(),
                        &centroid,
                    ));
                }
            }
        }
    }
    out
}

/// Edges touching both a visible cell and a visible face
pub(crate) fn volume_wireframe(volume: &VolumeMesh) -> Vec<RenderVertex> {
    let core = volume.core();
    let color = core.wireframe_color();
    (0..core.num_edges())
        .filter(|&eid| volume.edge_is_visible(eid))
        .flat_map(|eid| core.edges()[eid])
        .map(|vid| RenderVertex::line(&core.vertices()[vid], &color))
        .collect()
}
