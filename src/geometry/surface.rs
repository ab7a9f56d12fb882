// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surface topology builder for triangle and quad meshes

use super::color::Rgba;
use super::mesh_core::{average, cycle_normal, MeshCore};
use super::error::validate_cells;
use super::TopologyError;
use nalgebra::{Point3, Vector2};

/// Per-poly texture coordinates, one entry per poly corner
pub type PolyUv = Vec<Vec<Vector2<f32>>>;

/// Polygonal surface with vertex/edge/poly adjacency
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    pub(crate) core: MeshCore,
    pub(crate) uv: Option<PolyUv>,
}

impl SurfaceMesh {
    /// Build the adjacency graph for polys of `arity` corners (3 or 4)
    pub fn build(
        arity: usize,
        vertices: Vec<Point3<f32>>,
        polys: Vec<Vec<usize>>,
        colors: Option<Vec<Rgba>>,
    ) -> Result<Self, TopologyError> {
        validate_cells(&polys, arity, vertices.len())?;

        let mut core = MeshCore::new();
        core.reserve(vertices.len(), polys.len());
        core.edges.reserve(polys.len() * arity);

        for vertex in vertices {
            core.add_vertex(vertex);
        }

        let mut mesh = Self { core, uv: None };
        for poly in polys {
            mesh.add_poly(poly);
        }
        mesh.core.init_poly_colors(colors)?;
        mesh.core.build_edge_adjacency();
        mesh.core.current_slice = super::SliceBox::from_bbox(&mesh.core.bbox);
        mesh.update_normals();

        tracing::debug!(
            vertices = mesh.core.num_vertices(),
            edges = mesh.core.num_edges(),
            polys = mesh.core.num_polys(),
            "built surface mesh"
        );
        Ok(mesh)
    }

    fn add_poly(&mut self, poly: Vec<usize>) -> usize {
        let core = &mut self.core;
        let pid = core.polys.len();
        let n = poly.len();

        let edge_ids: Vec<usize> = (0..n)
            .map(|i| core.edge_or_insert(poly[i], poly[(i + 1) % n]))
            .collect();

        for &vid in &poly {
            core.adj_v2p[vid].push(pid);
        }
        core.polys.push(poly);
        core.adj_p2e.push(Vec::new());
        core.adj_p2p.push(Vec::new());

        for eid in edge_ids {
            for i in 0..core.adj_e2p[eid].len() {
                let nbr = core.adj_e2p[eid][i];
                if nbr != pid && core.polys_are_adjacent(pid, nbr) && !core.adj_p2p[pid].contains(&nbr) {
                    core.adj_p2p[pid].push(nbr);
                    core.adj_p2p[nbr].push(pid);
                }
            }
            core.adj_e2p[eid].push(pid);
            core.adj_p2e[pid].push(eid);
        }

        core.visible.push(true);
        pid
    }

    /// Recompute face normals and per-vertex averages
    pub fn update_normals(&mut self) {
        let core = &mut self.core;
        core.normals = core
            .polys
            .iter()
            .map(|poly| cycle_normal(&core.vertices, poly))
            .collect();
        core.vert_normals = core
            .adj_v2p
            .iter()
            .map(|pids| average(pids.iter().map(|&pid| core.normals[pid])))
            .collect();
    }

    /// Hide one visible poly incident to the edge
    pub fn dig(&mut self, eid: usize) -> Option<usize> {
        let candidates = self.core.adj_e2p.get(eid)?.clone();
        self.core.toggle_first(&candidates, false)
    }

    /// Show one hidden poly incident to the edge
    pub fn undig(&mut self, eid: usize) -> Option<usize> {
        let candidates = self.core.adj_e2p.get(eid)?.clone();
        self.core.toggle_first(&candidates, true)
    }

    /// An edge is drawn when any incident poly is visible
    pub fn edge_is_visible(&self, eid: usize) -> bool {
        self.core.adj_e2p[eid].iter().any(|&pid| self.core.visible[pid])
    }

    /// Whether the edge lies on the open boundary of the surface
    pub fn edge_is_boundary(&self, eid: usize) -> bool {
        self.core.adj_e2p[eid].len() == 1
    }

    /// UV for a poly corner, when UVs were loaded for every poly
    pub fn corner_uv(&self, pid: usize, corner: usize) -> Vector2<f32> {
        self.uv
            .as_ref()
            .filter(|uv| uv.len() == self.core.polys.len())
            .and_then(|uv| uv[pid].get(corner).copied())
            .unwrap_or_else(Vector2::zeros)
    }

    pub fn set_uv(&mut self, uv: Option<PolyUv>) {
        self.uv = uv;
        self.core.dirty = true;
    }

    pub fn uv(&self) -> Option<&PolyUv> {
        self.uv.as_ref()
    }

    pub fn core(&self) -> &MeshCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut MeshCore {
        &mut self.core
    }
}
