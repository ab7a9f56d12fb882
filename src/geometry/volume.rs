// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Volumetric topology builder for tetrahedral and hexahedral meshes
//!
//! Cells are split into faces with a fixed winding table. Faces shared by
//! two cells are stored once, which gives the surface/internal
//! classification and the cell-to-cell adjacency without half-edges.

use super::color::{self, Rgba};
use super::mesh_core::{average, centroid, cycle_normal, nearest, MeshCore};
use super::error::validate_cells;
use super::quality::{hex_scaled_jacobian, tet_scaled_jacobian};
use super::{SliceBox, TopologyError};
use ahash::AHashMap;
use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tet faces, outward winding for a positively oriented tet
const TET_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];

/// Hex faces: bottom, +x side, top, -x side, front, back
const HEX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [1, 2, 6, 5],
    [4, 5, 6, 7],
    [3, 0, 4, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Tetrahedron,
    Hexahedron,
}

impl CellKind {
    pub fn arity(&self) -> usize {
        match self {
            CellKind::Tetrahedron => 4,
            CellKind::Hexahedron => 8,
        }
    }

    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            4 => Some(CellKind::Tetrahedron),
            8 => Some(CellKind::Hexahedron),
            _ => None,
        }
    }

    /// Faces of a cell in the winding used by the builder
    pub fn faces_of(&self, cell: &[usize]) -> Vec<Vec<usize>> {
        match self {
            CellKind::Tetrahedron => TET_FACES
                .iter()
                .map(|face| face.iter().map(|&corner| cell[corner]).collect())
                .collect(),
            CellKind::Hexahedron => HEX_FACES
                .iter()
                .map(|face| face.iter().map(|&corner| cell[corner]).collect())
                .collect(),
        }
    }

    /// Scaled Jacobian of a cell from its corner positions
    pub fn scaled_jacobian(&self, corners: &[Point3<f32>]) -> f32 {
        match self {
            CellKind::Tetrahedron => tet_scaled_jacobian(&corners[0], &corners[1], &corners[2], &corners[3]),
            CellKind::Hexahedron => {
                let p: [Point3<f32>; 8] = std::array::from_fn(|i| corners[i]);
                hex_scaled_jacobian(&p)
            }
        }
    }
}

/// How volumetric cells pick the color of their faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Per-cell color, internal faces optionally tinted
    #[default]
    PolyColor,
    /// Color by cell label
    Label,
    /// Color by scaled Jacobian
    Quality,
}

/// Tetrahedral or hexahedral mesh with a deduplicated face layer
#[derive(Debug, Clone)]
pub struct VolumeMesh {
    pub(crate) core: MeshCore,
    kind: CellKind,
    faces: Vec<Vec<usize>>,
    /// Sorted vertex set -> face id
    face_lookup: AHashMap<Vec<usize>, usize>,

    adj_v2f: Vec<Vec<usize>>,
    adj_e2f: Vec<Vec<usize>>,
    adj_f2e: Vec<Vec<usize>>,
    adj_f2f: Vec<Vec<usize>>,
    adj_f2p: Vec<Vec<usize>>,
    adj_p2f: Vec<Vec<usize>>,

    internal_color: Rgba,
    use_internal_color: bool,
    color_mode: ColorMode,
}

impl VolumeMesh {
    pub fn build(
        kind: CellKind,
        vertices: Vec<Point3<f32>>,
        cells: Vec<Vec<usize>>,
        labels: Option<Vec<i32>>,
    ) -> Result<Self, TopologyError> {
        validate_cells(&cells, kind.arity(), vertices.len())?;

        let mut mesh = Self {
            core: MeshCore::new(),
            kind,
            faces: Vec::new(),
            face_lookup: AHashMap::new(),
            adj_v2f: Vec::with_capacity(vertices.len()),
            adj_e2f: Vec::new(),
            adj_f2e: Vec::new(),
            adj_f2f: Vec::new(),
            adj_f2p: Vec::new(),
            adj_p2f: Vec::with_capacity(cells.len()),
            internal_color: color::default_internal_color(),
            use_internal_color: true,
            color_mode: ColorMode::default(),
        };
        mesh.core.reserve(vertices.len(), cells.len());

        for vertex in vertices {
            mesh.core.add_vertex(vertex);
            mesh.adj_v2f.push(Vec::new());
        }
        for cell in cells {
            mesh.add_cell(cell);
        }

        mesh.core.init_poly_colors(None)?;
        mesh.core.init_labels(labels)?;
        mesh.core.build_edge_adjacency();
        mesh.core.current_slice = SliceBox::from_bbox(&mesh.core.bbox);
        mesh.update_normals();

        tracing::debug!(
            kind = ?mesh.kind,
            vertices = mesh.core.num_vertices(),
            edges = mesh.core.num_edges(),
            faces = mesh.faces.len(),
            cells = mesh.core.num_polys(),
            "built volume mesh"
        );
        Ok(mesh)
    }

    fn edge_or_insert(&mut self, v0: usize, v1: usize) -> usize {
        if let Some(eid) = self.core.edge_id(v0, v1) {
            return eid;
        }
        let eid = self.core.add_edge(v0, v1);
        self.adj_e2f.push(Vec::new());
        eid
    }

    fn add_face(&mut self, face: Vec<usize>) -> usize {
        let fid = self.faces.len();
        let n = face.len();

        let edge_ids: Vec<usize> = (0..n)
            .map(|i| self.edge_or_insert(face[i], face[(i + 1) % n]))
            .collect();

        for &vid in &face {
            self.adj_v2f[vid].push(fid);
        }
        self.face_lookup.insert(sorted(&face), fid);
        self.faces.push(face);
        self.adj_f2e.push(Vec::new());
        self.adj_f2f.push(Vec::new());
        self.adj_f2p.push(Vec::new());

        for eid in edge_ids {
            for i in 0..self.adj_e2f[eid].len() {
                let nbr = self.adj_e2f[eid][i];
                if nbr != fid && !self.adj_f2f[fid].contains(&nbr) {
                    self.adj_f2f[fid].push(nbr);
                    self.adj_f2f[nbr].push(fid);
                }
            }
            self.adj_e2f[eid].push(fid);
            self.adj_f2e[fid].push(eid);
        }
        fid
    }

    fn add_cell(&mut self, cell: Vec<usize>) -> usize {
        let face_ids: Vec<usize> = self
            .kind
            .faces_of(&cell)
            .into_iter()
            .map(|face| match self.face_id(&face) {
                Some(fid) => fid,
                None => self.add_face(face),
            })
            .collect();

        let pid = self.core.polys.len();
        self.core.adj_p2e.push(Vec::new());
        self.core.adj_p2p.push(Vec::new());
        self.adj_p2f.push(face_ids.clone());

        for &fid in &face_ids {
            self.adj_f2p[fid].push(pid);
        }
        for &vid in &cell {
            self.core.adj_v2p[vid].push(pid);
        }

        for &fid in &face_ids {
            for &eid in &self.adj_f2e[fid] {
                if !self.core.adj_p2e[pid].contains(&eid) {
                    self.core.adj_e2p[eid].push(pid);
                    self.core.adj_p2e[pid].push(eid);
                }
            }
            for &nbr in &self.adj_f2p[fid] {
                if nbr != pid && !self.core.adj_p2p[pid].contains(&nbr) {
                    self.core.adj_p2p[pid].push(nbr);
                    self.core.adj_p2p[nbr].push(pid);
                }
            }
        }

        self.core.visible.push(true);
        self.core.polys.push(cell);
        pid
    }

    /// Face with the same vertex set, if one exists
    pub fn face_id(&self, face: &[usize]) -> Option<usize> {
        self.face_lookup.get(&sorted(face)).copied()
    }

    /// Recompute face normals and per-vertex averages.
    ///
    /// Surface vertices average their surface faces; interior vertices
    /// average the faces currently exposed by digging or slicing.
    pub fn update_normals(&mut self) {
        self.core.normals = self
            .faces
            .iter()
            .map(|face| cycle_normal(&self.core.vertices, face))
            .collect();

        let vert_normals = (0..self.core.num_vertices())
            .map(|vid| {
                let on_surf = self.vert_is_on_surf(vid);
                average(
                    self.adj_v2f[vid]
                        .iter()
                        .copied()
                        .filter(|&fid| {
                            if on_surf {
                                self.face_is_on_surf(fid)
                            } else {
                                self.face_is_visible(fid)
                            }
                        })
                        .map(|fid| self.core.normals[fid]),
                )
            })
            .collect();
        self.core.vert_normals = vert_normals;
    }

    pub fn face_is_on_surf(&self, fid: usize) -> bool {
        self.adj_f2p[fid].len() == 1
    }

    pub fn vert_is_on_surf(&self, vid: usize) -> bool {
        self.adj_v2f[vid].iter().any(|&fid| self.face_is_on_surf(fid))
    }

    pub fn edge_is_on_surf(&self, eid: usize) -> bool {
        self.adj_e2f[eid].iter().any(|&fid| self.face_is_on_surf(fid))
    }

    pub fn poly_is_on_surf(&self, pid: usize) -> bool {
        self.adj_p2f[pid].iter().any(|&fid| self.face_is_on_surf(fid))
    }

    /// Surface faces, and internal faces between a visible and a hidden cell
    pub fn face_is_visible(&self, fid: usize) -> bool {
        if self.face_is_on_surf(fid) {
            return true;
        }
        let cells = &self.adj_f2p[fid];
        let any_visible = cells.iter().any(|&pid| self.core.visible[pid]);
        let any_hidden = cells.iter().any(|&pid| !self.core.visible[pid]);
        any_visible && any_hidden
    }

    /// Edges are drawn when they touch a visible cell and a visible face
    pub fn edge_is_visible(&self, eid: usize) -> bool {
        let on_visible_cell = self.core.adj_e2p[eid].iter().any(|&pid| self.core.visible[pid]);
        on_visible_cell && self.adj_e2f[eid].iter().any(|&fid| self.face_is_visible(fid))
    }

    pub fn faces_are_adjacent(&self, f0: usize, f1: usize) -> bool {
        self.adj_f2e[f0]
            .iter()
            .any(|&eid| self.adj_e2f[eid].contains(&f1))
    }

    pub fn face_centroid(&self, fid: usize) -> Point3<f32> {
        centroid(&self.core.vertices, &self.faces[fid])
    }

    pub fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        nearest(point, (0..self.faces.len()).map(|fid| self.face_centroid(fid)))
    }

    /// Hide one visible cell incident to the face
    pub fn dig(&mut self, fid: usize) -> Option<usize> {
        let candidates = self.adj_f2p.get(fid)?.clone();
        self.core.toggle_first(&candidates, false)
    }

    /// Show one hidden cell incident to the face
    pub fn undig(&mut self, fid: usize) -> Option<usize> {
        let candidates = self.adj_f2p.get(fid)?.clone();
        self.core.toggle_first(&candidates, true)
    }

    pub fn quality(&self, pid: usize) -> f32 {
        let corners: Vec<Point3<f32>> = self.core.polys[pid]
            .iter()
            .map(|&vid| self.core.vertices[vid])
            .collect();
        self.kind.scaled_jacobian(&corners)
    }

    /// Quality of every cell, evaluated in parallel
    pub fn qualities(&self) -> Vec<f32> {
        (0..self.core.num_polys())
            .into_par_iter()
            .map(|pid| self.quality(pid))
            .collect()
    }

    /// Color for one face of one cell under the current color mode
    pub fn face_color(&mut self, pid: usize, fid: usize) -> Rgba {
        match self.color_mode {
            ColorMode::Label => {
                let label = self.core.label(pid).unwrap_or(0);
                self.core.label_color(label)
            }
            ColorMode::Quality => color::quality_to_color(self.quality(pid)),
            ColorMode::PolyColor => {
                if self.use_internal_color && !self.face_is_on_surf(fid) {
                    self.internal_color
                } else {
                    self.core.poly_colors[pid]
                }
            }
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.core.dirty = true;
    }

    /// Turning internal coloring on also leaves label coloring
    pub fn set_use_internal_color(&mut self, enabled: bool) {
        if enabled && self.color_mode == ColorMode::Label {
            self.color_mode = ColorMode::PolyColor;
        }
        self.use_internal_color = enabled;
        self.core.dirty = true;
    }

    pub fn set_internal_color(&mut self, color: Rgba) {
        self.internal_color = color;
        self.core.dirty = true;
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn internal_color(&self) -> Rgba {
        self.internal_color
    }

    pub fn uses_internal_color(&self) -> bool {
        self.use_internal_color
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn surface_face_count(&self) -> usize {
        (0..self.faces.len()).filter(|&fid| self.face_is_on_surf(fid)).count()
    }

    pub fn adj_v2f(&self, vid: usize) -> &[usize] {
        &self.adj_v2f[vid]
    }

    pub fn adj_e2f(&self, eid: usize) -> &[usize] {
        &self.adj_e2f[eid]
    }

    pub fn adj_f2v(&self, fid: usize) -> &[usize] {
        &self.faces[fid]
    }

    pub fn adj_f2e(&self, fid: usize) -> &[usize] {
        &self.adj_f2e[fid]
    }

    pub fn adj_f2f(&self, fid: usize) -> &[usize] {
        &self.adj_f2f[fid]
    }

    pub fn adj_f2p(&self, fid: usize) -> &[usize] {
        &self.adj_f2p[fid]
    }

    pub fn adj_p2f(&self, pid: usize) -> &[usize] {
        &self.adj_p2f[pid]
    }

    pub fn core(&self) -> &MeshCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut MeshCore {
        &mut self.core
    }
}

fn sorted(face: &[usize]) -> Vec<usize> {
    let mut key = face.to_vec();
    key.sort_unstable();
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two unit hexes stacked along x, sharing the face at x = 1
    fn two_hexes() -> VolumeMesh {
        let mut vertices = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..3 {
                    vertices.push(Point3::new(x as f32, y as f32, z as f32));
                }
            }
        }
        let at = |x: usize, y: usize, z: usize| x + 3 * y + 6 * z;
        let hex = |x: usize| {
            vec![
                at(x, 0, 0),
                at(x + 1, 0, 0),
                at(x + 1, 1, 0),
                at(x, 1, 0),
                at(x, 0, 1),
                at(x + 1, 0, 1),
                at(x + 1, 1, 1),
                at(x, 1, 1),
            ]
        };
        VolumeMesh::build(CellKind::Hexahedron, vertices, vec![hex(0), hex(1)], Some(vec![1, 2])).unwrap()
    }

    #[test]
    fn test_shared_face_is_stored_once() {
        let mesh = two_hexes();
        assert_eq!(mesh.num_faces(), 11);
        assert_eq!(mesh.surface_face_count(), 10);
        assert_eq!(mesh.core().num_edges(), 20);
        assert_eq!(mesh.core().adj_p2p(0), &[1]);
        assert_eq!(mesh.core().adj_p2p(1), &[0]);
    }

    #[test]
    fn test_internal_face_visibility_follows_dig() {
        let mut mesh = two_hexes();
        let shared = mesh.adj_p2f(0).iter().copied().find(|&f| !mesh.face_is_on_surf(f)).unwrap();
        assert!(!mesh.face_is_visible(shared));
        assert_eq!(mesh.dig(shared), Some(0));
        assert!(mesh.face_is_visible(shared));
        assert_eq!(mesh.dig(shared), Some(1));
        assert!(!mesh.face_is_visible(shared));
        assert_eq!(mesh.undig(shared), Some(0));
        assert_eq!(mesh.dig(1000), None);
    }

    #[test]
    fn test_every_vertex_is_on_surface() {
        let mesh = two_hexes();
        assert!((0..mesh.core().num_vertices()).all(|v| mesh.vert_is_on_surf(v)));
        assert!((0..mesh.core().num_polys()).all(|p| mesh.poly_is_on_surf(p)));
    }

    #[test]
    fn test_face_lookup_ignores_winding() {
        let mesh = two_hexes();
        let face = mesh.faces()[0].clone();
        let mut reversed = face.clone();
        reversed.reverse();
        assert_eq!(mesh.face_id(&reversed), Some(0));
    }

    #[test]
    fn test_hex_quality_and_color_modes() {
        let mut mesh = two_hexes();
        for q in mesh.qualities() {
            assert_relative_eq!(q, 1.0, epsilon = 1e-5);
        }
        mesh.set_color_mode(ColorMode::Quality);
        assert_relative_eq!(mesh.face_color(0, 0), color::rgba(color::GREEN), epsilon = 1e-4);

        mesh.set_color_mode(ColorMode::Label);
        let label_one = mesh.face_color(0, 0);
        assert_eq!(mesh.face_color(0, 1), label_one);

        mesh.set_use_internal_color(true);
        assert_eq!(mesh.color_mode(), ColorMode::PolyColor);
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let err = VolumeMesh::build(CellKind::Tetrahedron, vec![Point3::origin(); 8], vec![vec![0, 1, 2]], None)
            .unwrap_err();
        assert!(matches!(err, TopologyError::CellSize { expected: 4, found: 3, .. }));
    }

    #[test]
    fn test_rejects_collapsed_cell() {
        let err = VolumeMesh::build(CellKind::Tetrahedron, vec![Point3::origin(); 4], vec![vec![0, 1, 2, 1]], None)
            .unwrap_err();
        assert_eq!(err, TopologyError::DegenerateCell { poly: 0, vertex: 1 });
    }
}
