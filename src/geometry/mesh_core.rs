// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh core shared by surface and volumetric meshes
//!
//! Owns vertex positions, edges, polys, the vertex/edge/poly adjacency
//! tables, per-poly color/label/visibility state, the slice box and the
//! dirty flag. Surface and volumetric builders add their own layers on top.

use super::color::{self, Rgba};
use super::{BoundingBox, SliceBox, TopologyError};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed for the lazily generated label palette
pub const DEFAULT_LABEL_SEED: u64 = 0x5eed_1abe1;

#[derive(Debug, Clone)]
pub struct MeshCore {
    pub(crate) name: String,
    pub(crate) vertices: Vec<Point3<f32>>,
    pub(crate) edges: Vec<[usize; 2]>,
    pub(crate) polys: Vec<Vec<usize>>,
    pub(crate) visible: Vec<bool>,

    pub(crate) adj_v2v: Vec<Vec<usize>>,
    pub(crate) adj_v2e: Vec<Vec<usize>>,
    pub(crate) adj_v2p: Vec<Vec<usize>>,
    pub(crate) adj_e2e: Vec<Vec<usize>>,
    pub(crate) adj_e2p: Vec<Vec<usize>>,
    pub(crate) adj_p2e: Vec<Vec<usize>>,
    pub(crate) adj_p2p: Vec<Vec<usize>>,

    pub(crate) poly_colors: Vec<Rgba>,
    pub(crate) labels: Option<Vec<i32>>,
    pub(crate) label_colors: AHashMap<i32, Rgba>,
    pub(crate) wireframe_color: Rgba,

    /// Per-poly normals for surfaces, per-face normals for volumes
    pub(crate) normals: Vec<Vector3<f32>>,
    pub(crate) vert_normals: Vec<Vector3<f32>>,

    pub(crate) bbox: BoundingBox,
    pub(crate) current_slice: SliceBox,
    pub(crate) dirty: bool,
    label_rng: StdRng,
}

impl MeshCore {
    pub fn new() -> Self {
        Self {
            name: "No Name".to_string(),
            vertices: Vec::new(),
            edges: Vec::new(),
            polys: Vec::new(),
            visible: Vec::new(),
            adj_v2v: Vec::new(),
            adj_v2e: Vec::new(),
            adj_v2p: Vec::new(),
            adj_e2e: Vec::new(),
            adj_e2p: Vec::new(),
            adj_p2e: Vec::new(),
            adj_p2p: Vec::new(),
            poly_colors: Vec::new(),
            labels: None,
            label_colors: AHashMap::new(),
            wireframe_color: color::default_wireframe_color(),
            normals: Vec::new(),
            vert_normals: Vec::new(),
            bbox: BoundingBox::empty(),
            current_slice: SliceBox::default(),
            dirty: false,
            label_rng: StdRng::seed_from_u64(DEFAULT_LABEL_SEED),
        }
    }

    pub(crate) fn reserve(&mut self, vertex_count: usize, poly_count: usize) {
        self.vertices.reserve(vertex_count);
        self.adj_v2v.reserve(vertex_count);
        self.adj_v2e.reserve(vertex_count);
        self.adj_v2p.reserve(vertex_count);
        self.polys.reserve(poly_count);
        self.visible.reserve(poly_count);
        self.adj_p2e.reserve(poly_count);
        self.adj_p2p.reserve(poly_count);
        self.poly_colors.reserve(poly_count);
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f32>) -> usize {
        let vid = self.vertices.len();
        self.vertices.push(position);
        self.adj_v2v.push(Vec::new());
        self.adj_v2e.push(Vec::new());
        self.adj_v2p.push(Vec::new());
        self.bbox.expand_to_include(&position);
        self.dirty = true;
        vid
    }

    /// Append a new edge. Callers check `edge_id` first.
    pub(crate) fn add_edge(&mut self, v0: usize, v1: usize) -> usize {
        let eid = self.edges.len();
        self.edges.push([v0, v1]);
        self.adj_e2p.push(Vec::new());
        self.adj_v2v[v0].push(v1);
        self.adj_v2v[v1].push(v0);
        self.adj_v2e[v0].push(eid);
        self.adj_v2e[v1].push(eid);
        eid
    }

    /// Existing edge between two vertices, or a newly created one
    pub(crate) fn edge_or_insert(&mut self, v0: usize, v1: usize) -> usize {
        match self.edge_id(v0, v1) {
            Some(eid) => eid,
            None => self.add_edge(v0, v1),
        }
    }

    /// Edges sharing a vertex with each edge. Runs once after all polys are in.
    pub(crate) fn build_edge_adjacency(&mut self) {
        self.adj_e2e = self
            .edges
            .iter()
            .enumerate()
            .map(|(eid, edge)| {
                edge.iter()
                    .flat_map(|&vid| self.adj_v2e[vid].iter().copied())
                    .filter(|&e| e != eid)
                    .collect()
            })
            .collect();
    }

    /// Apply explicit per-poly colors, or the default color everywhere
    pub(crate) fn init_poly_colors(&mut self, colors: Option<Vec<Rgba>>) -> Result<(), TopologyError> {
        match colors {
            Some(colors) if colors.len() != self.polys.len() => Err(TopologyError::AttributeCount {
                what: "poly colors",
                expected: self.polys.len(),
                found: colors.len(),
            }),
            Some(colors) => {
                self.poly_colors = colors;
                Ok(())
            }
            None => {
                self.poly_colors = vec![color::default_poly_color(); self.polys.len()];
                Ok(())
            }
        }
    }

    pub(crate) fn init_labels(&mut self, labels: Option<Vec<i32>>) -> Result<(), TopologyError> {
        if let Some(labels) = &labels {
            if labels.len() != self.polys.len() {
                return Err(TopologyError::AttributeCount {
                    what: "labels",
                    expected: self.polys.len(),
                    found: labels.len(),
                });
            }
        }
        self.labels = labels;
        Ok(())
    }

    pub fn edge_id(&self, v0: usize, v1: usize) -> Option<usize> {
        self.adj_v2e
            .get(v0)?
            .iter()
            .copied()
            .find(|&eid| {
                let [a, b] = self.edges[eid];
                (a == v0 && b == v1) || (a == v1 && b == v0)
            })
    }

    /// Two polys are adjacent when they share exactly two vertices
    pub fn polys_are_adjacent(&self, p0: usize, p1: usize) -> bool {
        let a = &self.polys[p0];
        let b = &self.polys[p1];
        let mut shared: Vec<usize> = a.iter().copied().filter(|v| b.contains(v)).collect();
        shared.sort_unstable();
        shared.dedup();
        shared.len() == 2
    }

    pub fn poly_centroid(&self, pid: usize) -> Point3<f32> {
        centroid(&self.vertices, &self.polys[pid])
    }

    pub fn poly_aabb(&self, pid: usize) -> BoundingBox {
        BoundingBox::from_points(self.polys[pid].iter().map(|&vid| &self.vertices[vid]))
    }

    /// Point at parameter `t` along an edge; `t = 1` is the first endpoint
    pub fn sample_edge(&self, eid: usize, t: f32) -> Point3<f32> {
        let [v0, v1] = self.edges[eid];
        Point3::from(self.vertices[v0].coords * t + self.vertices[v1].coords * (1.0 - t))
    }

    pub fn pick_vertex(&self, point: &Point3<f32>) -> Option<usize> {
        nearest(point, self.vertices.iter().copied())
    }

    pub fn pick_edge(&self, point: &Point3<f32>) -> Option<usize> {
        nearest(point, (0..self.edges.len()).map(|eid| self.sample_edge(eid, 0.5)))
    }

    pub fn pick_poly(&self, point: &Point3<f32>) -> Option<usize> {
        nearest(point, (0..self.polys.len()).map(|pid| self.poly_centroid(pid)))
    }

    /// Recompute poly visibility from a slice box.
    ///
    /// Skipped when the box matches the cached one or when the mesh still
    /// has pending changes that have not been extracted.
    pub fn slice(&mut self, slice: SliceBox) {
        if self.dirty || slice == self.current_slice {
            return;
        }
        self.current_slice = slice;
        for pid in 0..self.polys.len() {
            self.visible[pid] = slice.keeps(&self.poly_centroid(pid));
        }
        self.dirty = true;
    }

    /// Make every poly visible and reset the slice box to the bounding box
    pub fn reset(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
        self.current_slice = SliceBox::from_bbox(&self.bbox);
        self.dirty = true;
    }

    /// Toggle the first candidate poly whose visibility differs from `make_visible`
    pub(crate) fn toggle_first(&mut self, candidates: &[usize], make_visible: bool) -> Option<usize> {
        let pid = candidates
            .iter()
            .copied()
            .find(|&pid| self.visible[pid] != make_visible)?;
        self.visible[pid] = make_visible;
        self.dirty = true;
        Some(pid)
    }

    pub fn set_poly_color(&mut self, pid: usize, color: Rgba) {
        self.poly_colors[pid] = color;
        self.dirty = true;
    }

    /// Either one color for every poly or exactly one color per poly
    pub fn set_poly_colors(&mut self, colors: &[Rgba]) -> Result<(), TopologyError> {
        match colors.len() {
            1 => self.poly_colors.iter_mut().for_each(|c| *c = colors[0]),
            n if n == self.poly_colors.len() => self.poly_colors.copy_from_slice(colors),
            n => {
                return Err(TopologyError::AttributeCount {
                    what: "poly colors",
                    expected: self.poly_colors.len(),
                    found: n,
                })
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Assign a label; meshes built without labels start from label 0
    pub fn set_label(&mut self, pid: usize, label: i32) {
        let count = self.polys.len();
        self.labels.get_or_insert_with(|| vec![0; count])[pid] = label;
        self.dirty = true;
    }

    pub fn set_label_color(&mut self, label: i32, color: Rgba) {
        self.label_colors.insert(label, color);
        self.dirty = true;
    }

    /// Color for a label, picking a random one the first time it is seen
    pub fn label_color(&mut self, label: i32) -> Rgba {
        let rng = &mut self.label_rng;
        *self
            .label_colors
            .entry(label)
            .or_insert_with(|| color::random_opaque(rng))
    }

    /// Restart the label palette from a new seed
    pub fn set_label_seed(&mut self, seed: u64) {
        self.label_rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_wireframe_color(&mut self, color: Rgba) {
        self.wireframe_color = color;
        self.dirty = true;
    }

    pub fn set_visible(&mut self, pid: usize, visible: bool) {
        self.visible[pid] = visible;
        self.dirty = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    pub fn polys(&self) -> &[Vec<usize>] {
        &self.polys
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_polys(&self) -> usize {
        self.polys.len()
    }

    pub fn is_visible(&self, pid: usize) -> bool {
        self.visible[pid]
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    pub fn poly_color(&self, pid: usize) -> Rgba {
        self.poly_colors[pid]
    }

    pub fn label(&self, pid: usize) -> Option<i32> {
        self.labels.as_ref().map(|labels| labels[pid])
    }

    pub fn labels(&self) -> Option<&[i32]> {
        self.labels.as_deref()
    }

    pub fn wireframe_color(&self) -> Rgba {
        self.wireframe_color
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn vertex_normals(&self) -> &[Vector3<f32>] {
        &self.vert_normals
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn current_slice(&self) -> SliceBox {
        self.current_slice
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn adj_v2v(&self, vid: usize) -> &[usize] {
        &self.adj_v2v[vid]
    }

    pub fn adj_v2e(&self, vid: usize) -> &[usize] {
        &self.adj_v2e[vid]
    }

    pub fn adj_v2p(&self, vid: usize) -> &[usize] {
        &self.adj_v2p[vid]
    }

    pub fn adj_e2v(&self, eid: usize) -> &[usize] {
        &self.edges[eid]
    }

    pub fn adj_e2e(&self, eid: usize) -> &[usize] {
        &self.adj_e2e[eid]
    }

    pub fn adj_e2p(&self, eid: usize) -> &[usize] {
        &self.adj_e2p[eid]
    }

    pub fn adj_p2v(&self, pid: usize) -> &[usize] {
        &self.polys[pid]
    }

    pub fn adj_p2e(&self, pid: usize) -> &[usize] {
        &self.adj_p2e[pid]
    }

    pub fn adj_p2p(&self, pid: usize) -> &[usize] {
        &self.adj_p2p[pid]
    }
}

impl Default for MeshCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Average position of a vertex cycle
pub fn centroid(vertices: &[Point3<f32>], cycle: &[usize]) -> Point3<f32> {
    let sum = cycle
        .iter()
        .fold(Vector3::zeros(), |acc, &vid| acc + vertices[vid].coords);
    Point3::from(sum / cycle.len() as f32)
}

/// Unit normal of a triangle or quad cycle anchored at its first vertex.
///
/// Quads use the `v1`/`v3` diagonal pair. Degenerate cycles give a zero vector.
pub fn cycle_normal(vertices: &[Point3<f32>], cycle: &[usize]) -> Vector3<f32> {
    let origin = vertices[cycle[0]];
    let a = vertices[cycle[1]] - origin;
    let b = if cycle.len() == 3 {
        vertices[cycle[2]] - origin
    } else {
        vertices[cycle[3]] - origin
    };
    a.cross(&b).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Mean of a set of normals; zero when the set is empty
pub(crate) fn average(normals: impl Iterator<Item = Vector3<f32>>) -> Vector3<f32> {
    let (sum, count) = normals.fold((Vector3::zeros(), 0usize), |(sum, n), normal| (sum + normal, n + 1));
    if count == 0 {
        sum
    } else {
        sum / count as f32
    }
}

/// Index of the candidate nearest to `point`. Ties go to the lowest index.
pub(crate) fn nearest(point: &Point3<f32>, candidates: impl Iterator<Item = Point3<f32>>) -> Option<usize> {
    let mut ordered: Vec<(f32, usize)> = candidates
        .enumerate()
        .map(|(idx, candidate)| (nalgebra::distance(point, &candidate), idx))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    ordered.first().map(|&(_, idx)| idx)
}
