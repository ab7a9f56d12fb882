// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Dirty-flag cache of renderable vertex lists

use super::{Extract, Material, MaterialBinding, RenderVertex, Shading};
use crate::geometry::Geometry;
use std::ops::Range;

/// Which parts of the cached buffer to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRanges {
    pub triangles: Option<Range<usize>>,
    pub lines: Option<Range<usize>>,
}

/// A mesh together with its shading state and cached buffers.
///
/// The buffer holds every triangle record followed by every line record.
/// It is rebuilt by [`Drawable::buffer`] whenever the mesh is dirty, and the
/// dirty flag is cleared in the same call.
#[derive(Debug, Clone)]
pub struct Drawable<M> {
    mesh: M,
    shading: Shading,
    wireframe_enabled: bool,
    material: Material,
    vertices: Vec<RenderVertex>,
    triangle_count: usize,
    binding: MaterialBinding,
}

impl<M: Geometry + Extract> Drawable<M> {
    pub fn new(mesh: M) -> Self {
        let material = Material::default();
        let binding = material.resolve();
        let mut drawable = Self {
            mesh,
            shading: Shading::default(),
            wireframe_enabled: true,
            material,
            vertices: Vec::new(),
            triangle_count: 0,
            binding,
        };
        drawable.mesh.set_dirty(true);
        drawable
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.set_shading(shading);
        self
    }

    /// Regenerate the cached buffer if the mesh changed, then return it
    pub fn buffer(&mut self) -> &[RenderVertex] {
        if self.mesh.is_dirty() {
            let triangles = self.mesh.extract_triangles(self.shading);
            let wireframe = self.mesh.extract_wireframe();

            self.triangle_count = triangles.len();
            self.vertices = triangles;
            self.vertices.extend(wireframe);
            self.binding = self.material.resolve();
            self.mesh.set_dirty(false);

            tracing::trace!(
                mesh = self.mesh.name(),
                triangles = self.triangle_count / 3,
                lines = self.line_vertex_count() / 2,
                "rebuilt render buffer"
            );
        }
        &self.vertices
    }

    /// Ranges of the cached buffer to submit as triangles and as lines
    pub fn draw_ranges(&self) -> DrawRanges {
        let triangles = (self.shading != Shading::Wireframe && self.triangle_count > 0)
            .then(|| 0..self.triangle_count);
        let lines = ((self.wireframe_enabled || self.shading == Shading::Wireframe) && self.line_vertex_count() > 0)
            .then(|| self.triangle_count..self.vertices.len());
        DrawRanges { triangles, lines }
    }

    /// Triangle records of the last rebuild
    pub fn triangles(&self) -> &[RenderVertex] {
        &self.vertices[..self.triangle_count]
    }

    /// Line records of the last rebuild
    pub fn wireframe(&self) -> &[RenderVertex] {
        &self.vertices[self.triangle_count..]
    }

    fn line_vertex_count(&self) -> usize {
        self.vertices.len() - self.triangle_count
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn set_shading(&mut self, shading: Shading) {
        self.shading = shading;
        self.mesh.set_dirty(true);
    }

    pub fn wireframe_enabled(&self) -> bool {
        self.wireframe_enabled
    }

    pub fn set_wireframe_enabled(&mut self, enabled: bool) {
        self.wireframe_enabled = enabled;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.mesh.set_dirty(true);
    }

    /// Material as resolved at the last rebuild
    pub fn material_binding(&self) -> &MaterialBinding {
        &self.binding
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Mutable access to the mesh; mesh setters raise the dirty flag themselves
    pub fn mesh_mut(&mut self) -> &mut M {
        &mut self.mesh
    }

    pub fn into_mesh(self) -> M {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::Primitive;
    use crate::geometry::SliceBox;
    use crate::render::PrimitiveType;

    fn demo() -> Drawable<crate::mesh::AnyMesh> {
        Drawable::new(Primitive::DemoHex.to_mesh().unwrap())
    }

    #[test]
    fn test_buffer_clears_dirty_and_orders_records() {
        let mut drawable = demo();
        assert!(drawable.mesh().is_dirty());

        let buffer = drawable.buffer().to_vec();
        assert!(!drawable.mesh().is_dirty());
        assert_eq!(buffer.len(), 36 + 24);

        let first_line = buffer
            .iter()
            .position(|v| v.primitive() == PrimitiveType::Line)
            .unwrap();
        assert_eq!(first_line, 36);
        assert!(buffer[first_line..].iter().all(|v| v.primitive() == PrimitiveType::Line));
    }

    #[test]
    fn test_clean_mesh_keeps_cached_buffer() {
        let mut drawable = demo();
        drawable.buffer();
        drawable.mesh_mut().core_mut().set_visible(0, false);
        drawable.mesh_mut().set_dirty(false);
        assert_eq!(drawable.buffer().len(), 60);
    }

    #[test]
    fn test_shading_change_forces_rebuild() {
        let mut drawable = demo();
        drawable.buffer();
        drawable.set_shading(Shading::Flat);
        assert!(drawable.mesh().is_dirty());
        drawable.buffer();
        assert_eq!(drawable.triangles()[0].normal(), drawable.triangles()[1].normal());
    }

    #[test]
    fn test_draw_ranges_follow_shading() {
        let mut drawable = demo();
        drawable.buffer();
        assert_eq!(drawable.draw_ranges().triangles, Some(0..36));
        assert_eq!(drawable.draw_ranges().lines, Some(36..60));

        drawable.set_wireframe_enabled(false);
        assert_eq!(drawable.draw_ranges().lines, None);

        drawable.set_shading(Shading::Wireframe);
        drawable.buffer();
        let ranges = drawable.draw_ranges();
        assert_eq!(ranges.triangles, None);
        assert_eq!(ranges.lines, Some(36..60));
    }

    #[test]
    fn test_hidden_mesh_yields_empty_buffer() {
        let mut drawable = demo();
        drawable.buffer();
        let bbox = drawable.mesh().bounding_box();
        let far = SliceBox::new((bbox.max.x + 1.0, bbox.max.x + 2.0), (-10.0, 10.0), (-10.0, 10.0));
        drawable.mesh_mut().slice(far);
        assert!(drawable.buffer().is_empty());
        assert_eq!(drawable.draw_ranges(), DrawRanges { triangles: None, lines: None });
    }
}
