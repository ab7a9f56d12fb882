// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GPU-ready vertex records

use crate::geometry::Rgba;
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Primitive tag stored in every record
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    Triangle = 0,
    Line = 1,
}

/// One vertex of a triangle list or line list.
///
/// The layout is `#[repr(C)]` and made of plain `f32`/`i32` arrays so a
/// slice of records can be copied straight into a vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub poly_centroid: [f32; 3],
    pub primitive_type: i32,
}

impl RenderVertex {
    pub fn triangle(
        position: &Point3<f32>,
        color: &Rgba,
        normal: &Vector3<f32>,
        uv: &Vector2<f32>,
        poly_centroid: &Point3<f32>,
    ) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color: [color.x, color.y, color.z, color.w],
            normal: [normal.x, normal.y, normal.z],
            uv: [uv.x, uv.y],
            poly_centroid: [poly_centroid.x, poly_centroid.y, poly_centroid.z],
            primitive_type: PrimitiveType::Triangle as i32,
        }
    }

    /// Wireframe endpoint; lines carry an up normal and no UV
    pub fn line(position: &Point3<f32>, color: &Rgba) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color: [color.x, color.y, color.z, color.w],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
            poly_centroid: [0.0, 0.0, 0.0],
            primitive_type: PrimitiveType::Line as i32,
        }
    }

    pub fn primitive(&self) -> PrimitiveType {
        if self.primitive_type == PrimitiveType::Line as i32 {
            PrimitiveType::Line
        } else {
            PrimitiveType::Triangle
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn normal(&self) -> Vector3<f32> {
        Vector3::from(self.normal)
    }

    pub fn color(&self) -> Rgba {
        Rgba::from(self.color)
    }
}
