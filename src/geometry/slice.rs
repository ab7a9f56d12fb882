// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Axis-aligned visibility box used to hide cells for interior inspection

use super::BoundingBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Closed interval along one axis
pub type AxisRange = (f32, f32);

/// Slice box with per-axis inversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceBox {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
    pub invert: [bool; 3],
}

impl SliceBox {
    pub fn new(x: AxisRange, y: AxisRange, z: AxisRange) -> Self {
        Self {
            x,
            y,
            z,
            invert: [false; 3],
        }
    }

    /// Slice box spanning a bounding box, nothing inverted
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::new(
            (bbox.min.x, bbox.max.x),
            (bbox.min.y, bbox.max.y),
            (bbox.min.z, bbox.max.z),
        )
    }

    pub fn inverted(mut self, invert_x: bool, invert_y: bool, invert_z: bool) -> Self {
        self.invert = [invert_x, invert_y, invert_z];
        self
    }

    fn range(&self, axis: usize) -> AxisRange {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Whether a poly with this centroid stays visible.
    ///
    /// The poly is hidden as soon as one axis reports
    /// `outside(range) != invert`.
    pub fn keeps(&self, centroid: &Point3<f32>) -> bool {
        (0..3).all(|axis| {
            let (lo, hi) = self.range(axis);
            let outside = centroid[axis] < lo || centroid[axis] > hi;
            outside == self.invert[axis]
        })
    }
}

impl Default for SliceBox {
    fn default() -> Self {
        Self::new((0.0, 100.0), (0.0, 100.0), (0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_inside_only() {
        let slice = SliceBox::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0));
        assert!(slice.keeps(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!slice.keeps(&Point3::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn test_inverted_axis_keeps_outside() {
        let slice = SliceBox::new((0.0, 1.0), (0.0, 10.0), (0.0, 10.0)).inverted(true, false, false);
        assert!(!slice.keeps(&Point3::new(0.5, 0.5, 0.5)));
        assert!(slice.keeps(&Point3::new(1.5, 0.5, 0.5)));
    }
}
