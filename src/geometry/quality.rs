// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scaled Jacobian quality for tetrahedra and hexahedra
//!
//! Both metrics return 1 for the ideal element and trend to 0 or below as
//! the element flattens or inverts. Cells the metric cannot be evaluated
//! on return the sentinel [`INVALID_QUALITY`].

use nalgebra::{Point3, Vector3};

/// Sentinel for degenerate or unevaluable cells
pub const INVALID_QUALITY: f32 = -1.0;

/// Hex minima above this value can only come from numerical breakdown
const HEX_UPPER_BOUND: f32 = 1.0001;

/// Principal frames flatter than this are treated as collapsed
const FLAT_FRAME_EPS: f32 = 1e-6;

/// `c0 · (c1 × c2)`
pub fn determinant(c0: &Vector3<f32>, c1: &Vector3<f32>, c2: &Vector3<f32>) -> f32 {
    c0.dot(&c1.cross(c2))
}

pub fn tet_scaled_jacobian(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>, p3: &Point3<f32>) -> f32 {
    let l0 = p1 - p0;
    let l1 = p2 - p1;
    let l2 = p0 - p2;
    let l3 = p3 - p0;
    let l4 = p3 - p1;
    let l5 = p3 - p2;

    let (n0, n1, n2) = (l0.norm(), l1.norm(), l2.norm());
    let (n3, n4, n5) = (l3.norm(), l4.norm(), l5.norm());

    let jacobian = l2.cross(&l0).dot(&l3);

    let lambda = [n0 * n2 * n3, n0 * n1 * n4, n1 * n2 * n5, n3 * n4 * n5]
        .into_iter()
        .fold(0.0f32, f32::max);

    if !lambda.is_finite() || lambda <= f32::MIN_POSITIVE {
        return INVALID_QUALITY;
    }
    jacobian * std::f32::consts::SQRT_2 / lambda
}

/// Scaled Jacobian of a hexahedron with `p0..p3` the bottom ring and
/// `p4..p7` the top ring directly above it.
pub fn hex_scaled_jacobian(p: &[Point3<f32>; 8]) -> f32 {
    let unit = |a: usize, b: usize| (p[b] - p[a]).normalize();

    let l0 = unit(0, 1);
    let l1 = unit(1, 2);
    let l2 = unit(2, 3);
    let l3 = unit(0, 3);
    let l4 = unit(0, 4);
    let l5 = unit(1, 5);
    let l6 = unit(2, 6);
    let l7 = unit(3, 7);
    let l8 = unit(4, 5);
    let l9 = unit(5, 6);
    let l10 = unit(6, 7);
    let l11 = unit(4, 7);

    let x0 = ((p[1] - p[0]) + (p[2] - p[3]) + (p[5] - p[4]) + (p[6] - p[7])).normalize();
    let x1 = ((p[3] - p[0]) + (p[2] - p[1]) + (p[7] - p[4]) + (p[6] - p[5])).normalize();
    let x2 = ((p[4] - p[0]) + (p[5] - p[1]) + (p[6] - p[2]) + (p[7] - p[3])).normalize();

    let frame = determinant(&x0, &x1, &x2);
    if !frame.is_finite() || frame.abs() < FLAT_FRAME_EPS {
        return INVALID_QUALITY;
    }

    let triads = [
        [l0, l3, l4],
        [l1, -l0, l5],
        [l2, -l1, l6],
        [-l3, -l2, l7],
        [l11, l8, -l4],
        [-l8, l9, -l5],
        [-l9, l10, -l6],
        [-l10, -l11, -l7],
    ];

    let mut min = frame;
    for [c0, c1, c2] in &triads {
        let det = determinant(c0, c1, c2);
        if !det.is_finite() {
            return INVALID_QUALITY;
        }
        min = min.min(det);
    }

    if min > HEX_UPPER_BOUND {
        INVALID_QUALITY
    } else {
        min
    }
}
