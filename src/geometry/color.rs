// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! RGBA color helpers

use nalgebra::Vector4;
use rand::Rng;

/// RGBA color with channels in `[0, 1]`
pub type Rgba = Vector4<f32>;

pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

pub fn rgba(c: [f32; 4]) -> Rgba {
    Rgba::new(c[0], c[1], c[2], c[3])
}

/// Light blue applied to polys without an explicit color
pub fn default_poly_color() -> Rgba {
    to_01_scale(Rgba::new(176.0, 222.0, 255.0, 255.0))
}

/// Salmon used for internal faces exposed by digging or slicing
pub fn default_internal_color() -> Rgba {
    Rgba::new(1.0, 197.0 / 255.0, 161.0 / 255.0, 1.0)
}

pub fn default_wireframe_color() -> Rgba {
    rgba(BLACK)
}

/// Map a 0–255 color to 0–1
pub fn to_01_scale(color: Rgba) -> Rgba {
    color / 255.0
}

/// Random opaque color
pub fn random_opaque<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    Rgba::new(rng.gen(), rng.gen(), rng.gen(), 1.0)
}

/// Ramp from red (`q <= 0`) through yellow (`q = 0.5`) to green (`q >= 1`).
///
/// The invalid-cell sentinel `-1` therefore shows as red.
pub fn quality_to_color(quality: f32) -> Rgba {
    let q = if quality.is_finite() { quality.clamp(0.0, 1.0) } else { 0.0 };
    if q < 0.5 {
        rgba(RED).lerp(&rgba(YELLOW), q * 2.0)
    } else {
        rgba(YELLOW).lerp(&rgba(GREEN), (q - 0.5) * 2.0)
    }
}
