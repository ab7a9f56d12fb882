// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Render module - vertex extraction, materials and the drawable cache

mod drawable;
mod material;
mod vertex;

pub use drawable::{DrawRanges, Drawable};
pub use material::{Channel, ChannelBinding, LightingModel, Material, MaterialBinding, TextureHandle};
pub use vertex::{PrimitiveType, RenderVertex};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How triangle normals are chosen, or whether triangles are drawn at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Per-vertex averaged normals
    #[default]
    Smooth,
    /// One normal per triangle
    Flat,
    /// Lines only
    Wireframe,
}

impl FromStr for Shading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smooth" => Ok(Self::Smooth),
            "flat" => Ok(Self::Flat),
            "wireframe" | "wire" => Ok(Self::Wireframe),
            other => Err(format!("unknown shading '{}' (expected smooth, flat or wireframe)", other)),
        }
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Smooth => "smooth",
            Self::Flat => "flat",
            Self::Wireframe => "wireframe",
        };
        f.write_str(name)
    }
}

/// Turns mesh topology and color state into flat vertex lists.
///
/// Triangle extraction takes `&mut self` because it may fill the lazy
/// label palette and refresh interior vertex normals.
pub trait Extract {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex>;
    fn extract_wireframe(&self) -> Vec<RenderVertex>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shading_from_str() {
        assert_eq!("Flat".parse::<Shading>(), Ok(Shading::Flat));
        assert_eq!("wire".parse::<Shading>(), Ok(Shading::Wireframe));
        assert!("phong".parse::<Shading>().is_err());
        assert_eq!(Shading::default().to_string(), "smooth");
    }
}
