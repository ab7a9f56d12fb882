// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surface materials
//!
//! Each lighting channel is either a flat color or a handle to a texture
//! owned by the host renderer. Channels are resolved when a drawable
//! rebuilds its buffers: flat colors become 1x1 RGBA8 texels, handles pass
//! through untouched.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Opaque id of a texture owned by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Color(Vector3<f32>),
    Texture(TextureHandle),
}

impl Channel {
    pub fn white() -> Self {
        Self::Color(Vector3::new(1.0, 1.0, 1.0))
    }

    pub fn resolve(&self) -> ChannelBinding {
        match self {
            Self::Color(color) => {
                let texel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                ChannelBinding::Solid([texel(color.x), texel(color.y), texel(color.z), 255])
            }
            Self::Texture(handle) => ChannelBinding::Texture(*handle),
        }
    }
}

/// A channel as the renderer binds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelBinding {
    Solid([u8; 4]),
    Texture(TextureHandle),
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingModel {
    #[default]
    Phong = 0,
    Lambert = 1,
    Constant = 2,
    FlatColor = 3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Channel,
    pub diffuse: Channel,
    pub specular: Channel,
    pub shininess: f32,
    pub model: LightingModel,
}

impl Material {
    pub fn new() -> Self {
        Self {
            ambient: Channel::white(),
            diffuse: Channel::white(),
            specular: Channel::white(),
            shininess: 32.0,
            model: LightingModel::Phong,
        }
    }

    /// Resolve ambient, diffuse and specular, in that order
    pub fn resolve(&self) -> MaterialBinding {
        MaterialBinding {
            channels: [self.ambient.resolve(), self.diffuse.resolve(), self.specular.resolve()],
            shininess: self.shininess,
            model: self.model as i32,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Material state captured at buffer-build time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialBinding {
    pub channels: [ChannelBinding; 3],
    pub shininess: f32,
    pub model: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_resolves_to_texel() {
        let channel = Channel::Color(Vector3::new(1.0, 0.5, 0.0));
        assert_eq!(channel.resolve(), ChannelBinding::Solid([255, 128, 0, 255]));
    }

    #[test]
    fn test_texture_passes_through() {
        let mut material = Material::default();
        material.diffuse = Channel::Texture(TextureHandle(7));
        let binding = material.resolve();
        assert_eq!(binding.channels[0], ChannelBinding::Solid([255, 255, 255, 255]));
        assert_eq!(binding.channels[1], ChannelBinding::Texture(TextureHandle(7)));
        assert_eq!(binding.model, 0);
    }

    #[test]
    fn test_material_json_roundtrip() {
        let material = Material::default();
        let text = serde_json::to_string(&material).unwrap();
        let parsed: Material = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, material);
    }
}
