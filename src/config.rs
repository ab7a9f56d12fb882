// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Viewer configuration system
//!
//! Settings live in `meshview.toml`; `MESHVIEW_*` environment variables
//! override individual fields.

use crate::geometry::{color, ColorMode, Geometry, DEFAULT_LABEL_SEED};
use crate::mesh::AnyMesh;
use crate::render::{Drawable, Material, Shading};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "meshview.toml";

/// Display settings applied to a drawable when a mesh is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub shading: Shading,
    /// Volumetric meshes only
    pub color_mode: ColorMode,
    /// Tint exposed internal faces of volumetric meshes
    pub use_internal_color: bool,
    pub internal_color: [f32; 4],
    pub wireframe_enabled: bool,
    pub wireframe_color: [f32; 4],
    /// Seed of the random label palette
    pub label_seed: u64,
    pub material: Material,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let internal = color::default_internal_color();
        Self {
            shading: Shading::Smooth,
            color_mode: ColorMode::PolyColor,
            use_internal_color: true,
            internal_color: [internal.x, internal.y, internal.z, internal.w],
            wireframe_enabled: true,
            wireframe_color: color::BLACK,
            label_seed: DEFAULT_LABEL_SEED,
            material: Material::default(),
        }
    }
}

fn parse_color_mode(value: &str) -> Option<ColorMode> {
    match value.to_lowercase().as_str() {
        "poly_color" | "poly" => Some(ColorMode::PolyColor),
        "label" => Some(ColorMode::Label),
        "quality" => Some(ColorMode::Quality),
        _ => None,
    }
}

impl ViewerConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ViewerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `meshview.toml` from the working directory if present, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `MESHVIEW_*` variables; unparsable values are
    /// logged and ignored
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(shading) = var("MESHVIEW_SHADING") {
            match shading.parse() {
                Ok(shading) => self.shading = shading,
                Err(e) => tracing::warn!("ignoring MESHVIEW_SHADING: {}", e),
            }
        }

        if let Some(mode) = var("MESHVIEW_COLOR_MODE") {
            match parse_color_mode(&mode) {
                Some(mode) => self.color_mode = mode,
                None => tracing::warn!("ignoring MESHVIEW_COLOR_MODE: unknown mode '{}'", mode),
            }
        }

        if let Some(wireframe) = var("MESHVIEW_WIREFRAME") {
            self.wireframe_enabled = wireframe.parse().unwrap_or(self.wireframe_enabled);
        }

        if let Some(seed) = var("MESHVIEW_LABEL_SEED") {
            self.label_seed = seed.parse().unwrap_or(self.label_seed);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Push these settings into a drawable and its mesh
    pub fn apply(&self, drawable: &mut Drawable<AnyMesh>) {
        drawable.set_shading(self.shading);
        drawable.set_wireframe_enabled(self.wireframe_enabled);
        drawable.set_material(self.material.clone());

        let mesh = drawable.mesh_mut();
        let core = mesh.core_mut();
        core.set_label_seed(self.label_seed);
        core.set_wireframe_color(color::rgba(self.wireframe_color));

        if let Some(volume) = mesh.as_volume_mut() {
            volume.set_internal_color(color::rgba(self.internal_color));
            volume.set_use_internal_color(self.use_internal_color);
            volume.set_color_mode(self.color_mode);
        }
    }
}
