// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Object File Format (`.off`) reader with optional per-face colors

use super::{Format, RawMesh, ReadError};
use crate::geometry::color::{self, Rgba};
use nalgebra::Point3;
use std::fs;
use std::path::Path;

fn invalid(reason: impl Into<String>) -> ReadError {
    ReadError::invalid(Format::Off, reason)
}

/// Face color from trailing channels; anything but 3 or 4 channels falls back
/// to the default poly color. Channels above 1 are read as 0-255.
fn face_color(channels: &[f32]) -> Rgba {
    let byte_scale = channels.iter().any(|&c| c > 1.0);
    let opaque = if byte_scale { 255.0 } else { 1.0 };
    let color = match channels {
        [r, g, b] => Rgba::new(*r, *g, *b, opaque),
        [r, g, b, a] => Rgba::new(*r, *g, *b, *a),
        _ => return color::default_poly_color(),
    };
    if byte_scale {
        color::to_01_scale(color)
    } else {
        color
    }
}

fn parse_count(token: Option<&&str>, what: &str) -> Result<usize, ReadError> {
    token
        .ok_or_else(|| invalid(format!("missing {} count", what)))?
        .parse()
        .map_err(|e| invalid(format!("bad {} count: {}", what, e)))
}

pub fn parse_off(text: &str) -> Result<RawMesh, ReadError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let mut header: Vec<&str> = lines
        .next()
        .ok_or_else(|| invalid("empty file"))?
        .split_whitespace()
        .collect();
    if header.first() == Some(&"OFF") {
        header.remove(0);
        if header.is_empty() {
            header = lines
                .next()
                .ok_or_else(|| invalid("missing counts line"))?
                .split_whitespace()
                .collect();
        }
    }
    if !(2..=3).contains(&header.len()) {
        return Err(invalid(format!("expected 2 or 3 header counts, found {}", header.len())));
    }
    let num_vertices = parse_count(header.first(), "vertex")?;
    let num_polys = parse_count(header.get(1), "face")?;

    let mut vertices = Vec::with_capacity(num_vertices);
    for i in 0..num_vertices {
        let line = lines
            .next()
            .ok_or_else(|| invalid(format!("expected {} vertices, found {}", num_vertices, i)))?;
        let coords = line
            .split_whitespace()
            .take(3)
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(format!("vertex {}: {}", i, e)))?;
        if coords.len() < 3 {
            return Err(invalid(format!("vertex {} has fewer than 3 coordinates", i)));
        }
        vertices.push(Point3::new(coords[0], coords[1], coords[2]));
    }

    let mut polys = Vec::with_capacity(num_polys);
    let mut colors = Vec::with_capacity(num_polys);
    for i in 0..num_polys {
        let line = lines
            .next()
            .ok_or_else(|| invalid(format!("expected {} faces, found {}", num_polys, i)))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let n = parse_count(tokens.first(), "face vertex")?;
        let indices = tokens
            .get(1..1 + n)
            .ok_or_else(|| invalid(format!("face {} lists fewer than {} indices", i, n)))?;
        let poly = indices
            .iter()
            .map(|t| t.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(format!("face {}: {}", i, e)))?;
        let channels = tokens[1 + n..]
            .iter()
            .map(|t| t.parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(format!("face {} color: {}", i, e)))?;
        polys.push(poly);
        colors.push(face_color(&channels));
    }

    Ok(RawMesh {
        vertices,
        polys,
        colors: Some(colors),
        ..RawMesh::default()
    })
}

pub fn read_off<P: AsRef<Path>>(path: P) -> Result<RawMesh, ReadError> {
    parse_off(&fs::read_to_string(path)?)
}
