// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! MEDIT `.mesh` reader for tetrahedral and hexahedral meshes
//!
//! Only the `Vertices` section and the first `Tetrahedra` or `Hexahedra`
//! section are read. Cell indices are converted from 1-based to 0-based and
//! the trailing reference number of each cell is kept as its label.

use super::{Format, RawMesh, ReadError};
use crate::geometry::CellKind;
use nalgebra::Point3;
use std::fs;
use std::path::Path;

fn invalid(reason: impl Into<String>) -> ReadError {
    ReadError::invalid(Format::Mesh, reason)
}

/// Meaningful lines: trimmed, non-empty, not comments
fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Locate a section keyword at or after `from` and return the index of its
/// first data line, the keyword found and the entry count.
///
/// The count may follow the keyword on the same line or sit on the next one.
fn find_section<'a>(lines: &[&'a str], from: usize, keywords: &[&str]) -> Option<(usize, &'a str, usize)> {
    let (i, head) = lines.iter().enumerate().skip(from).find_map(|(i, line)| {
        let head = line.split_whitespace().next()?;
        keywords.contains(&head).then_some((i, head))
    })?;

    match lines[i].split_whitespace().nth(1) {
        Some(count) => count.parse().ok().map(|n| (i + 1, head, n)),
        None => {
            let count = lines.get(i + 1)?.split_whitespace().next()?.parse().ok()?;
            Some((i + 2, head, count))
        }
    }
}

pub fn parse_mesh(text: &str) -> Result<RawMesh, ReadError> {
    if !text.contains("MeshVersionFormatted") || !text.contains("Dimension") {
        return Err(invalid("missing MeshVersionFormatted or Dimension header"));
    }
    let lines = content_lines(text);

    let (start, _, vertex_count) =
        find_section(&lines, 0, &["Vertices"]).ok_or_else(|| invalid("missing Vertices section"))?;
    let vertex_lines = lines
        .get(start..start + vertex_count)
        .ok_or_else(|| invalid(format!("expected {} vertex lines", vertex_count)))?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for (i, line) in vertex_lines.iter().enumerate() {
        let coords: Vec<f32> = line
            .split_whitespace()
            .take(3)
            .map(|t| t.parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| invalid(format!("vertex {}: {}", i, e)))?;
        if coords.len() < 3 {
            return Err(invalid(format!("vertex {} has fewer than 3 coordinates", i)));
        }
        vertices.push(Point3::new(coords[0], coords[1], coords[2]));
    }

    let (start, keyword, cell_count) = find_section(&lines, start + vertex_count, &["Tetrahedra", "Hexahedra"])
        .ok_or_else(|| invalid("missing Tetrahedra or Hexahedra section"))?;
    let kind = if keyword == "Tetrahedra" {
        CellKind::Tetrahedron
    } else {
        CellKind::Hexahedron
    };
    let cell_lines = lines
        .get(start..start + cell_count)
        .ok_or_else(|| invalid(format!("expected {} {} lines", cell_count, keyword)))?;

    let mut cells = Vec::with_capacity(cell_count);
    let mut labels = Vec::with_capacity(cell_count);
    for (i, line) in cell_lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != kind.arity() + 1 {
            return Err(invalid(format!(
                "cell {} has {} fields, expected {} indices and a label",
                i,
                tokens.len(),
                kind.arity()
            )));
        }
        let (indices, label) = tokens.split_at(kind.arity());
        let cell = indices
            .iter()
            .map(|t| match t.parse::<usize>() {
                Ok(index) if index > 0 => Ok(index - 1),
                _ => Err(invalid(format!("cell {}: bad vertex index {:?}", i, t))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let label = label[0]
            .parse::<f32>()
            .map_err(|e| invalid(format!("cell {} label: {}", i, e)))?;
        cells.push(cell);
        labels.push(label as i32);
    }

    Ok(RawMesh {
        vertices,
        polys: cells,
        labels: Some(labels),
        cell_kind: Some(kind),
        ..RawMesh::default()
    })
}

pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<RawMesh, ReadError> {
    parse_mesh(&fs::read_to_string(path)?)
}
