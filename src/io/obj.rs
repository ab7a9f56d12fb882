// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront `.obj` reader
//!
//! Reads `v`, `vt` and `f` records; everything else is skipped. Face tokens
//! may be `v`, `v/vt`, `v/vt/vn` or `v//vn`. Negative indices count back
//! from the most recently declared element.

use super::{Format, RawMesh, ReadError};
use crate::geometry::PolyUv;
use nalgebra::{Point3, Vector2};
use std::fs;
use std::path::Path;

fn invalid(line: usize, reason: impl std::fmt::Display) -> ReadError {
    ReadError::invalid(Format::Obj, format!("line {}: {}", line, reason))
}

/// Resolve a 1-based or negative relative index against `count` elements
fn resolve(token: &str, count: usize) -> Option<usize> {
    let index: i64 = token.parse().ok()?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => count as i64 + i,
    };
    (0..count as i64).contains(&resolved).then_some(resolved as usize)
}

fn parse_floats(tokens: &[&str], line: usize) -> Result<Vec<f32>, ReadError> {
    tokens
        .iter()
        .map(|t| t.parse::<f32>().map_err(|e| invalid(line, e)))
        .collect()
}

pub fn parse_obj(text: &str) -> Result<RawMesh, ReadError> {
    let mut vertices = Vec::new();
    let mut tex_coords: Vec<Vector2<f32>> = Vec::new();
    let mut polys = Vec::new();
    let mut uv: PolyUv = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = tokens.split_first() else {
            continue;
        };

        match keyword {
            "v" => {
                if args.len() < 3 {
                    return Err(invalid(line_no, "vertex needs three coordinates"));
                }
                let c = parse_floats(&args[..3], line_no)?;
                vertices.push(Point3::new(c[0], c[1], c[2]));
            }
            "vt" => {
                if args.is_empty() {
                    return Err(invalid(line_no, "texture coordinate needs at least one value"));
                }
                let c = parse_floats(&args[..args.len().min(2)], line_no)?;
                tex_coords.push(Vector2::new(c[0], c.get(1).copied().unwrap_or(0.0)));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(invalid(line_no, "face needs at least three vertices"));
                }
                let mut poly = Vec::with_capacity(args.len());
                let mut poly_uv = Vec::new();
                for token in args {
                    let mut fields = token.split('/');
                    let v = fields.next().unwrap_or_default();
                    let vid = resolve(v, vertices.len())
                        .ok_or_else(|| invalid(line_no, format!("bad vertex reference {:?}", token)))?;
                    poly.push(vid);

                    if let Some(t) = fields.next().filter(|t| !t.is_empty()) {
                        let tid = resolve(t, tex_coords.len())
                            .ok_or_else(|| invalid(line_no, format!("bad texture reference {:?}", token)))?;
                        poly_uv.push(tex_coords[tid]);
                    }
                }
                if !poly_uv.is_empty() {
                    if poly_uv.len() != poly.len() {
                        return Err(invalid(line_no, "face mixes corners with and without texture coordinates"));
                    }
                    uv.push(poly_uv);
                }
                polys.push(poly);
            }
            _ => {}
        }
    }

    // uv is only usable when it runs parallel to the poly list
    let uv = (!uv.is_empty() && uv.len() == polys.len()).then_some(uv);
    if uv.is_none() && !tex_coords.is_empty() {
        tracing::warn!("OBJ texture coordinates do not cover every face, ignoring them");
    }

    Ok(RawMesh {
        vertices,
        polys,
        uv,
        ..RawMesh::default()
    })
}

pub fn read_obj<P: AsRef<Path>>(path: P) -> Result<RawMesh, ReadError> {
    parse_obj(&fs::read_to_string(path)?)
}
