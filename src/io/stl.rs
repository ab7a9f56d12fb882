// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL reader, ASCII and binary
//!
//! Input is treated as ASCII when it is valid UTF-8 containing both `solid`
//! and `facet`; otherwise it is read as binary. Vertices are shared between
//! facets when their coordinates are bit-identical.

use super::{Format, RawMesh, ReadError};
use ahash::AHashMap;
use nalgebra::Point3;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use stl_io::{AsciiStlReader, BinaryStlReader, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

fn invalid(reason: impl Into<String>) -> ReadError {
    ReadError::invalid(Format::Stl, reason)
}

/// Vertex table deduplicating positions by bit pattern
#[derive(Default)]
struct VertexPool {
    vertices: Vec<Point3<f32>>,
    lookup: AHashMap<[u32; 3], usize>,
}

impl VertexPool {
    fn insert(&mut self, v: &Vertex) -> usize {
        let p: [f32; 3] = (*v).into();
        let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
        let next = self.vertices.len();
        let vid = *self.lookup.entry(key).or_insert(next);
        if vid == next {
            self.vertices.push(Point3::new(p[0], p[1], p[2]));
        }
        vid
    }
}

fn is_ascii_stl(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok_and(|text| text.contains("solid") && text.contains("facet"))
}

/// Weld decoded triangles into a shared vertex table. Facets that collapse
/// onto fewer than three distinct vertices are dropped.
fn weld<I>(triangles: I) -> Result<RawMesh, ReadError>
where
    I: Iterator<Item = std::io::Result<Triangle>>,
{
    let mut pool = VertexPool::default();
    let mut polys = Vec::new();
    let mut collapsed = 0usize;

    for (i, triangle) in triangles.enumerate() {
        let triangle = triangle.map_err(|e| invalid(format!("facet {}: {}", i, e)))?;
        let [a, b, c] = [
            pool.insert(&triangle.vertices[0]),
            pool.insert(&triangle.vertices[1]),
            pool.insert(&triangle.vertices[2]),
        ];
        if a == b || b == c || a == c {
            collapsed += 1;
            continue;
        }
        polys.push(vec![a, b, c]);
    }
    if collapsed > 0 {
        tracing::warn!(collapsed, "skipped STL facets with repeated vertices");
    }

    Ok(RawMesh {
        vertices: pool.vertices,
        polys,
        ..RawMesh::default()
    })
}

fn parse_ascii(bytes: &[u8]) -> Result<RawMesh, ReadError> {
    let mut cursor = Cursor::new(bytes);
    let triangles = AsciiStlReader::create_triangle_iterator(&mut cursor).map_err(|e| invalid(e.to_string()))?;
    weld(triangles)
}

fn parse_binary(bytes: &[u8]) -> Result<RawMesh, ReadError> {
    if bytes.len() <= HEADER_LEN + 4 {
        return Err(invalid(format!("binary file too short ({} bytes)", bytes.len())));
    }
    let present = (bytes.len() - HEADER_LEN - 4) / RECORD_LEN;

    let mut cursor = Cursor::new(bytes);
    let triangles = BinaryStlReader::create_triangle_iterator(&mut cursor).map_err(|e| invalid(e.to_string()))?;
    let declared = triangles.size_hint().0;
    if declared != present {
        tracing::warn!(declared, present, "STL triangle count mismatch");
    }
    weld(triangles.take(present))
}

pub fn parse_stl(bytes: &[u8]) -> Result<RawMesh, ReadError> {
    if is_ascii_stl(bytes) {
        parse_ascii(bytes)
    } else {
        parse_binary(bytes)
    }
}

pub fn read_stl<P: AsRef<Path>>(path: P) -> Result<RawMesh, ReadError> {
    parse_stl(&fs::read(path)?)
}
