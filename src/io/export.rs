// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL export for surface meshes

use crate::geometry::{cycle_normal, SurfaceMesh};
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlEncoding {
    #[default]
    Binary,
    Ascii,
}

struct Facet {
    normal: Vector3<f32>,
    corners: [Point3<f32>; 3],
}

/// Quads are split along their 1-3 diagonal, like the renderer does
fn facets(mesh: &SurfaceMesh) -> Vec<Facet> {
    let core = mesh.core();
    let vertices = core.vertices();
    let mut facets = Vec::with_capacity(core.num_polys() * 2);
    for pid in 0..core.num_polys() {
        let poly = core.adj_p2v(pid);
        let splits: &[[usize; 3]] = if poly.len() == 4 {
            &[[0, 1, 3], [1, 2, 3]]
        } else {
            &[[0, 1, 2]]
        };
        for split in splits {
            let cycle = split.map(|i| poly[i]);
            facets.push(Facet {
                normal: cycle_normal(vertices, &cycle),
                corners: cycle.map(|vid| vertices[vid]),
            });
        }
    }
    facets
}

/// Write all polys of a surface mesh, visible or not
pub fn export_stl<P: AsRef<Path>>(mesh: &SurfaceMesh, path: P, encoding: StlEncoding) -> Result<()> {
    let path = path.as_ref();
    let facets = facets(mesh);
    tracing::debug!(path = %path.display(), facets = facets.len(), ?encoding, "exporting STL");
    match encoding {
        StlEncoding::Binary => export_stl_binary(&facets, path),
        StlEncoding::Ascii => export_stl_ascii(&facets, mesh.core().name(), path),
    }
}

fn export_stl_binary(facets: &[Facet], path: &Path) -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let triangles: Vec<StlTriangle> = facets
        .iter()
        .map(|f| StlTriangle {
            normal: Normal::new([f.normal.x, f.normal.y, f.normal.z]),
            vertices: f.corners.map(|p| StlVertex::new([p.x, p.y, p.z])),
        })
        .collect();

    let mut file = File::create(path).context("Failed to create STL file")?;
    stl_io::write_stl(&mut file, triangles.iter()).context("Failed to write STL file")?;
    Ok(())
}

fn export_stl_ascii(facets: &[Facet], name: &str, path: &Path) -> Result<()> {
    let file = File::create(path).context("Failed to create STL file")?;
    let mut out = BufWriter::new(file);

    writeln!(out, "solid {}", name)?;
    for facet in facets {
        let n = facet.normal;
        writeln!(out, "  facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(out, "    outer loop")?;
        for p in &facet.corners {
            writeln!(out, "      vertex {} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {}", name)?;
    out.flush().context("Failed to write STL file")?;
    Ok(())
}
