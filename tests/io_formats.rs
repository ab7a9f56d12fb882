// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File loading and export through the public API

use anyhow::Result;
use approx::assert_relative_eq;
use meshview::geometry::{color, TopologyError};
use meshview::io::{self, Format, ReadError};
use meshview::{Extract, Geometry, HexMesh, MeshKind, Primitive, Shading, StlEncoding, TetMesh, TriangleMesh};
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::with_suffix(suffix)?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}

const UNIT_HEX: &str = "MeshVersionFormatted 1
Dimension 3
Vertices
8
0 0 0 0
1 0 0 0
1 1 0 0
0 1 0 0
0 0 1 0
1 0 1 0
1 1 1 0
0 1 1 0
Hexahedra
1
1 2 3 4 5 6 7 8 4
End
";

#[test]
fn test_load_hex_mesh_file() -> Result<()> {
    let file = temp_file(".mesh", UNIT_HEX.as_bytes())?;
    let mesh = io::load(file.path())?;
    assert_eq!(mesh.kind(), MeshKind::Hexahedral);
    assert_eq!(mesh.core().label(0), Some(4));

    let hex = HexMesh::from_file(file.path())?;
    assert_relative_eq!(hex.quality(0), 1.0, epsilon = 1e-5);
    Ok(())
}

#[test]
fn test_load_tet_mesh_file() -> Result<()> {
    let text = "MeshVersionFormatted 1\nDimension 3\nVertices 4\n\
                0 0 0 0\n1 0 0 0\n0 1 0 0\n0 0 1 0\nTetrahedra 1\n1 2 3 4 0\nEnd\n";
    let file = temp_file(".mesh", text.as_bytes())?;
    let tet = TetMesh::from_file(file.path())?;
    assert_eq!(tet.volume().num_faces(), 4);
    assert!(tet.quality(0) > 0.0);
    assert!(!tet.name().is_empty());
    Ok(())
}

#[test]
fn test_obj_uv_reaches_render_records() -> Result<()> {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
    let file = temp_file(".obj", text.as_bytes())?;
    let mut mesh = TriangleMesh::from_file(file.path())?;
    let records = mesh.extract_triangles(Shading::Flat);
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].uv, [1.0, 0.0]);
    assert_eq!(records[2].uv, [0.0, 1.0]);
    Ok(())
}

#[test]
fn test_off_colors_become_poly_colors() -> Result<()> {
    let text = "OFF\n4 2 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n3 0 1 2 1 0 0\n3 0 2 3\n";
    let file = temp_file(".off", text.as_bytes())?;
    let mesh = io::load(file.path())?;
    assert_eq!(mesh.kind(), MeshKind::Triangle);
    assert_eq!(mesh.core().poly_color(0), color::rgba(color::RED));
    assert_eq!(mesh.core().poly_color(1), color::default_poly_color());
    Ok(())
}

#[test]
fn test_stl_export_and_reload() -> Result<()> {
    let mesh = Primitive::quad_grid(3, 2, 0.5).to_mesh()?;
    let surface = mesh.as_surface().expect("quad grid");

    for encoding in [StlEncoding::Binary, StlEncoding::Ascii] {
        let file = NamedTempFile::with_suffix(".stl")?;
        io::export_stl(surface, file.path(), encoding)?;

        let reloaded = io::load(file.path())?;
        assert_eq!(reloaded.kind(), MeshKind::Triangle);
        assert_eq!(reloaded.core().num_polys(), 12);
        assert_eq!(reloaded.core().num_vertices(), 12);
        assert!(reloaded.bounding_box().approx_eq(&mesh.bounding_box(), 1e-6));
    }
    Ok(())
}

#[test]
fn test_collapsed_stl_facet_keeps_adjacency_consistent() -> Result<()> {
    let text = "solid degenerate
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 0 0 0
      vertex 5 5 0
    endloop
  endfacet
endsolid degenerate
";
    let file = temp_file(".stl", text.as_bytes())?;
    let mesh = TriangleMesh::from_file(file.path())?;
    let core = mesh.core();
    assert_eq!(core.num_polys(), 1);

    for pid in 0..core.num_polys() {
        let poly = core.adj_p2v(pid);
        for &eid in core.adj_p2e(pid) {
            let [a, b] = core.edges()[eid];
            assert!(poly.contains(&a) && poly.contains(&b), "poly {} has foreign edge {}", pid, eid);
        }
    }
    Ok(())
}

#[test]
fn test_repeated_corner_is_rejected() -> Result<()> {
    let file = temp_file(".off", b"OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 1\n")?;
    let err = io::load(file.path()).unwrap_err();
    let topology = err.downcast_ref::<TopologyError>().expect("topology error in chain");
    assert_eq!(*topology, TopologyError::DegenerateCell { poly: 0, vertex: 1 });
    Ok(())
}

#[test]
fn test_invalid_files_fail_without_partial_mesh() -> Result<()> {
    let file = temp_file(".mesh", b"Vertices\n1\n0 0 0 0\n")?;
    let err = io::load(file.path()).unwrap_err();
    let read_err = err.downcast_ref::<ReadError>().expect("read error in chain");
    assert!(matches!(read_err, ReadError::InvalidFormat { format: Format::Mesh, .. }));
    Ok(())
}

#[test]
fn test_out_of_range_connectivity_is_rejected() -> Result<()> {
    let file = temp_file(".off", b"OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n")?;
    let err = io::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to build mesh"));
    Ok(())
}

#[test]
fn test_unknown_extension() -> Result<()> {
    let file = temp_file(".ply", b"ply\n")?;
    let err = io::load(file.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<ReadError>(), Some(ReadError::UnsupportedExtension(_))));
    Ok(())
}
