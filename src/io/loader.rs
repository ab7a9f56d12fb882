// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Path-level loading: pick a reader by extension, then a mesh kind by content

use super::{mesh, obj, off, stl, Format, RawMesh, ReadError};
use crate::geometry::{CellKind, Geometry};
use crate::mesh::{AnyMesh, HexMesh, QuadMesh, TetMesh, TriangleMesh};
use anyhow::{Context, Result};
use std::path::Path;

/// Format for a path, from its extension
pub fn detect_format(path: &Path) -> Result<Format, ReadError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    Format::from_extension(extension).ok_or_else(|| ReadError::UnsupportedExtension(extension.to_string()))
}

/// Read the raw arrays of any supported file
pub fn read_raw(path: &Path) -> Result<RawMesh> {
    let format = detect_format(path)?;
    let raw = match format {
        Format::Mesh => mesh::read_mesh(path),
        Format::Obj => obj::read_obj(path),
        Format::Off => off::read_off(path),
        Format::Stl => stl::read_stl(path),
    }
    .context(format!("Failed to read {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        %format,
        vertices = raw.vertices.len(),
        polys = raw.polys.len(),
        "read mesh file"
    );
    Ok(raw)
}

/// Load a file into the mesh kind its content calls for.
///
/// MEDIT files give a tet or hex mesh by section. Surface files give a quad
/// mesh when the first poly has four corners, a triangle mesh otherwise.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AnyMesh> {
    let path = path.as_ref();
    let raw = read_raw(path)?;
    let context = || format!("Failed to build mesh from {}", path.display());

    let mut mesh: AnyMesh = match raw.cell_kind {
        Some(CellKind::Tetrahedron) => TetMesh::from_raw(raw).with_context(context)?.into(),
        Some(CellKind::Hexahedron) => HexMesh::from_raw(raw).with_context(context)?.into(),
        None if raw.polys.first().map(Vec::len) == Some(QuadMesh::ARITY) => {
            QuadMesh::from_raw(raw).with_context(context)?.into()
        }
        None => TriangleMesh::from_raw(raw).with_context(context)?.into(),
    };
    mesh.core_mut().set_name(mesh_name(path));
    Ok(mesh)
}

/// Display name for a mesh file: the file name up to its first dot
pub fn mesh_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("No Name")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshKind;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> Result<tempfile::NamedTempFile> {
        let mut file = Builder::new().prefix("bunny").suffix(suffix).tempfile()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_mesh_name() {
        assert_eq!(mesh_name(Path::new("/tmp/bunny.tet.mesh")), "bunny");
        assert_eq!(mesh_name(Path::new(".hidden")), "No Name");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = detect_format(Path::new("model.ply")).unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedExtension(ref e) if e == "ply"));
    }

    #[test]
    fn test_load_picks_kind_from_arity() -> Result<()> {
        let quad = write_temp(".off", "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n")?;
        assert_eq!(load(quad.path())?.kind(), MeshKind::Quad);

        let tri = write_temp(".obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")?;
        let mesh = load(tri.path())?;
        assert_eq!(mesh.kind(), MeshKind::Triangle);
        assert!(mesh.name().starts_with("bunny"));
        Ok(())
    }

    #[test]
    fn test_load_reports_path_on_failure() -> Result<()> {
        let bad = write_temp(".off", "OFF\n3\n")?;
        let err = load(bad.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid OFF file"));
        Ok(())
    }
}
