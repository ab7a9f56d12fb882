// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Concrete mesh kinds
//!
//! Triangle and quad meshes wrap a [`SurfaceMesh`]; tet and hex meshes wrap
//! a [`VolumeMesh`]. Each kind implements [`Geometry`] and [`Extract`], and
//! [`AnyMesh`] dispatches over all four.

mod extract;
mod hex;
mod quad;
mod tet;
mod triangle;

pub use hex::HexMesh;
pub use quad::QuadMesh;
pub use tet::TetMesh;
pub use triangle::TriangleMesh;

use crate::geometry::{Geometry, MeshCore, SurfaceMesh, VolumeMesh};
use crate::render::{Extract, RenderVertex, Shading};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    Triangle,
    Quad,
    Tetrahedral,
    Hexahedral,
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
            Self::Tetrahedral => "tetrahedral",
            Self::Hexahedral => "hexahedral",
        };
        f.write_str(name)
    }
}

/// Any of the four concrete mesh kinds
#[derive(Debug, Clone)]
pub enum AnyMesh {
    Triangle(TriangleMesh),
    Quad(QuadMesh),
    Tet(TetMesh),
    Hex(HexMesh),
}

impl AnyMesh {
    pub fn kind(&self) -> MeshKind {
        match self {
            Self::Triangle(_) => MeshKind::Triangle,
            Self::Quad(_) => MeshKind::Quad,
            Self::Tet(_) => MeshKind::Tetrahedral,
            Self::Hex(_) => MeshKind::Hexahedral,
        }
    }

    pub fn as_surface(&self) -> Option<&SurfaceMesh> {
        match self {
            Self::Triangle(m) => Some(m.surface()),
            Self::Quad(m) => Some(m.surface()),
            _ => None,
        }
    }

    pub fn as_volume(&self) -> Option<&VolumeMesh> {
        match self {
            Self::Tet(m) => Some(m.volume()),
            Self::Hex(m) => Some(m.volume()),
            _ => None,
        }
    }

    pub fn as_volume_mut(&mut self) -> Option<&mut VolumeMesh> {
        match self {
            Self::Tet(m) => Some(m.volume_mut()),
            Self::Hex(m) => Some(m.volume_mut()),
            _ => None,
        }
    }

    /// Per-cell scaled Jacobian; empty for surfaces
    pub fn qualities(&self) -> Vec<f32> {
        self.as_volume().map(VolumeMesh::qualities).unwrap_or_default()
    }
}

impl Geometry for AnyMesh {
    fn core(&self) -> &MeshCore {
        match self {
            Self::Triangle(m) => m.core(),
            Self::Quad(m) => m.core(),
            Self::Tet(m) => m.core(),
            Self::Hex(m) => m.core(),
        }
    }

    fn core_mut(&mut self) -> &mut MeshCore {
        match self {
            Self::Triangle(m) => m.core_mut(),
            Self::Quad(m) => m.core_mut(),
            Self::Tet(m) => m.core_mut(),
            Self::Hex(m) => m.core_mut(),
        }
    }

    fn is_volumetric(&self) -> bool {
        matches!(self, Self::Tet(_) | Self::Hex(_))
    }

    fn dig(&mut self, id: usize) -> Option<usize> {
        match self {
            Self::Triangle(m) => m.dig(id),
            Self::Quad(m) => m.dig(id),
            Self::Tet(m) => m.dig(id),
            Self::Hex(m) => m.dig(id),
        }
    }

    fn undig(&mut self, id: usize) -> Option<usize> {
        match self {
            Self::Triangle(m) => m.undig(id),
            Self::Quad(m) => m.undig(id),
            Self::Tet(m) => m.undig(id),
            Self::Hex(m) => m.undig(id),
        }
    }

    fn pick_face(&self, point: &Point3<f32>) -> Option<usize> {
        match self {
            Self::Triangle(m) => m.pick_face(point),
            Self::Quad(m) => m.pick_face(point),
            Self::Tet(m) => m.pick_face(point),
            Self::Hex(m) => m.pick_face(point),
        }
    }
}

impl Extract for AnyMesh {
    fn extract_triangles(&mut self, shading: Shading) -> Vec<RenderVertex> {
        match self {
            Self::Triangle(m) => m.extract_triangles(shading),
            Self::Quad(m) => m.extract_triangles(shading),
            Self::Tet(m) => m.extract_triangles(shading),
            Self::Hex(m) => m.extract_triangles(shading),
        }
    }

    fn extract_wireframe(&self) -> Vec<RenderVertex> {
        match self {
            Self::Triangle(m) => m.extract_wireframe(),
            Self::Quad(m) => m.extract_wireframe(),
            Self::Tet(m) => m.extract_wireframe(),
            Self::Hex(m) => m.extract_wireframe(),
        }
    }
}

impl From<TriangleMesh> for AnyMesh {
    fn from(mesh: TriangleMesh) -> Self {
        Self::Triangle(mesh)
    }
}

impl From<QuadMesh> for AnyMesh {
    fn from(mesh: QuadMesh) -> Self {
        Self::Quad(mesh)
    }
}

impl From<TetMesh> for AnyMesh {
    fn from(mesh: TetMesh) -> Self {
        Self::Tet(mesh)
    }
}

impl From<HexMesh> for AnyMesh {
    fn from(mesh: HexMesh) -> Self {
        Self::Hex(mesh)
    }
}
