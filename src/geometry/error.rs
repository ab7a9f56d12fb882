// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build-time validation errors

use thiserror::Error;

/// Raised when raw connectivity cannot be turned into a mesh
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("poly {poly} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        poly: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("poly {poly} has {found} vertices, expected {expected}")]
    CellSize {
        poly: usize,
        expected: usize,
        found: usize,
    },

    #[error("poly {poly} uses vertex {vertex} more than once")]
    DegenerateCell { poly: usize, vertex: usize },

    #[error("{what}: expected {expected} entries, got {found}")]
    AttributeCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Check that every cell has `arity` distinct corners, all within `[0, vertex_count)`
pub(crate) fn validate_cells(
    cells: &[Vec<usize>],
    arity: usize,
    vertex_count: usize,
) -> Result<(), TopologyError> {
    for (poly, cell) in cells.iter().enumerate() {
        if cell.len() != arity {
            return Err(TopologyError::CellSize {
                poly,
                expected: arity,
                found: cell.len(),
            });
        }
        if let Some(&vertex) = cell.iter().find(|&&v| v >= vertex_count) {
            return Err(TopologyError::IndexOutOfRange {
                poly,
                vertex,
                vertex_count,
            });
        }
        for (i, &vertex) in cell.iter().enumerate() {
            if cell[..i].contains(&vertex) {
                return Err(TopologyError::DegenerateCell { poly, vertex });
            }
        }
    }
    Ok(())
}
