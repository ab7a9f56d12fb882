// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reader errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Mesh,
    Obj,
    Off,
    Stl,
}

impl Format {
    /// Format for a file extension, case-insensitive
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "mesh" => Some(Self::Mesh),
            "obj" => Some(Self::Obj),
            "off" => Some(Self::Off),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "MESH",
            Self::Obj => "OBJ",
            Self::Off => "OFF",
            Self::Stl => "STL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    /// Missing header tokens or sections, or malformed counts and fields
    #[error("invalid {format} file: {reason}")]
    InvalidFormat { format: Format, reason: String },

    #[error("unsupported file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadError {
    pub(crate) fn invalid(format: Format, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format,
            reason: reason.into(),
        }
    }
}
