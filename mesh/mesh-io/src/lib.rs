//! Mesh file I/O for the toy slicer.
//!
//! Models arrive as STL, binary or ASCII. The parser works on a byte buffer
//! ([`parse_stl`]) so uploads never touch the filesystem; [`load_mesh`] picks
//! a loader from the file extension.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_mesh, save_stl, StlEncoding};
//!
//! let mesh = load_mesh("model.stl").unwrap();
//! save_stl(&mesh, "copy.stl", StlEncoding::Ascii).unwrap();
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod stl;

pub use error::{LoadError, LoadResult};
pub use stl::{load_stl, parse_stl, save_stl, write_stl, StlEncoding};

use std::path::Path;

use mesh_types::IndexedMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL (Stereolithography), binary or ASCII.
    Stl,
}

impl MeshFormat {
    /// Detect format from file extension, case-insensitively.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
        }
    }
}

fn detect(path: &Path) -> LoadResult<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
pub fn load_mesh<P: AsRef<Path>>(path: P) -> LoadResult<IndexedMesh> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Stl => load_stl(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// STL is written in binary.
///
/// # Errors
///
/// Returns an error if the extension is unknown or the file cannot be written.
pub fn save_mesh<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> LoadResult<()> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Stl => save_stl(mesh, path, StlEncoding::Binary),
    }
}
