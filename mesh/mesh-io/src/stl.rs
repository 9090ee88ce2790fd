//! STL (Stereolithography) support.
//!
//! Generated models reach the slicer as STL, either uploaded as raw bytes or
//! read from disk, so the parser works on an in-memory buffer and the path
//! loader is a thin wrapper around it.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored, recomputed on save)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! STL stores an unindexed triangle soup; loaded meshes give each triangle its
//! own three vertices.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Point3};
use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};

const HEADER_SIZE: usize = 80;
const COUNT_SIZE: usize = 4;
const TRIANGLE_SIZE: usize = 50;

/// STL flavor used when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    /// Compact little-endian binary.
    #[default]
    Binary,
    /// Human-readable text.
    Ascii,
}

/// Parse an STL document held in memory.
///
/// Binary and ASCII files are told apart by checking whether the byte length
/// matches the binary triangle count; only otherwise does a leading `solid`
/// keyword select the ASCII parser (binary exporters often write `solid` into
/// the header too).
///
/// # Errors
///
/// Returns [`LoadError::InvalidContent`] for malformed text or a too-short
/// buffer, and [`LoadError::Truncated`] for a binary file missing triangles.
///
/// # Example
///
/// ```
/// use mesh_io::parse_stl;
/// use mesh_types::MeshTopology;
///
/// let text = b"solid t
/// facet normal 0 0 1
///   outer loop
///     vertex 0 0 0
///     vertex 1 0 0
///     vertex 0 1 0
///   endloop
/// endfacet
/// endsolid t";
///
/// let mesh = parse_stl(text).unwrap();
/// assert_eq!(mesh.face_count(), 1);
/// ```
pub fn parse_stl(bytes: &[u8]) -> LoadResult<IndexedMesh> {
    if let Some(declared) = binary_triangle_count(bytes) {
        if HEADER_SIZE + COUNT_SIZE + declared as usize * TRIANGLE_SIZE == bytes.len() {
            return parse_binary(bytes, declared);
        }
    }

    let looks_ascii = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .is_some_and(|start| bytes[start..].starts_with(b"solid"));

    if looks_ascii {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LoadError::invalid_content(format!("ASCII STL is not UTF-8: {e}")))?;
        return parse_ascii(text);
    }

    match binary_triangle_count(bytes) {
        Some(declared) => parse_binary(bytes, declared),
        None => Err(LoadError::invalid_content("file too small to be valid STL")),
    }
}

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns [`LoadError::FileNotFound`] for a missing file, [`LoadError::Io`]
/// for other read failures, and any error of [`parse_stl`].
pub fn load_stl<P: AsRef<Path>>(path: P) -> LoadResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io(e)
        }
    })?;

    let mesh = parse_stl(&bytes)?;
    debug!(
        path = %path.display(),
        faces = mesh.faces.len(),
        "Loaded STL"
    );
    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_stl<P: AsRef<Path>>(
    mesh: &IndexedMesh,
    path: P,
    encoding: StlEncoding,
) -> LoadResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as STL to any writer.
///
/// Faces with out-of-range indices are skipped. Normals are recomputed from
/// the winding order.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_stl<W: Write>(
    mesh: &IndexedMesh,
    writer: &mut W,
    encoding: StlEncoding,
) -> LoadResult<()> {
    let triangles: Vec<[Point3<f64>; 3]> = mesh
        .faces
        .iter()
        .filter_map(|face| {
            let [a, b, c] = face.map(|i| mesh.vertices.get(i as usize).map(|v| v.position));
            Some([a?, b?, c?])
        })
        .collect();

    match encoding {
        StlEncoding::Binary => write_binary(&triangles, writer),
        StlEncoding::Ascii => write_ascii(&triangles, writer),
    }
}

fn binary_triangle_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..HEADER_SIZE + COUNT_SIZE)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn parse_binary(bytes: &[u8], declared: u32) -> LoadResult<IndexedMesh> {
    let body = &bytes[HEADER_SIZE + COUNT_SIZE..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < declared as usize {
        return Err(LoadError::Truncated {
            declared,
            available,
        });
    }

    let mut soup = Vec::with_capacity(declared as usize * 9);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(declared as usize) {
        // Skip the 12-byte normal, read three vertices
        for value in record[12..48].chunks_exact(4) {
            let v = f32::from_le_bytes([value[0], value[1], value[2], value[3]]);
            soup.push(f64::from(v));
        }
    }

    Ok(IndexedMesh::from_triangle_soup(&soup))
}

fn parse_ascii(text: &str) -> LoadResult<IndexedMesh> {
    let mut soup = Vec::new();
    let mut facet: Vec<f64> = Vec::with_capacity(9);
    let mut skipped = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => facet.clear(),
            "vertex" => {
                for _ in 0..3 {
                    let value = parts
                        .next()
                        .and_then(|s| s.parse::<f64>().ok())
                        .ok_or_else(|| {
                            LoadError::invalid_content(format!(
                                "line {}: malformed vertex",
                                line_no + 1
                            ))
                        })?;
                    facet.push(value);
                }
            }
            "endfacet" => {
                if facet.len() == 9 {
                    soup.append(&mut facet);
                } else {
                    skipped += 1;
                    facet.clear();
                }
            }
            "endsolid" => break,
            _ => {}
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped ASCII STL facets without exactly three vertices");
    }

    Ok(IndexedMesh::from_triangle_soup(&soup))
}

fn facet_normal(tri: &[Point3<f64>; 3]) -> [f64; 3] {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    n.try_normalize(f64::EPSILON)
        .map_or([0.0; 3], |n| [n.x, n.y, n.z])
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: the binary format stores f32 coordinates and a u32 count
fn write_binary<W: Write>(triangles: &[[Point3<f64>; 3]], writer: &mut W) -> LoadResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL exported by toy-slicer";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;
    writer.write_all(&(triangles.len() as u32).to_le_bytes())?;

    for tri in triangles {
        for c in facet_normal(tri) {
            writer.write_all(&(c as f32).to_le_bytes())?;
        }
        for p in tri {
            for c in [p.x, p.y, p.z] {
                writer.write_all(&(c as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_ascii<W: Write>(triangles: &[[Point3<f64>; 3]], writer: &mut W) -> LoadResult<()> {
    writeln!(writer, "solid toy")?;
    for tri in triangles {
        let [nx, ny, nz] = facet_normal(tri);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for p in tri {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid toy")?;
    Ok(())
}
