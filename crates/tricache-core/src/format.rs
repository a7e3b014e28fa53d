//! Mesh File Format
//!
//! JSON documents holding a vertex count and a flat triangle index list:
//!
//! ```json
//! { "vertex_count": 4, "indices": [0, 1, 2, 2, 1, 3] }
//! ```
//!
//! Vertex attributes are not stored; the format only carries what the
//! optimizer reads. Documents are validated on load.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mesh::{IndexedMesh, MeshSnapshot};
use crate::{OptimizeError, OptimizeResult};

/// On-disk representation of a triangle list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshDocument {
    /// Number of vertices referenced by the indices
    pub vertex_count: u32,
    /// Flat index list, three entries per triangle
    pub indices: Vec<u32>,
}

impl MeshDocument {
    /// Capture any mesh snapshot
    pub fn from_snapshot<M: MeshSnapshot + ?Sized>(mesh: &M) -> Self {
        Self {
            vertex_count: mesh.vertex_count(),
            indices: mesh.indices().to_vec(),
        }
    }

    /// Validate the document and turn it into a mesh
    pub fn into_mesh(self) -> OptimizeResult<IndexedMesh> {
        IndexedMesh::new(self.vertex_count, self.indices)
    }
}

/// Parse a mesh from a JSON string
pub fn mesh_from_str(json: &str) -> OptimizeResult<IndexedMesh> {
    let document: MeshDocument =
        serde_json::from_str(json).map_err(|e| OptimizeError::Serialization(e.to_string()))?;
    document.into_mesh()
}

/// Read a mesh from a JSON stream
pub fn read_mesh<R: Read>(reader: R) -> OptimizeResult<IndexedMesh> {
    let document: MeshDocument =
        serde_json::from_reader(reader).map_err(|e| OptimizeError::Serialization(e.to_string()))?;
    document.into_mesh()
}

/// Write a mesh as JSON
pub fn write_mesh<W: Write, M: MeshSnapshot + ?Sized>(writer: W, mesh: &M) -> OptimizeResult<()> {
    serde_json::to_writer(writer, &MeshDocument::from_snapshot(mesh))
        .map_err(|e| OptimizeError::Serialization(e.to_string()))
}

/// Load a mesh from a JSON file
pub fn load_mesh(path: &Path) -> OptimizeResult<IndexedMesh> {
    let file = std::fs::File::open(path)?;
    read_mesh(std::io::BufReader::new(file))
}

/// Save a mesh to a JSON file
pub fn save_mesh<M: MeshSnapshot + ?Sized>(path: &Path, mesh: &M) -> OptimizeResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_mesh(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let mesh = mesh_from_str(r#"{ "vertex_count": 4, "indices": [0, 1, 2, 2, 1, 3] }"#)
            .unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_malformed_json() {
        let result = mesh_from_str(r#"{ "vertex_count": 4 "#);
        assert!(matches!(result, Err(OptimizeError::Serialization(_))));
    }

    #[test]
    fn test_invalid_indices_rejected_on_load() {
        let result = mesh_from_str(r#"{ "vertex_count": 2, "indices": [0, 1, 2] }"#);
        assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
    }

    #[test]
    fn test_write_then_read() {
        let mesh = IndexedMesh::grid(2, 3);
        let mut buffer = Vec::new();
        write_mesh(&mut buffer, &mesh).unwrap();
        assert_eq!(read_mesh(buffer.as_slice()).unwrap(), mesh);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("tricache-format-does-not-exist.json");
        assert!(matches!(load_mesh(&path), Err(OptimizeError::Io(_))));
    }
}
