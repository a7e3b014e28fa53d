//! Mesh Snapshot
//!
//! The read-only view of a mesh the optimizer consumes: a vertex count and a
//! flat triangle index list. Vertex attributes live with the caller's mesh
//! container and are never touched.

use serde::{Deserialize, Serialize};

use crate::{OptimizeError, OptimizeResult};

/// Read-only triangle list input
pub trait MeshSnapshot {
    /// Number of vertices the indices may refer to
    fn vertex_count(&self) -> u32;

    /// Flat index list, three entries per triangle
    fn indices(&self) -> &[u32];

    /// Number of triangles in the index list
    fn triangle_count(&self) -> usize {
        self.indices().len() / 3
    }
}

/// Check that a snapshot is a well-formed triangle list
pub fn validate_snapshot<M: MeshSnapshot + ?Sized>(mesh: &M) -> OptimizeResult<()> {
    validate_indices(mesh.vertex_count(), mesh.indices())
}

/// Check an index list against a vertex count
pub fn validate_indices(vertex_count: u32, indices: &[u32]) -> OptimizeResult<()> {
    if indices.len() % 3 != 0 {
        return Err(OptimizeError::InvalidInput(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }

    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &index)| index >= vertex_count)
    {
        return Err(OptimizeError::InvalidInput(format!(
            "index {} at position {} is out of range for {} vertices",
            index, position, vertex_count
        )));
    }

    Ok(())
}

/// Minimal owned triangle list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexedMesh {
    vertex_count: u32,
    indices: Vec<u32>,
}

impl IndexedMesh {
    /// Create a validated mesh
    pub fn new(vertex_count: u32, indices: Vec<u32>) -> OptimizeResult<Self> {
        validate_indices(vertex_count, &indices)?;
        Ok(Self {
            vertex_count,
            indices,
        })
    }

    /// Regular grid of `quads_x` by `quads_y` quads, two triangles each,
    /// emitted row by row
    pub fn grid(quads_x: u32, quads_y: u32) -> Self {
        let stride = quads_x + 1;
        let mut indices = Vec::with_capacity((quads_x * quads_y * 6) as usize);

        for y in 0..quads_y {
            for x in 0..quads_x {
                let top_left = y * stride + x;
                let top_right = top_left + 1;
                let bottom_left = top_left + stride;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        Self {
            vertex_count: stride * (quads_y + 1),
            indices,
        }
    }

    /// Same vertices with a different index order
    pub fn with_indices(&self, indices: Vec<u32>) -> OptimizeResult<Self> {
        Self::new(self.vertex_count, indices)
    }

    /// Vertex ids of triangle `t`
    pub fn triangle(&self, t: usize) -> Option<[u32; 3]> {
        self.indices
            .get(t * 3..t * 3 + 3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Consume the mesh, returning its index list
    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }
}

impl MeshSnapshot for IndexedMesh {
    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let mesh = IndexedMesh::grid(9, 9);
        assert_eq!(mesh.vertex_count(), 100);
        assert_eq!(mesh.triangle_count(), 162);
        assert_eq!(mesh.triangle(0), Some([0, 10, 1]));
        assert_eq!(mesh.triangle(1), Some([1, 10, 11]));
        assert!(validate_snapshot(&mesh).is_ok());
    }

    #[test]
    fn test_empty_grid() {
        let mesh = IndexedMesh::grid(0, 4);
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let result = IndexedMesh::new(3, vec![0, 1]);
        assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = IndexedMesh::new(3, vec![0, 1, 3]);
        assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
    }

    #[test]
    fn test_triangle_out_of_range() {
        let mesh = IndexedMesh::new(3, vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.triangle(1), None);
    }
}
