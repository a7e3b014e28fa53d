//! Record Store
//!
//! Per-vertex and per-triangle state for a single optimization run.
//!
//! Each vertex keeps the list of triangles that reference it. When a
//! triangle is emitted its id is moved to the back of every one of those
//! lists, so the emitted entries of a list always form a contiguous tail.
//! The selector relies on that to stop scanning a list at the first emitted
//! entry.

use smallvec::SmallVec;

use crate::OptimizeResult;
use crate::mesh::{MeshSnapshot, validate_snapshot};

/// Score given to vertices with no pending triangles
pub const INELIGIBLE_SCORE: f32 = -1.0;

/// Triangles referencing one vertex; most vertices in a manifold mesh have few
pub type TriangleList = SmallVec<[u32; 8]>;

/// Mutable per-vertex state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexRecord {
    /// Number of triangles referencing this vertex in the input
    pub valence: u32,
    /// Referencing triangles not yet emitted
    pub pending: u32,
    /// Slot in the cache window, if present
    pub cache_position: Option<u32>,
    /// Last computed score
    pub score: f32,
    /// Referencing triangle ids, emitted ones at the tail
    pub triangles: TriangleList,
}

/// Mutable per-triangle state
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleRecord {
    /// Vertex ids in input order
    pub vertices: [u32; 3],
    /// Set once the triangle has been appended to the output
    pub emitted: bool,
    /// Sum of the vertex scores as last computed
    pub score: f32,
}

/// Outcome of releasing one vertex reference of an emitted triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Pending count decreased normally
    Released,
    /// Pending count was already zero and was left at zero
    Underflow,
}

/// Vertex and triangle records built from a mesh snapshot
#[derive(Debug, Clone)]
pub struct RecordStore {
    vertices: Vec<VertexRecord>,
    triangles: Vec<TriangleRecord>,
    remaining: usize,
}

impl RecordStore {
    /// Build the records for a mesh, rejecting malformed index lists
    pub fn build<M: MeshSnapshot + ?Sized>(mesh: &M) -> OptimizeResult<Self> {
        validate_snapshot(mesh)?;

        let indices = mesh.indices();
        let mut vertices = vec![VertexRecord::default(); mesh.vertex_count() as usize];

        for (i, &v) in indices.iter().enumerate() {
            let vertex = &mut vertices[v as usize];
            vertex.valence += 1;
            vertex.pending += 1;
            vertex.triangles.push((i / 3) as u32);
        }

        let triangles: Vec<TriangleRecord> = indices
            .chunks_exact(3)
            .map(|tri| TriangleRecord {
                vertices: [tri[0], tri[1], tri[2]],
                emitted: false,
                score: 0.0,
            })
            .collect();

        Ok(Self {
            vertices,
            remaining: triangles.len(),
            triangles,
        })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles not yet emitted
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Vertex record by id
    pub fn vertex(&self, v: u32) -> &VertexRecord {
        &self.vertices[v as usize]
    }

    /// Mutable vertex record by id
    pub fn vertex_mut(&mut self, v: u32) -> &mut VertexRecord {
        &mut self.vertices[v as usize]
    }

    /// Triangle record by id
    pub fn triangle(&self, t: u32) -> &TriangleRecord {
        &self.triangles[t as usize]
    }

    /// Mutable triangle record by id
    pub fn triangle_mut(&mut self, t: u32) -> &mut TriangleRecord {
        &mut self.triangles[t as usize]
    }

    /// All vertex records
    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    /// All triangle records
    pub fn triangles(&self) -> &[TriangleRecord] {
        &self.triangles
    }

    /// Flag a triangle as emitted and return its vertices.
    ///
    /// Returns `None` if the triangle was already emitted.
    pub fn mark_emitted(&mut self, t: u32) -> Option<[u32; 3]> {
        let triangle = &mut self.triangles[t as usize];
        if triangle.emitted {
            return None;
        }
        triangle.emitted = true;
        self.remaining -= 1;
        Some(triangle.vertices)
    }

    /// Release one reference of vertex `v` held by emitted triangle `t`:
    /// decrement the pending count and move `t` to the back of the vertex's
    /// triangle list.
    pub fn release(&mut self, v: u32, t: u32) -> Release {
        let vertex = &mut self.vertices[v as usize];

        let outcome = match vertex.pending.checked_sub(1) {
            Some(pending) => {
                vertex.pending = pending;
                Release::Released
            }
            None => Release::Underflow,
        };

        if let Some(position) = vertex.triangles.iter().position(|&id| id == t) {
            let id = vertex.triangles.remove(position);
            vertex.triangles.push(id);
        }

        outcome
    }

    /// Check the bookkeeping invariants for every vertex: the pending count
    /// matches the unemitted references and the emitted references form a
    /// contiguous tail of the triangle list.
    pub fn check_consistency(&self) -> Result<(), String> {
        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.triangles.len() != vertex.valence as usize {
                return Err(format!(
                    "vertex {} lists {} triangles but has valence {}",
                    v,
                    vertex.triangles.len(),
                    vertex.valence
                ));
            }

            let emitted = vertex
                .triangles
                .iter()
                .filter(|&&t| self.triangles[t as usize].emitted)
                .count();
            if vertex.pending as usize != vertex.valence as usize - emitted {
                return Err(format!(
                    "vertex {} has pending {} but {} of {} references emitted",
                    v, vertex.pending, emitted, vertex.valence
                ));
            }

            let live_prefix = vertex
                .triangles
                .iter()
                .take_while(|&&t| !self.triangles[t as usize].emitted)
                .count();
            if live_prefix + emitted != vertex.triangles.len() {
                return Err(format!(
                    "vertex {} has emitted triangles ahead of pending ones",
                    v
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptimizeError;
    use crate::mesh::IndexedMesh;

    fn quad() -> IndexedMesh {
        IndexedMesh::new(4, vec![0, 1, 2, 2, 1, 3]).unwrap()
    }

    #[test]
    fn test_build_valences() {
        let records = RecordStore::build(&quad()).unwrap();
        assert_eq!(records.vertex_count(), 4);
        assert_eq!(records.triangle_count(), 2);
        assert_eq!(records.remaining(), 2);

        assert_eq!(records.vertex(0).valence, 1);
        assert_eq!(records.vertex(1).valence, 2);
        assert_eq!(records.vertex(2).pending, 2);
        assert_eq!(records.vertex(3).triangles.as_slice(), &[1]);
        assert_eq!(records.vertex(1).triangles.as_slice(), &[0, 1]);
        assert_eq!(records.vertex(0).cache_position, None);

        assert_eq!(records.triangle(1).vertices, [2, 1, 3]);
        assert!(!records.triangle(1).emitted);
        assert!(records.check_consistency().is_ok());
    }

    #[test]
    fn test_unused_vertex() {
        let mesh = IndexedMesh::new(5, vec![0, 1, 2]).unwrap();
        let records = RecordStore::build(&mesh).unwrap();
        assert_eq!(records.vertex(4).valence, 0);
        assert!(records.vertex(4).triangles.is_empty());
    }

    #[test]
    fn test_build_rejects_bad_index() {
        struct Raw(Vec<u32>);
        impl MeshSnapshot for Raw {
            fn vertex_count(&self) -> u32 {
                2
            }
            fn indices(&self) -> &[u32] {
                &self.0
            }
        }

        let result = RecordStore::build(&Raw(vec![0, 1, 2]));
        assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
    }

    #[test]
    fn test_release_moves_to_back() {
        let mut records = RecordStore::build(&quad()).unwrap();
        assert_eq!(records.mark_emitted(0), Some([0, 1, 2]));
        for v in [0, 1, 2] {
            assert_eq!(records.release(v, 0), Release::Released);
        }

        assert_eq!(records.vertex(1).triangles.as_slice(), &[1, 0]);
        assert_eq!(records.vertex(1).pending, 1);
        assert_eq!(records.vertex(0).pending, 0);
        assert_eq!(records.remaining(), 1);
        assert!(records.check_consistency().is_ok());
    }

    #[test]
    fn test_mark_emitted_once() {
        let mut records = RecordStore::build(&quad()).unwrap();
        assert!(records.mark_emitted(1).is_some());
        assert!(records.mark_emitted(1).is_none());
        assert_eq!(records.remaining(), 1);
    }

    #[test]
    fn test_release_underflow_clamps() {
        let mut records = RecordStore::build(&quad()).unwrap();
        records.vertex_mut(0).pending = 0;
        assert_eq!(records.release(0, 0), Release::Underflow);
        assert_eq!(records.vertex(0).pending, 0);
    }

    #[test]
    fn test_degenerate_triangle_references() {
        let mesh = IndexedMesh::new(2, vec![0, 0, 1]).unwrap();
        let mut records = RecordStore::build(&mesh).unwrap();
        assert_eq!(records.vertex(0).valence, 2);
        assert_eq!(records.vertex(0).triangles.as_slice(), &[0, 0]);

        let vertices = records.mark_emitted(0).unwrap();
        for v in vertices {
            assert_eq!(records.release(v, 0), Release::Released);
        }
        assert_eq!(records.vertex(0).pending, 0);
        assert!(records.check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_detects_stale_pending() {
        let mut records = RecordStore::build(&quad()).unwrap();
        records.mark_emitted(0);
        assert!(records.check_consistency().is_err());
    }
}
