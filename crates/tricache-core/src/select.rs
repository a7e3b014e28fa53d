//! Greedy Selector
//!
//! Finds the next triangle to emit. Candidates come from the triangles of
//! the vertices currently in the cache window; when none remain the whole
//! triangle list is searched using the last stored scores.

use crate::records::RecordStore;
use crate::score::Scorer;
use crate::window::CacheWindow;

/// Which search produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPass {
    /// Found through a vertex in the cache window
    Window,
    /// Found by scanning every unemitted triangle
    Fallback,
}

/// Triangle chosen for emission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Triangle id
    pub triangle: u32,
    /// Score it won with
    pub score: f32,
    /// Search that found it
    pub pass: SelectionPass,
}

/// Tracks the highest score seen; ties keep the earlier candidate
#[derive(Debug, Default)]
struct Best {
    found: Option<(u32, f32)>,
}

impl Best {
    fn offer(&mut self, triangle: u32, score: f32) {
        match self.found {
            Some((_, best)) if score <= best => {}
            _ => self.found = Some((triangle, score)),
        }
    }
}

/// Pick the next triangle, or `None` when no unemitted triangle is reachable
pub fn select_next(
    records: &mut RecordStore,
    window: &CacheWindow,
    scorer: &Scorer,
) -> Option<Selection> {
    if let Some((triangle, score)) = scan_window(records, window, scorer) {
        return Some(Selection {
            triangle,
            score,
            pass: SelectionPass::Window,
        });
    }

    scan_all(records).map(|(triangle, score)| Selection {
        triangle,
        score,
        pass: SelectionPass::Fallback,
    })
}

/// Rescore and rank the live triangles of every windowed vertex
fn scan_window(
    records: &mut RecordStore,
    window: &CacheWindow,
    scorer: &Scorer,
) -> Option<(u32, f32)> {
    let mut best = Best::default();

    for v in window.iter() {
        let count = records.vertex(v).triangles.len();
        for j in 0..count {
            let t = records.vertex(v).triangles[j];
            // Emitted triangles sit at the tail of the list.
            if records.triangle(t).emitted {
                break;
            }

            let score = scorer.score_triangle(records, t);
            best.offer(t, score);
        }
    }

    best.found
}

/// Rank every unemitted triangle by its stored score
fn scan_all(records: &RecordStore) -> Option<(u32, f32)> {
    let mut best = Best::default();

    for (t, triangle) in records.triangles().iter().enumerate() {
        if !triangle.emitted {
            best.offer(t as u32, triangle.score);
        }
    }

    best.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::mesh::IndexedMesh;

    fn setup(mesh: &IndexedMesh) -> (RecordStore, CacheWindow, Scorer) {
        let config = OptimizerConfig::default();
        let scorer = Scorer::new(&config);
        let mut records = RecordStore::build(mesh).unwrap();
        scorer.prime(&mut records);
        (records, CacheWindow::new(config.window_capacity()), scorer)
    }

    #[test]
    fn test_empty_window_uses_fallback() {
        // Triangle 1 holds two low-valence vertices and scores highest.
        let mesh = IndexedMesh::new(5, vec![0, 1, 2, 2, 3, 4, 0, 2, 1]).unwrap();
        let (mut records, window, scorer) = setup(&mesh);

        let selection = select_next(&mut records, &window, &scorer).unwrap();
        assert_eq!(selection.pass, SelectionPass::Fallback);
        assert_eq!(selection.triangle, 1);
    }

    #[test]
    fn test_fallback_tie_keeps_first() {
        let mesh = IndexedMesh::new(6, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let (mut records, window, scorer) = setup(&mesh);

        let selection = select_next(&mut records, &window, &scorer).unwrap();
        assert_eq!(selection.triangle, 0);
        assert_eq!(selection.score, 6.0);
    }

    #[test]
    fn test_window_candidates_preferred() {
        // Triangle 2 is isolated and scores highest, but triangle 1 shares
        // vertices with the window.
        let mesh = IndexedMesh::new(7, vec![0, 1, 2, 1, 2, 3, 4, 5, 6]).unwrap();
        let (mut records, mut window, scorer) = setup(&mesh);

        records.mark_emitted(0);
        for v in [0, 1, 2] {
            records.release(v, 0);
            window.push_front(v);
        }
        for v in window.to_vec() {
            scorer.score_vertex(&mut records, v);
        }

        let selection = select_next(&mut records, &window, &scorer).unwrap();
        assert_eq!(selection.pass, SelectionPass::Window);
        assert_eq!(selection.triangle, 1);
    }

    #[test]
    fn test_exhausted_window_falls_back() {
        let mesh = IndexedMesh::new(6, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let (mut records, mut window, scorer) = setup(&mesh);

        records.mark_emitted(0);
        for v in [0, 1, 2] {
            records.release(v, 0);
            window.push_front(v);
        }

        let selection = select_next(&mut records, &window, &scorer).unwrap();
        assert_eq!(selection.pass, SelectionPass::Fallback);
        assert_eq!(selection.triangle, 1);
    }

    #[test]
    fn test_nothing_left() {
        let mesh = IndexedMesh::new(3, vec![0, 1, 2]).unwrap();
        let (mut records, window, scorer) = setup(&mesh);
        records.mark_emitted(0);
        assert!(select_next(&mut records, &window, &scorer).is_none());
    }

    #[test]
    fn test_unused_vertex_never_selected() {
        let mesh = IndexedMesh::new(4, vec![0, 1, 2]).unwrap();
        let (mut records, mut window, scorer) = setup(&mesh);
        window.push_front(3);

        let selection = select_next(&mut records, &window, &scorer).unwrap();
        assert_eq!(selection.pass, SelectionPass::Fallback);
        assert_eq!(selection.triangle, 0);
    }
}
