//! Vertex and Triangle Scoring
//!
//! A vertex score rewards vertices that sit near the front of the cache
//! window and vertices with few triangles left to emit. A triangle score is
//! the sum of its three vertex scores.

use crate::config::{LAST_TRIANGLE_SLOTS, OptimizerConfig, ScoringMode};
use crate::records::{INELIGIBLE_SCORE, RecordStore};

/// Scoring heuristic with its tuning constants
#[derive(Debug, Clone)]
pub struct Scorer {
    cache_decay_power: f32,
    last_tri_score: f32,
    valence_boost_scale: f32,
    valence_boost_power: f32,
    /// `1 / (max_cache_size - 3)`
    position_scale: f32,
    scoring: ScoringMode,
}

impl Scorer {
    /// Create a scorer from a validated configuration
    pub fn new(config: &OptimizerConfig) -> Self {
        let span = config.max_cache_size.saturating_sub(LAST_TRIANGLE_SLOTS as u32).max(1);
        Self {
            cache_decay_power: config.cache_decay_power,
            last_tri_score: config.last_tri_score,
            valence_boost_scale: config.valence_boost_scale,
            valence_boost_power: config.valence_boost_power,
            position_scale: 1.0 / span as f32,
            scoring: config.scoring,
        }
    }

    /// Reward for a vertex's place in the cache window
    pub fn cache_position_score(&self, position: Option<u32>) -> f32 {
        match position {
            None => 0.0,
            // The previous triangle's vertices share one score so that its
            // winding order does not matter.
            Some(slot) if (slot as usize) < LAST_TRIANGLE_SLOTS => self.last_tri_score,
            Some(slot) => {
                let offset = (slot as usize - LAST_TRIANGLE_SLOTS) as f32;
                (1.0 - offset * self.position_scale)
                    .max(0.0)
                    .powf(self.cache_decay_power)
            }
        }
    }

    /// Reward for a vertex with few pending triangles
    pub fn valence_boost(&self, pending: u32) -> f32 {
        let boost = (pending as f32).powf(-self.valence_boost_power);
        self.valence_boost_scale * boost
    }

    /// Score for a vertex in the given state
    pub fn vertex_score(&self, pending: u32, cache_position: Option<u32>) -> f32 {
        if pending == 0 {
            return INELIGIBLE_SCORE;
        }

        let position_score = self.cache_position_score(cache_position);
        let valence_score = self.valence_boost(pending);

        match self.scoring {
            ScoringMode::ValenceOnly => valence_score,
            ScoringMode::Combined => position_score + valence_score,
        }
    }

    /// Recompute and store the score of vertex `v`
    pub fn score_vertex(&self, records: &mut RecordStore, v: u32) -> f32 {
        let vertex = records.vertex(v);
        let score = self.vertex_score(vertex.pending, vertex.cache_position);
        records.vertex_mut(v).score = score;
        score
    }

    /// Recompute and store the score of triangle `t`
    pub fn score_triangle(&self, records: &mut RecordStore, t: u32) -> f32 {
        let [a, b, c] = records.triangle(t).vertices;
        let score = records.vertex(a).score + records.vertex(b).score + records.vertex(c).score;
        records.triangle_mut(t).score = score;
        score
    }

    /// Score every vertex, then every triangle
    pub fn prime(&self, records: &mut RecordStore) {
        for v in 0..records.vertex_count() as u32 {
            self.score_vertex(records, v);
        }
        for t in 0..records.triangle_count() as u32 {
            self.score_triangle(records, t);
        }
    }
}
