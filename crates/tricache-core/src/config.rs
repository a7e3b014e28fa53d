//! Optimizer Configuration
//!
//! Tuning constants for the vertex scoring heuristic and the size of the
//! simulated vertex cache.

use serde::{Deserialize, Serialize};

use crate::{OptimizeError, OptimizeResult};

/// Slots at the front of the cache window that belong to the previous triangle
pub const LAST_TRIANGLE_SLOTS: usize = 3;

/// Smallest accepted `max_cache_size`
pub const MIN_CACHE_SIZE: u32 = 4;

/// How the cache-position term enters a vertex score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Score is the valence boost alone; the cache-position term is computed
    /// but not added.
    #[default]
    ValenceOnly,
    /// Score is the cache-position term plus the valence boost
    Combined,
}

/// Vertex cache optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Exponent sharpening the decay of the cache-position reward
    pub cache_decay_power: f32,
    /// Flat reward for vertices used by the previous triangle
    pub last_tri_score: f32,
    /// Scale of the low-valence boost
    pub valence_boost_scale: f32,
    /// Exponent of the low-valence boost
    pub valence_boost_power: f32,
    /// Simulated cache size; the window holds `max_cache_size - 3` entries
    pub max_cache_size: u32,
    /// Cache-position scoring variant
    pub scoring: ScoringMode,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cache_decay_power: 1.5,
            last_tri_score: 0.75,
            valence_boost_scale: 2.0,
            valence_boost_power: 0.5,
            max_cache_size: 35,
            scoring: ScoringMode::ValenceOnly,
        }
    }
}

impl OptimizerConfig {
    /// Set the cache decay power
    pub fn with_cache_decay_power(mut self, power: f32) -> Self {
        self.cache_decay_power = power;
        self
    }

    /// Set the score for the previous triangle's vertices
    pub fn with_last_tri_score(mut self, score: f32) -> Self {
        self.last_tri_score = score;
        self
    }

    /// Set the valence boost scale
    pub fn with_valence_boost_scale(mut self, scale: f32) -> Self {
        self.valence_boost_scale = scale;
        self
    }

    /// Set the valence boost power
    pub fn with_valence_boost_power(mut self, power: f32) -> Self {
        self.valence_boost_power = power;
        self
    }

    /// Set the simulated cache size
    pub fn with_max_cache_size(mut self, size: u32) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Set the scoring variant
    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    /// Number of entries the cache window keeps
    pub fn window_capacity(&self) -> usize {
        (self.max_cache_size as usize).saturating_sub(LAST_TRIANGLE_SLOTS)
    }

    /// FIFO size the evaluator uses when no capacity is given
    pub fn default_evaluation_capacity(&self) -> usize {
        self.window_capacity()
    }

    /// Check the configuration for values the scorer cannot work with
    pub fn validate(&self) -> OptimizeResult<()> {
        if self.max_cache_size < MIN_CACHE_SIZE {
            return Err(OptimizeError::Configuration(format!(
                "max_cache_size must be at least {}, got {}",
                MIN_CACHE_SIZE, self.max_cache_size
            )));
        }

        let constants = [
            ("cache_decay_power", self.cache_decay_power),
            ("last_tri_score", self.last_tri_score),
            ("valence_boost_scale", self.valence_boost_scale),
            ("valence_boost_power", self.valence_boost_power),
        ];
        for (name, value) in constants {
            if !value.is_finite() {
                return Err(OptimizeError::Configuration(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
