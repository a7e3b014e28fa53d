//! Progress and Diagnostics
//!
//! The optimizer reports phase transitions, mesh statistics and non-fatal
//! anomalies through [`OptimizeObserver`] instead of writing to a fixed
//! stream. [`LogObserver`] forwards everything to the `log` facade.

use crate::optimizer::OptimizeStats;

/// Optimizer state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Building the record store
    Init,
    /// Priming vertex and triangle scores
    Scoring,
    /// Select/emit loop
    Selecting,
    /// Output complete
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Scoring => "scoring",
            Self::Selecting => "selecting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Non-fatal inconsistency found while optimizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// A vertex's pending count would have dropped below zero while
    /// emitting `triangle`; it was clamped to zero
    ValenceUnderflow { triangle: u32, vertex: u32 },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValenceUnderflow { triangle, vertex } => write!(
                f,
                "triangle {} vertex {} has valence less than zero",
                triangle, vertex
            ),
        }
    }
}

/// Receiver for optimizer progress
pub trait OptimizeObserver {
    /// Called when the optimizer enters a phase
    fn phase(&mut self, _phase: Phase) {}

    /// Called once the record store has been built
    fn mesh_stats(&mut self, _vertex_count: usize, _triangle_count: usize) {}

    /// Called for every non-fatal anomaly
    fn anomaly(&mut self, _anomaly: Anomaly) {}

    /// Called after the output is complete
    fn finished(&mut self, _stats: &OptimizeStats) {}
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl OptimizeObserver for NullObserver {}

/// Observer that forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl OptimizeObserver for LogObserver {
    fn phase(&mut self, phase: Phase) {
        log::debug!(target: "tricache", "Entering phase: {}", phase);
    }

    fn mesh_stats(&mut self, vertex_count: usize, triangle_count: usize) {
        log::info!(
            target: "tricache",
            "Verts: {} Triangles: {}",
            vertex_count,
            triangle_count
        );
    }

    fn anomaly(&mut self, anomaly: Anomaly) {
        log::warn!(target: "tricache", "{}", anomaly);
    }

    fn finished(&mut self, stats: &OptimizeStats) {
        log::info!(
            target: "tricache",
            "Optimizing finished: {} window selections, {} fallback selections",
            stats.window_selections,
            stats.fallback_selections
        );
        if stats.valence_underflows > 0 {
            log::warn!(
                target: "tricache",
                "{} valence underflows clamped",
                stats.valence_underflows
            );
        }
    }
}

/// Observer that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Phases in the order entered
    pub phases: Vec<Phase>,
    /// Vertex and triangle counts, once reported
    pub mesh_stats: Option<(usize, usize)>,
    /// Anomalies in the order reported
    pub anomalies: Vec<Anomaly>,
    /// Final statistics, once reported
    pub stats: Option<OptimizeStats>,
}

impl OptimizeObserver for RecordingObserver {
    fn phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    fn mesh_stats(&mut self, vertex_count: usize, triangle_count: usize) {
        self.mesh_stats = Some((vertex_count, triangle_count));
    }

    fn anomaly(&mut self, anomaly: Anomaly) {
        self.anomalies.push(anomaly);
    }

    fn finished(&mut self, stats: &OptimizeStats) {
        self.stats = Some(stats.clone());
    }
}

impl<T: OptimizeObserver + ?Sized> OptimizeObserver for &mut T {
    fn phase(&mut self, phase: Phase) {
        (**self).phase(phase);
    }

    fn mesh_stats(&mut self, vertex_count: usize, triangle_count: usize) {
        (**self).mesh_stats(vertex_count, triangle_count);
    }

    fn anomaly(&mut self, anomaly: Anomaly) {
        (**self).anomaly(anomaly);
    }

    fn finished(&mut self, stats: &OptimizeStats) {
        (**self).finished(stats);
    }
}
