//! Vertex Cache Optimizer
//!
//! Drives one optimization run through its phases:
//! `Init -> Scoring -> Selecting -> Done`.
//!
//! - **Init** builds the record store from the mesh snapshot
//! - **Scoring** primes every vertex score, then every triangle score
//! - **Selecting** repeats select/emit until no triangle is left
//! - **Done** hands the finished index order back to the caller
//!
//! The record store and cache window belong to a single run and are dropped
//! with it; only the output order outlives the run.

use std::time::Instant;

use rayon::prelude::*;

use crate::acmr::{AcmrComparison, compare_orders};
use crate::config::OptimizerConfig;
use crate::mesh::MeshSnapshot;
use crate::observer::{Anomaly, LogObserver, OptimizeObserver, Phase};
use crate::records::{RecordStore, Release};
use crate::score::Scorer;
use crate::select::{SelectionPass, select_next};
use crate::window::CacheWindow;
use crate::{OptimizeError, OptimizeResult};

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Vertices in the mesh
    pub vertex_count: usize,
    /// Triangles in the mesh
    pub triangle_count: usize,
    /// Triangles found through the cache window
    pub window_selections: usize,
    /// Triangles found by the full fallback scan
    pub fallback_selections: usize,
    /// Pending counts clamped at zero
    pub valence_underflows: usize,
}

/// Optimized index order with the statistics of the run that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOutput {
    indices: Vec<u32>,
    stats: OptimizeStats,
}

impl OptimizeOutput {
    /// Optimized index list
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Run statistics
    pub fn stats(&self) -> &OptimizeStats {
        &self.stats
    }

    /// Number of triangles in the output
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex ids of the `i`-th emitted triangle
    pub fn triangle(&self, i: usize) -> Option<[u32; 3]> {
        self.indices
            .get(i * 3..i * 3 + 3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Take ownership of the index list
    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }
}

/// Reorders triangle lists for FIFO vertex cache reuse
#[derive(Debug, Clone)]
pub struct VertexCacheOptimizer {
    config: OptimizerConfig,
    scorer: Scorer,
}

impl VertexCacheOptimizer {
    /// Create an optimizer, rejecting invalid configurations
    pub fn new(config: OptimizerConfig) -> OptimizeResult<Self> {
        config.validate()?;
        let scorer = Scorer::new(&config);
        Ok(Self { config, scorer })
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Reorder a mesh's triangles, reporting progress through `log`
    pub fn optimize<M: MeshSnapshot + ?Sized>(&self, mesh: &M) -> OptimizeResult<Vec<u32>> {
        self.optimize_with_observer(mesh, LogObserver)
            .map(OptimizeOutput::into_indices)
    }

    /// Reorder a mesh's triangles and return the run statistics as well
    pub fn optimize_detailed<M: MeshSnapshot + ?Sized>(
        &self,
        mesh: &M,
    ) -> OptimizeResult<OptimizeOutput> {
        self.optimize_with_observer(mesh, LogObserver)
    }

    /// Reorder a mesh's triangles, reporting progress to `observer`
    pub fn optimize_with_observer<M, O>(&self, mesh: &M, observer: O) -> OptimizeResult<OptimizeOutput>
    where
        M: MeshSnapshot + ?Sized,
        O: OptimizeObserver,
    {
        let start = Instant::now();
        let output = OptimizationRun::start(&self.scorer, &self.config, mesh, observer)?.finish()?;

        tracing::debug!(
            target: "timing",
            name = "optimize",
            triangles = output.stats.triangle_count as u64,
            duration_us = start.elapsed().as_micros() as u64,
            "Timer completed"
        );

        Ok(output)
    }

    /// Optimize a mesh and evaluate the input and output orders with a FIFO
    /// of `max_cache_size - 3` entries
    pub fn compare<M: MeshSnapshot + ?Sized>(&self, mesh: &M) -> OptimizeResult<AcmrComparison> {
        self.compare_with_capacity(mesh, self.config.default_evaluation_capacity())
    }

    /// Optimize a mesh and evaluate both orders with a FIFO of `capacity`
    pub fn compare_with_capacity<M: MeshSnapshot + ?Sized>(
        &self,
        mesh: &M,
        capacity: usize,
    ) -> OptimizeResult<AcmrComparison> {
        let optimized = self.optimize(mesh)?;
        Ok(compare_orders(mesh.indices(), &optimized, capacity))
    }
}

/// Optimize independent meshes in parallel, one run per mesh.
///
/// Results are returned in input order.
pub fn optimize_batch<M>(
    optimizer: &VertexCacheOptimizer,
    meshes: &[M],
) -> Vec<OptimizeResult<Vec<u32>>>
where
    M: MeshSnapshot + Sync,
{
    meshes.par_iter().map(|mesh| optimizer.optimize(mesh)).collect()
}

/// State of a single optimization
struct OptimizationRun<'a, O: OptimizeObserver> {
    scorer: &'a Scorer,
    records: RecordStore,
    window: CacheWindow,
    output: Vec<u32>,
    stats: OptimizeStats,
    observer: O,
}

impl<'a, O: OptimizeObserver> OptimizationRun<'a, O> {
    /// Build the records and prime all scores
    fn start<M: MeshSnapshot + ?Sized>(
        scorer: &'a Scorer,
        config: &OptimizerConfig,
        mesh: &M,
        mut observer: O,
    ) -> OptimizeResult<Self> {
        observer.phase(Phase::Init);
        let records = RecordStore::build(mesh)?;
        observer.mesh_stats(records.vertex_count(), records.triangle_count());

        let mut run = Self {
            scorer,
            window: CacheWindow::new(config.window_capacity()),
            output: Vec::with_capacity(records.triangle_count() * 3),
            stats: OptimizeStats {
                vertex_count: records.vertex_count(),
                triangle_count: records.triangle_count(),
                ..Default::default()
            },
            records,
            observer,
        };

        run.observer.phase(Phase::Scoring);
        run.scorer.prime(&mut run.records);
        run.observer.phase(Phase::Selecting);

        Ok(run)
    }

    /// Select and emit one triangle. Returns false once nothing is selectable.
    fn step(&mut self) -> OptimizeResult<bool> {
        let Some(selection) = select_next(&mut self.records, &self.window, self.scorer) else {
            return Ok(false);
        };

        match selection.pass {
            SelectionPass::Window => self.stats.window_selections += 1,
            SelectionPass::Fallback => self.stats.fallback_selections += 1,
        }

        self.emit(selection.triangle)?;
        Ok(true)
    }

    /// Append triangle `t` to the output and update records, window and scores
    fn emit(&mut self, t: u32) -> OptimizeResult<()> {
        let Some(vertices) = self.records.mark_emitted(t) else {
            return Err(OptimizeError::InternalInvariant(format!(
                "triangle {} selected after it was emitted",
                t
            )));
        };
        self.output.extend_from_slice(&vertices);

        for v in vertices {
            if self.records.release(v, t) == Release::Underflow {
                self.stats.valence_underflows += 1;
                self.observer.anomaly(Anomaly::ValenceUnderflow {
                    triangle: t,
                    vertex: v,
                });
            }
        }

        let mut evicted = [None; 3];
        for (slot, v) in evicted.iter_mut().zip(vertices) {
            *slot = self.window.push_front(v);
        }

        for v in evicted.into_iter().flatten() {
            if !self.window.contains(v) {
                self.records.vertex_mut(v).cache_position = None;
                self.scorer.score_vertex(&mut self.records, v);
            }
        }

        // Duplicates end up with the slot of their deepest copy.
        for (slot, v) in self.window.iter().enumerate() {
            self.records.vertex_mut(v).cache_position = Some(slot as u32);
            self.scorer.score_vertex(&mut self.records, v);
        }

        Ok(())
    }

    /// Run the select/emit loop to completion
    fn finish(mut self) -> OptimizeResult<OptimizeOutput> {
        while self.step()? {}

        let expected = self.records.triangle_count() * 3;
        if self.records.remaining() != 0 || self.output.len() != expected {
            return Err(OptimizeError::InternalInvariant(format!(
                "no selectable triangle with {} of {} triangles unemitted",
                self.records.remaining(),
                self.records.triangle_count()
            )));
        }

        self.observer.phase(Phase::Done);
        self.observer.finished(&self.stats);

        Ok(OptimizeOutput {
            indices: self.output,
            stats: self.stats,
        })
    }
}
