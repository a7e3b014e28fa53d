//! ACMR Evaluation
//!
//! Replays an index order through a plain FIFO vertex cache and reports the
//! miss count and the Average Cache Miss Ratio (misses per triangle). Unlike
//! the optimizer's cache window, a hit leaves the FIFO untouched and a vertex
//! is only inserted on a miss.

use std::collections::VecDeque;

/// Number of FIFO misses for an index order
pub fn count_misses(order: &[u32], capacity: usize) -> usize {
    let mut fifo: VecDeque<u32> = VecDeque::with_capacity(capacity + 1);
    let mut misses = 0;

    for &v in order {
        if fifo.contains(&v) {
            continue;
        }

        misses += 1;
        fifo.push_back(v);
        while fifo.len() > capacity {
            fifo.pop_front();
        }
    }

    misses
}

/// Average Cache Miss Ratio of an index order; `0.0` for an empty order
pub fn compute_acmr(order: &[u32], capacity: usize) -> f32 {
    miss_ratio(count_misses(order, capacity), order.len() / 3)
}

fn miss_ratio(misses: usize, triangle_count: usize) -> f32 {
    if triangle_count == 0 {
        return 0.0;
    }
    misses as f32 / triangle_count as f32
}

/// Miss statistics of an order before and after optimization
#[derive(Debug, Clone, PartialEq)]
pub struct AcmrComparison {
    /// FIFO size used for both replays
    pub capacity: usize,
    /// Triangles in each order
    pub triangle_count: usize,
    /// Misses of the original order
    pub original_misses: usize,
    /// Misses of the optimized order
    pub optimized_misses: usize,
    /// ACMR of the original order
    pub original_acmr: f32,
    /// ACMR of the optimized order
    pub optimized_acmr: f32,
}

impl AcmrComparison {
    /// Reduction in ACMR; negative when the optimized order is worse
    pub fn improvement(&self) -> f32 {
        self.original_acmr - self.optimized_acmr
    }
}

impl std::fmt::Display for AcmrComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Optimized ACMR: {:.4} Non: {:.4} (cache {}, {} triangles)",
            self.optimized_acmr, self.original_acmr, self.capacity, self.triangle_count
        )
    }
}

/// Evaluate two orders independently with the same FIFO size
pub fn compare_orders(original: &[u32], optimized: &[u32], capacity: usize) -> AcmrComparison {
    let original_misses = count_misses(original, capacity);
    let optimized_misses = count_misses(optimized, capacity);

    let triangle_count = original.len() / 3;

    AcmrComparison {
        capacity,
        triangle_count,
        original_misses,
        optimized_misses,
        original_acmr: miss_ratio(original_misses, triangle_count),
        optimized_acmr: miss_ratio(optimized_misses, optimized.len() / 3),
    }
}
