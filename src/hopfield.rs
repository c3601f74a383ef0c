//! Toy Hopfield associative memory.
//!
//! Stores bipolar (±1) patterns in a dense symmetric weight matrix built
//! from pairwise correlation (Hebbian rule) and recalls them by iterative
//! asynchronous update.  The network is untrained (all-zero weights) until
//! the first pattern is stored; every store recomputes the full matrix from
//! scratch, so training is idempotent for a given pattern set.
//!
//! Recall repeats full passes — node indices visited in random order — until
//! a pass changes nothing.  The source algorithm had no iteration bound; the
//! loop here is capped and reports non-convergence instead of spinning.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{LabError, LabResult};

/// Outcome of one asynchronous recall run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallResult {
    /// Final bipolar state vector.
    pub pattern: Vec<f32>,
    /// Full passes executed.
    pub passes: usize,
    /// True if the last pass reached a fixed point; false if the pass cap
    /// was hit first.
    pub converged: bool,
}

/// Dense Hopfield network over `node_count` bipolar nodes.
#[derive(Debug, Clone)]
pub struct HopfieldNetwork {
    node_count: usize,
    /// Row-major `node_count × node_count` weight matrix; diagonal is zero.
    weights: Vec<f32>,
    /// Stored bipolar patterns the matrix was trained from.
    patterns: Vec<Vec<f32>>,
}

impl HopfieldNetwork {
    /// An untrained network: no patterns, all-zero weights.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            weights: vec![0.0; node_count * node_count],
            patterns: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// True once at least one pattern has been stored.
    pub fn is_trained(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Connection strength between nodes `i` and `j`.
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.weights[i * self.node_count + j]
    }

    /// Store a bipolar pattern and retrain.
    ///
    /// The full weight matrix is recomputed from **all** stored patterns:
    /// `w[i][j] = Σ_p p[i]·p[j] / P`, with `w[i][i] = 0`.
    pub fn store(&mut self, pattern: &[f32]) -> LabResult<()> {
        if pattern.len() != self.node_count {
            return Err(LabError::DimensionMismatch {
                got: pattern.len(),
                expected: self.node_count,
            });
        }
        self.patterns.push(pattern.to_vec());
        self.retrain();
        Ok(())
    }

    /// Recompute the weight matrix from the stored patterns.
    fn retrain(&mut self) {
        let n = self.node_count;
        let p = self.patterns.len() as f32;
        for i in 0..n {
            for j in 0..n {
                self.weights[i * n + j] = if i == j {
                    0.0
                } else {
                    self.patterns.iter().map(|pat| pat[i] * pat[j]).sum::<f32>() / p
                };
            }
        }
    }

    /// Asynchronous recall from `input`, bounded by `max_passes`.
    ///
    /// Each pass visits every node once in a freshly shuffled order.  A
    /// node's next value is the sign of the weighted sum of all other nodes
    /// *relative to the node's own current value* — strictly greater flips
    /// it high, strictly less flips it low, equality leaves it unchanged.
    /// The run ends at the first pass that changes nothing.
    pub fn recall<R: Rng>(
        &self,
        input: &[f32],
        rng: &mut R,
        max_passes: usize,
    ) -> LabResult<RecallResult> {
        if input.len() != self.node_count {
            return Err(LabError::DimensionMismatch {
                got: input.len(),
                expected: self.node_count,
            });
        }

        let n = self.node_count;
        let mut state = input.to_vec();
        let mut order: Vec<usize> = (0..n).collect();

        let mut passes = 0;
        let mut converged = false;
        while passes < max_passes {
            passes += 1;
            order.shuffle(rng);

            let mut changed = false;
            for &i in &order {
                let weighted_sum: f32 =
                    (0..n).map(|j| self.weight(i, j) * state[j]).sum();
                let current = state[i];
                let next = if weighted_sum > current {
                    1.0
                } else if weighted_sum < current {
                    -1.0
                } else {
                    current
                };
                if next != current {
                    state[i] = next;
                    changed = true;
                }
            }

            if !changed {
                converged = true;
                break;
            }
        }

        Ok(RecallResult {
            pattern: state,
            passes,
            converged,
        })
    }
}

// ── Bipolar conversion ────────────────────────────────────────────────────────

/// Maps external values to the bipolar ±1 domain and back.
///
/// Encoding thresholds at `midpoint` (`v >= midpoint` → +1); decoding maps
/// +1 to `high` and everything else to `low`.
#[derive(Debug, Clone, Copy)]
pub struct BipolarCodec {
    pub low: f32,
    pub high: f32,
    pub midpoint: f32,
}

impl Default for BipolarCodec {
    fn default() -> Self {
        Self {
            low: crate::constants::BIPOLAR_LOW,
            high: crate::constants::BIPOLAR_HIGH,
            midpoint: crate::constants::BIPOLAR_MIDPOINT,
        }
    }
}

impl BipolarCodec {
    pub fn encode(&self, values: &[f32]) -> Vec<f32> {
        values
            .iter()
            .map(|&v| if v >= self.midpoint { 1.0 } else { -1.0 })
            .collect()
    }

    pub fn decode(&self, bipolar: &[f32]) -> Vec<f32> {
        bipolar
            .iter()
            .map(|&b| if b > 0.0 { self.high } else { self.low })
            .collect()
    }
}
