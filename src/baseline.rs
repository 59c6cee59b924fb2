//! Normalization against shuffled copies of a sequence.
//!
//! Shuffling keeps the symbol frequencies but destroys spatial correlation,
//! so `cid / cid_shuffled` isolates the structure carried by symbol order:
//! close to 1 for gas-like input, well below 1 for ordered input.
//!
//! Every CID here comes from an independent run of the pipeline; nothing is
//! shared between runs, which is what lets [`batch`] spread them over threads.

use crate::error::{Error, Result};
use crate::estimate::CompressionStats;
use crate::pipeline::CidAnalyzer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// CID of a sequence relative to its shuffled baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCid {
    pub cid: f64,
    /// Mean CID over the shuffled copies.
    pub cid_shuffled: f64,
    /// Population standard deviation of the shuffled CIDs; 0 for a single copy.
    pub cid_shuffled_std: f64,
    pub cid_normalized: f64,
    /// `1 - cid_normalized`.
    pub compression_gain: f64,
}

impl NormalizedCid {
    /// Combines an original CID with the CIDs of its shuffled copies.
    ///
    /// A non-positive (or missing) baseline yields `cid_normalized = 1`.
    pub fn from_samples(cid: f64, shuffled: &[f64]) -> Self {
        let (mean, std) = if shuffled.is_empty() {
            (0.0, 0.0)
        } else {
            let n = shuffled.len() as f64;
            let mean = shuffled.iter().sum::<f64>() / n;
            let std = if shuffled.len() > 1 {
                (shuffled.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt()
            } else {
                0.0
            };
            (mean, std)
        };

        let (cid_normalized, compression_gain) = if mean > 0.0 {
            let norm = cid / mean;
            (norm, 1.0 - norm)
        } else {
            (1.0, 0.0)
        };

        Self {
            cid,
            cid_shuffled: mean,
            cid_shuffled_std: std,
            cid_normalized,
            compression_gain,
        }
    }
}

/// Configuration for the shuffled baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleBaseline {
    /// Number of shuffled copies to average over.
    pub shuffles: usize,
    /// Seed for the permutation generator; equal seeds give equal results.
    pub seed: u64,
}

impl Default for ShuffleBaseline {
    fn default() -> Self {
        Self {
            shuffles: 1,
            seed: 0,
        }
    }
}

impl ShuffleBaseline {
    pub fn new(shuffles: usize, seed: u64) -> Self {
        Self { shuffles, seed }
    }

    /// Computes the CID of `text` and of `shuffles` random permutations of it.
    pub fn compute(&self, analyzer: &CidAnalyzer, text: &[u8]) -> Result<NormalizedCid> {
        if self.shuffles == 0 {
            return Err(Error::InvalidInput {
                reason: "at least one shuffle is required",
            });
        }
        let original = analyzer.stats(text)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut shuffled = text.to_vec();
        let mut samples = Vec::with_capacity(self.shuffles);
        for _ in 0..self.shuffles {
            shuffled.shuffle(&mut rng);
            samples.push(analyzer.stats(&shuffled)?.cid);
        }

        let result = NormalizedCid::from_samples(original.cid, &samples);
        debug!(
            cid = result.cid,
            cid_shuffled = result.cid_shuffled,
            cid_normalized = result.cid_normalized,
            shuffles = self.shuffles,
            "baseline computed"
        );
        Ok(result)
    }
}

/// Computes statistics for many sequences in parallel, preserving input order.
///
/// A failure on one sequence does not affect the others.
pub fn batch<T>(analyzer: &CidAnalyzer, inputs: &[T]) -> Vec<Result<CompressionStats>>
where
    T: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|text| analyzer.stats(text.as_ref()))
        .collect()
}

/// Computes normalized CIDs for many sequences in parallel, preserving input order.
pub fn batch_normalized<T>(
    analyzer: &CidAnalyzer,
    baseline: &ShuffleBaseline,
    inputs: &[T],
) -> Vec<Result<NormalizedCid>>
where
    T: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|text| baseline.compute(analyzer, text.as_ref()))
        .collect()
}
