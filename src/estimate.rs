//! Analytic compressed-size and CID estimate from an LZ77 factor count.
//!
//! For `k` factors over `n` symbols the size is approximated as
//! `k·log2(k) + 2·k·log2(n/k)` bits: `log2(k)` bits to say which factor,
//! and `log2(n/k)` bits each for offset and length. Outside `0 < k < n` the
//! sequence is treated as incompressible and costs `8·n` bits.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which branch of the estimate produced the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// `0 < k < n`: the analytic bound applies.
    Compressible,
    /// Every factor is a literal (or the count is otherwise degenerate).
    Incompressible,
}

/// Estimated size in bits for `factors` factors over `length` symbols.
///
/// Pure and total: degenerate counts fall back to `8 * length` bits.
pub fn compressed_bits(factors: usize, length: usize) -> (f64, Regime) {
    if factors > 0 && factors < length {
        let k = factors as f64;
        let n = length as f64;
        (k * k.log2() + 2.0 * k * (n / k).log2(), Regime::Compressible)
    } else {
        (8.0 * length as f64, Regime::Incompressible)
    }
}

/// Statistics for one analysed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    /// Number of symbols in the sequence.
    pub length: usize,
    /// Number of LZ77 factors.
    pub factors: usize,
    /// Estimated compressed size.
    pub compressed_bits: f64,
    /// `compressed_bits / (8 * length)`.
    pub cid: f64,
    pub regime: Regime,
}

impl CompressionStats {
    /// Estimates the statistics for a factor count.
    ///
    /// Only an empty sequence is rejected; degenerate factor counts are a
    /// valid incompressible outcome.
    pub fn from_counts(factors: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::empty_sequence());
        }
        let (compressed_bits, regime) = compressed_bits(factors, length);
        Ok(Self {
            length,
            factors,
            compressed_bits,
            cid: compressed_bits / (8.0 * length as f64),
            regime,
        })
    }

    pub fn compressed_bytes(&self) -> f64 {
        self.compressed_bits / 8.0
    }

    /// Fraction of the raw size saved, `1 - cid`.
    pub fn compression_ratio(&self) -> f64 {
        1.0 - self.cid
    }

    pub fn is_incompressible(&self) -> bool {
        self.regime == Regime::Incompressible
    }
}
