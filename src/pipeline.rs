//! In-memory CID computation: suffix array, LCP array, factorization, estimate.

use crate::error::{Error, Result};
use crate::estimate::CompressionStats;
use crate::factor::Factorization;
use crate::factorize::{
    factorize_accelerated, factorize_reference, FactorizeOptions, Strategy,
};
use crate::lcp::LcpArray;
use crate::suffix_array::SuffixArray;
use tracing::debug;

/// Computes the CID of `text` with the default options.
///
/// # Example
///
/// ```
/// use cid_rs::compute_cid;
///
/// let stats = compute_cid(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
/// assert_eq!(stats.factors, 10);
/// assert_eq!(stats.cid, 1.0);
/// ```
pub fn compute_cid(text: &[u8]) -> Result<CompressionStats> {
    CidAnalyzer::default().stats(text)
}

/// Full result of one analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub stats: CompressionStats,
    pub factorization: Factorization,
}

/// Runs the CID pipeline with fixed options.
///
/// Holds no state between calls, so one analyzer can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CidAnalyzer {
    options: FactorizeOptions,
}

impl CidAnalyzer {
    pub fn new(options: FactorizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FactorizeOptions {
        self.options
    }

    /// Analyses `text`, building its suffix array in process.
    pub fn analyze(&self, text: &[u8]) -> Result<Analysis> {
        if text.is_empty() {
            return Err(Error::empty_sequence());
        }
        let sa = SuffixArray::build(text)?;
        self.analyze_with(text, &sa)
    }

    /// Analyses `text` using an already validated suffix array.
    pub fn analyze_with(&self, text: &[u8], sa: &SuffixArray) -> Result<Analysis> {
        if text.is_empty() {
            return Err(Error::empty_sequence());
        }
        let factorization = match self.options.strategy {
            Strategy::Reference => factorize_reference(text, sa, self.options.overlap)?,
            Strategy::Accelerated => {
                let lcp = LcpArray::build(text, sa)?;
                factorize_accelerated(text, sa, &lcp, self.options.overlap)?
            }
        };
        let stats = CompressionStats::from_counts(factorization.count(), text.len())?;
        debug!(
            len = stats.length,
            factors = stats.factors,
            cid = stats.cid,
            regime = ?stats.regime,
            "cid computed"
        );
        Ok(Analysis {
            stats,
            factorization,
        })
    }

    /// Analyses `text`, keeping only the statistics.
    pub fn stats(&self, text: &[u8]) -> Result<CompressionStats> {
        self.analyze(text).map(|a| a.stats)
    }
}
