//! LZ77 factorization by longest previous match.
//!
//! At each position the longest match against text starting at an earlier
//! position is located; a match of length `l >= 1` becomes a copy factor and
//! advances the cursor by `l`, otherwise a literal is emitted.
//!
//! Two strategies find the same match lengths (and therefore the same number
//! of factors) at very different cost:
//!
//! - [`Strategy::Reference`] compares the current window against every earlier
//!   position listed in the suffix array. O(n) per factor, O(n²) symbol
//!   comparisons overall on repetitive input.
//! - [`Strategy::Accelerated`] starts at the current suffix's rank and walks
//!   outward in suffix-array order, carrying the running minimum of the LCP
//!   array as an upper bound on any further match. The walk in a direction
//!   ends as soon as that bound cannot beat the best match found, so no symbol
//!   is ever compared. The walk still counts later positions it passes over,
//!   so the work is sub-quadratic rather than O(n log n) on every input.
//!
//! # Example
//!
//! ```
//! use cid_rs::{FactorizeOptions, Factorizer};
//!
//! let fz = Factorizer::new(FactorizeOptions::default());
//! let f = fz.factorize(b"abababab").unwrap();
//! assert_eq!(f.reconstruct().unwrap(), b"abababab");
//! assert_eq!(f.count(), 4); // a, b, ab, abab
//! ```

use crate::error::{Error, Result};
use crate::factor::{Factor, Factorization};
use crate::lcp::LcpArray;
use crate::suffix_array::SuffixArray;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

/// How the longest previous match is searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Exhaustive scan of all earlier positions; the correctness oracle.
    Reference,
    /// LCP-bounded walk around the current rank.
    #[default]
    Accelerated,
}

/// Whether a copy may extend into the text it is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overlap {
    /// A copy at `i` from `offset` satisfies `offset + len <= i`.
    #[default]
    NonOverlapping,
    /// A copy only needs to start before `i` (classic self-referential LZ77).
    Allowed,
}

/// Options for [`Factorizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorizeOptions {
    pub strategy: Strategy,
    pub overlap: Overlap,
}

impl FactorizeOptions {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_overlap(mut self, overlap: Overlap) -> Self {
        self.overlap = overlap;
        self
    }
}

/// Runs LZ77 factorization with a selectable matching strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Factorizer {
    options: FactorizeOptions,
}

impl Factorizer {
    pub fn new(options: FactorizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FactorizeOptions {
        self.options
    }

    /// Builds the suffix array (and LCP array when needed) and factorizes `text`.
    pub fn factorize(&self, text: &[u8]) -> Result<Factorization> {
        let sa = SuffixArray::build(text)?;
        match self.options.strategy {
            Strategy::Reference => factorize_reference(text, &sa, self.options.overlap),
            Strategy::Accelerated => {
                let lcp = LcpArray::build(text, &sa)?;
                factorize_accelerated(text, &sa, &lcp, self.options.overlap)
            }
        }
    }
}

/// Bookkeeping shared by both strategies.
struct Emitter<'a> {
    text: &'a [u8],
    factors: Vec<Factor>,
    comparisons: u64,
}

impl<'a> Emitter<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            factors: Vec::new(),
            comparisons: 0,
        }
    }

    /// Records the match found at `i` and returns the next position.
    fn emit(&mut self, i: usize, best_len: usize, best_pos: usize) -> usize {
        if best_len == 0 {
            trace!(pos = i, "literal");
            self.factors.push(Factor::Literal(self.text[i]));
            i + 1
        } else {
            trace!(pos = i, offset = best_pos, len = best_len, "copy");
            self.factors.push(Factor::Copy {
                offset: best_pos,
                len: best_len,
            });
            i + best_len
        }
    }

    fn finish(self, strategy: Strategy, started: Instant) -> Factorization {
        debug!(
            ?strategy,
            len = self.text.len(),
            factors = self.factors.len(),
            comparisons = self.comparisons,
            elapsed_us = started.elapsed().as_micros() as u64,
            "factorization done"
        );
        Factorization::new(self.factors, self.comparisons)
    }
}

fn check_lengths(text: &[u8], sa: &SuffixArray) -> Result<()> {
    if text.is_empty() {
        return Err(Error::empty_sequence());
    }
    if sa.len() != text.len() {
        return Err(Error::invariant(format!(
            "suffix array has {} entries for a sequence of {} symbols",
            sa.len(),
            text.len()
        )));
    }
    Ok(())
}

/// Quadratic factorization: every earlier position is compared symbol by symbol.
pub fn factorize_reference(
    text: &[u8],
    sa: &SuffixArray,
    overlap: Overlap,
) -> Result<Factorization> {
    check_lengths(text, sa)?;
    let started = Instant::now();
    let n = text.len();
    let mut out = Emitter::new(text);

    let mut i = 0;
    while i < n {
        let mut best_len = 0;
        let mut best_pos = 0;

        for &p in sa.as_slice() {
            let p = p as usize;
            out.comparisons += 1;
            if p >= i {
                continue;
            }
            // Source symbols must lie in the decoded prefix when overlap is off.
            let bound = match overlap {
                Overlap::NonOverlapping => (i - p).min(n - i),
                Overlap::Allowed => n - i,
            };
            let mut len = 0;
            while len < bound && text[p + len] == text[i + len] {
                len += 1;
            }
            out.comparisons += len as u64;
            if len > best_len {
                best_len = len;
                best_pos = p;
            }
        }

        i = out.emit(i, best_len, best_pos);
    }

    Ok(out.finish(Strategy::Reference, started))
}

/// LCP-bounded factorization.
///
/// From `rank[i]` the walk moves toward smaller ranks, then toward larger
/// ranks. `m` is the minimum LCP seen so far in that direction, which is the
/// exact common prefix between the current suffix and the one just reached,
/// and an upper bound for every suffix further out.
pub fn factorize_accelerated(
    text: &[u8],
    sa: &SuffixArray,
    lcp: &LcpArray,
    overlap: Overlap,
) -> Result<Factorization> {
    check_lengths(text, sa)?;
    if lcp.len() != text.len() {
        return Err(Error::invariant(format!(
            "lcp array has {} entries for a sequence of {} symbols",
            lcp.len(),
            text.len()
        )));
    }
    let started = Instant::now();
    let n = text.len();
    let sa = sa.as_slice();
    let heights = lcp.as_slice();
    let ranks = lcp.ranks();
    let mut out = Emitter::new(text);

    let candidate = |m: usize, p: usize, i: usize| match overlap {
        Overlap::NonOverlapping => m.min(i - p),
        Overlap::Allowed => m,
    };

    let mut i = 0;
    while i < n {
        let mut best_len = 0;
        let mut best_pos = 0;

        if i > 0 {
            let r = ranks[i] as usize;

            let mut m = n - i;
            let mut k = r;
            while k > 0 {
                m = m.min(heights[k] as usize);
                if m <= best_len {
                    break;
                }
                k -= 1;
                out.comparisons += 1;
                let p = sa[k] as usize;
                if p < i {
                    let len = candidate(m, p, i);
                    if len > best_len {
                        best_len = len;
                        best_pos = p;
                    }
                }
            }

            let mut m = n - i;
            let mut k = r;
            while k + 1 < n {
                m = m.min(heights[k + 1] as usize);
                if m <= best_len {
                    break;
                }
                k += 1;
                out.comparisons += 1;
                let p = sa[k] as usize;
                if p < i {
                    let len = candidate(m, p, i);
                    if len > best_len {
                        best_len = len;
                        best_pos = p;
                    }
                }
            }
        }

        i = out.emit(i, best_len, best_pos);
    }

    Ok(out.finish(Strategy::Accelerated, started))
}
