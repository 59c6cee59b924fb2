//! Longest-common-prefix array construction (Kasai et al. 2001).
//!
//! Positions are visited in text order rather than suffix-array order. If the
//! suffix at `i` shares `h` symbols with its predecessor in the suffix array,
//! the suffix at `i + 1` shares at least `h - 1` with its own predecessor, so
//! the running bound `h` only ever drops by one per step and the whole
//! construction is O(n).

use crate::error::{try_alloc_u32, Error, Result};
use crate::suffix_array::SuffixArray;
use tracing::debug;

/// LCP array together with the rank array (inverse suffix array) it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcpArray {
    /// `lcp[r]` is the common prefix of the suffixes at ranks `r - 1` and `r`; `lcp[0] == 0`.
    lcp: Vec<u32>,
    /// `rank[sa[r]] == r`.
    rank: Vec<u32>,
}

impl LcpArray {
    /// Computes the LCP array of `text` from its suffix array.
    ///
    /// Fails with an invariant violation if `sa` is not a permutation of
    /// `0..text.len()`.
    pub fn build(text: &[u8], sa: &SuffixArray) -> Result<Self> {
        let n = text.len();
        let sa = sa.as_slice();
        if sa.len() != n {
            return Err(Error::invariant(format!(
                "suffix array has {} entries for a sequence of {} symbols",
                sa.len(),
                n
            )));
        }

        let rank = inverse(sa)?;
        let mut lcp = try_alloc_u32(n)?;

        let mut h = 0usize;
        for i in 0..n {
            let r = rank[i] as usize;
            if r == 0 {
                // No predecessor; the bound does not carry over.
                h = 0;
                continue;
            }
            let j = sa[r - 1] as usize;
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[r] = h as u32;
            h = h.saturating_sub(1);
        }

        debug!(len = n, "lcp array built");
        Ok(Self { lcp, rank })
    }

    /// Returns the LCP values indexed by rank.
    pub fn as_slice(&self) -> &[u32] {
        &self.lcp
    }

    /// Returns the rank array (inverse of the suffix array).
    pub fn ranks(&self) -> &[u32] {
        &self.rank
    }

    /// Returns the LCP value at the given rank.
    pub fn lcp_at(&self, rank: usize) -> Option<usize> {
        self.lcp.get(rank).map(|&h| h as usize)
    }

    /// Returns the rank of the suffix starting at `pos`.
    pub fn rank_of(&self, pos: usize) -> Option<usize> {
        self.rank.get(pos).map(|&r| r as usize)
    }

    pub fn len(&self) -> usize {
        self.lcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lcp.is_empty()
    }
}

/// Inverts `sa`, rejecting out-of-range and duplicate entries.
fn inverse(sa: &[u32]) -> Result<Vec<u32>> {
    let n = sa.len();
    let mut rank = try_alloc_u32(n)?;
    rank.fill(u32::MAX);
    for (r, &pos) in sa.iter().enumerate() {
        let slot = rank.get_mut(pos as usize).ok_or_else(|| {
            Error::invariant(format!(
                "suffix array entry {} at rank {} is out of range for length {}",
                pos, r, n
            ))
        })?;
        if *slot != u32::MAX {
            return Err(Error::invariant(format!(
                "position {} appears twice in the suffix array (ranks {} and {})",
                pos, *slot, r
            )));
        }
        *slot = r as u32;
    }
    Ok(rank)
}
