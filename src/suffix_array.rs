//! Suffix array construction.
//!
//! Builds the suffix array of a byte sequence with SA-IS (induced sorting,
//! Nong, Zhang & Chan 2009) in O(n) time. A virtual sentinel strictly smaller
//! than every byte terminates the text, so a suffix that is a prefix of a
//! longer one always sorts first.
//!
//! # Example
//!
//! ```
//! use cid_rs::SuffixArray;
//!
//! let sa = SuffixArray::build(b"banana").unwrap();
//! assert_eq!(sa.as_slice(), &[5, 3, 1, 0, 4, 2]);
//! ```

use crate::error::{try_alloc_u32, ConstructionError, Error, Result};
use tracing::debug;

/// Longest sequence the 32-bit index arrays can hold.
///
/// Position `MAX_LEN` is taken by the sentinel and `u32::MAX` marks empty slots.
pub const MAX_LEN: usize = u32::MAX as usize - 1;

const EMPTY: u32 = u32::MAX;

/// Bytes are shifted up by one so that 0 is free for the sentinel.
const BYTE_ALPHABET: usize = 257;

/// A suffix array: `sa[i]` is the start of the i-th smallest suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    sa: Vec<u32>,
}

impl SuffixArray {
    /// Builds the suffix array of `text`.
    ///
    /// Fails with [`Error::InvalidInput`] on an empty sequence and with a
    /// [`ConstructionError`] when the text is too long or memory runs out.
    pub fn build(text: &[u8]) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::empty_sequence());
        }
        let n = text.len();
        if n > MAX_LEN {
            return Err(ConstructionError::TooLong {
                len: n,
                max: MAX_LEN,
            }
            .into());
        }

        let mut shifted = try_alloc_u32(n + 1)?;
        for (slot, &b) in shifted.iter_mut().zip(text) {
            *slot = u32::from(b) + 1;
        }
        // shifted[n] stays 0: the sentinel.

        let mut sa = try_alloc_u32(n + 1)?;
        sais(&shifted, BYTE_ALPHABET, &mut sa)?;
        debug_assert_eq!(sa[0] as usize, n, "sentinel must sort first");
        sa.remove(0);

        debug!(len = n, "suffix array built");
        Ok(Self { sa })
    }

    /// Wraps an externally produced array after checking it is a permutation
    /// of `0..text.len()` and that it equals the suffix array of `text`.
    ///
    /// The suffix array of a text is unique, so comparing with an in-process
    /// construction is an exact O(n) validity check.
    pub fn from_raw(text: &[u8], raw: Vec<u32>) -> Result<Self> {
        if raw.len() != text.len() {
            return Err(Error::invariant(format!(
                "suffix array has {} entries for a sequence of {} symbols",
                raw.len(),
                text.len()
            )));
        }
        let expected = Self::build(text)?;
        if let Some(rank) = raw.iter().zip(&expected.sa).position(|(a, b)| a != b) {
            return Err(Error::invariant(format!(
                "suffix array entry {} is {}, expected {}",
                rank, raw[rank], expected.sa[rank]
            )));
        }
        Ok(expected)
    }

    /// Returns the suffix array as a slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.sa
    }

    /// Returns the number of suffixes.
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// Always false for a successfully built array.
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// Returns the text position at the given rank.
    pub fn suffix_at_rank(&self, rank: usize) -> Option<usize> {
        self.sa.get(rank).map(|&p| p as usize)
    }

    /// Consumes the array, returning the raw positions.
    pub fn into_vec(self) -> Vec<u32> {
        self.sa
    }
}

/// Classifies each position as S-type (`true`) or L-type (`false`).
///
/// The last position holds the sentinel and is S-type.
fn classify(text: &[u32]) -> Vec<bool> {
    let n = text.len();
    let mut is_s = vec![false; n];
    is_s[n - 1] = true;
    for i in (0..n - 1).rev() {
        is_s[i] = text[i] < text[i + 1] || (text[i] == text[i + 1] && is_s[i + 1]);
    }
    is_s
}

#[inline]
fn is_lms(is_s: &[bool], i: usize) -> bool {
    i > 0 && is_s[i] && !is_s[i - 1]
}

fn bucket_sizes(text: &[u32], alphabet: usize) -> Vec<u32> {
    let mut sizes = vec![0u32; alphabet];
    for &c in text {
        sizes[c as usize] += 1;
    }
    sizes
}

fn bucket_heads(sizes: &[u32]) -> Vec<u32> {
    let mut sum = 0;
    sizes
        .iter()
        .map(|&s| {
            let head = sum;
            sum += s;
            head
        })
        .collect()
}

fn bucket_tails(sizes: &[u32]) -> Vec<u32> {
    let mut sum = 0;
    sizes
        .iter()
        .map(|&s| {
            sum += s;
            sum
        })
        .collect()
}

/// Seeds `lms` at the tails of their buckets (keeping their relative order),
/// then induces the L-type and S-type suffixes.
fn induce(sa: &mut [u32], text: &[u32], is_s: &[bool], sizes: &[u32], lms: &[u32]) {
    sa.fill(EMPTY);

    let mut tails = bucket_tails(sizes);
    for &pos in lms.iter().rev() {
        let c = text[pos as usize] as usize;
        tails[c] -= 1;
        sa[tails[c] as usize] = pos;
    }

    let mut heads = bucket_heads(sizes);
    for i in 0..sa.len() {
        let p = sa[i];
        if p == EMPTY || p == 0 {
            continue;
        }
        let j = (p - 1) as usize;
        if !is_s[j] {
            let c = text[j] as usize;
            sa[heads[c] as usize] = j as u32;
            heads[c] += 1;
        }
    }

    let mut tails = bucket_tails(sizes);
    for i in (0..sa.len()).rev() {
        let p = sa[i];
        if p == EMPTY || p == 0 {
            continue;
        }
        let j = (p - 1) as usize;
        if is_s[j] {
            let c = text[j] as usize;
            tails[c] -= 1;
            sa[tails[c] as usize] = j as u32;
        }
    }
}

/// Compares the LMS substrings starting at `a` and `b`.
///
/// The sentinel is unique, so a mismatch is always found before either
/// substring runs off the end of the text.
fn lms_substrings_equal(text: &[u32], is_s: &[bool], a: usize, b: usize) -> bool {
    let last = text.len() - 1;
    if a == last || b == last {
        return a == b;
    }
    let mut d = 0;
    loop {
        if text[a + d] != text[b + d] || is_s[a + d] != is_s[b + d] {
            return false;
        }
        if d > 0 {
            let end_a = is_lms(is_s, a + d);
            let end_b = is_lms(is_s, b + d);
            if end_a || end_b {
                return end_a && end_b;
            }
        }
        d += 1;
    }
}

/// SA-IS over an integer alphabet `0..alphabet`.
///
/// `text` must end with a unique smallest symbol; `sa` must have the same length.
fn sais(text: &[u32], alphabet: usize, sa: &mut [u32]) -> Result<()> {
    let n = text.len();
    debug_assert_eq!(sa.len(), n);
    match n {
        0 => return Ok(()),
        1 => {
            sa[0] = 0;
            return Ok(());
        }
        _ => {}
    }

    let is_s = classify(text);
    let sizes = bucket_sizes(text, alphabet);
    let lms: Vec<u32> = (0..n)
        .filter(|&i| is_lms(&is_s, i))
        .map(|i| i as u32)
        .collect();

    // Sort the LMS substrings.
    induce(sa, text, &is_s, &sizes, &lms);

    // Name them in sorted order; equal substrings share a name.
    let mut names = try_alloc_u32(n)?;
    names.fill(EMPTY);
    let mut name = 0u32;
    let mut prev: Option<usize> = None;
    for &p in sa.iter() {
        if p == EMPTY {
            continue;
        }
        let p = p as usize;
        if !is_lms(&is_s, p) {
            continue;
        }
        if let Some(q) = prev {
            if !lms_substrings_equal(text, &is_s, q, p) {
                name += 1;
            }
        }
        names[p] = name;
        prev = Some(p);
    }
    let distinct = name as usize + 1;

    let reduced: Vec<u32> = lms.iter().map(|&p| names[p as usize]).collect();
    drop(names);

    let mut order = try_alloc_u32(lms.len())?;
    if distinct < lms.len() {
        sais(&reduced, distinct, &mut order)?;
    } else {
        for (i, &r) in reduced.iter().enumerate() {
            order[r as usize] = i as u32;
        }
    }

    let sorted_lms: Vec<u32> = order.iter().map(|&i| lms[i as usize]).collect();
    induce(sa, text, &is_s, &sizes, &sorted_lms);
    Ok(())
}
