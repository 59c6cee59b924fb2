//! LZ77 factors and the factorization they form.

use serde::{Deserialize, Serialize};

/// One LZ77 unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Factor {
    /// A symbol with no earlier occurrence to copy from.
    Literal(u8),

    /// `len` symbols copied from the already-decoded prefix starting at `offset`.
    Copy { offset: usize, len: usize },
}

impl Factor {
    /// Number of symbols this factor covers (1 for a literal).
    pub fn len(&self) -> usize {
        match *self {
            Factor::Literal(_) => 1,
            Factor::Copy { len, .. } => len,
        }
    }

    /// Factors always cover at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Factor::Literal(_))
    }
}

/// The result of factorizing one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factorization {
    factors: Vec<Factor>,
    /// Suffix-array entries examined plus symbol comparisons made while matching.
    comparisons: u64,
}

impl Factorization {
    pub(crate) fn new(factors: Vec<Factor>, comparisons: u64) -> Self {
        Self {
            factors,
            comparisons,
        }
    }

    /// Returns the factors in sequence order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Returns the number of factors.
    pub fn count(&self) -> usize {
        self.factors.len()
    }

    /// Returns the work done by the matching loop.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Number of literal factors.
    pub fn literals(&self) -> usize {
        self.factors.iter().filter(|f| f.is_literal()).count()
    }

    /// Sum of factor lengths; equals the sequence length for a valid factorization.
    pub fn covered_len(&self) -> usize {
        self.factors.iter().map(Factor::len).sum()
    }

    /// Replays the factors, returning the decoded sequence.
    ///
    /// Returns `None` if a copy reaches beyond the decoded prefix. Copies are
    /// replayed symbol by symbol, so self-overlapping copies decode correctly.
    pub fn reconstruct(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(self.covered_len());
        for factor in &self.factors {
            match *factor {
                Factor::Literal(b) => out.push(b),
                Factor::Copy { offset, len } => {
                    if len == 0 || offset >= out.len() {
                        return None;
                    }
                    for k in 0..len {
                        let b = out[offset + k];
                        out.push(b);
                    }
                }
            }
        }
        Some(out)
    }

    /// True if no copy reads symbols at or beyond its own start.
    pub fn is_non_overlapping(&self) -> bool {
        let mut pos = 0;
        for factor in &self.factors {
            if let Factor::Copy { offset, len } = *factor {
                if offset + len > pos {
                    return false;
                }
            }
            pos += factor.len();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_len() {
        assert_eq!(Factor::Literal(b'a').len(), 1);
        assert_eq!(Factor::Copy { offset: 0, len: 4 }.len(), 4);
        assert!(Factor::Literal(0).is_literal());
        assert!(!Factor::Copy { offset: 0, len: 1 }.is_empty());
    }

    #[test]
    fn test_reconstruct() {
        let f = Factorization::new(
            vec![
                Factor::Literal(b'a'),
                Factor::Literal(b'b'),
                Factor::Copy { offset: 0, len: 2 },
                Factor::Copy { offset: 0, len: 3 },
            ],
            0,
        );
        assert_eq!(f.reconstruct().unwrap(), b"abababa");
        assert_eq!(f.covered_len(), 7);
        assert_eq!(f.literals(), 2);
        assert!(f.is_non_overlapping());
    }

    #[test]
    fn test_reconstruct_overlapping() {
        let f = Factorization::new(
            vec![Factor::Literal(b'x'), Factor::Copy { offset: 0, len: 5 }],
            0,
        );
        assert_eq!(f.reconstruct().unwrap(), b"xxxxxx");
        assert!(!f.is_non_overlapping());
    }

    #[test]
    fn test_reconstruct_rejects_forward_reference() {
        let f = Factorization::new(
            vec![Factor::Literal(b'x'), Factor::Copy { offset: 1, len: 1 }],
            0,
        );
        assert_eq!(f.reconstruct(), None);
    }
}
