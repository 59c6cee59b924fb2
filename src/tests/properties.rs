use crate::factor::Factor;
use crate::estimate::{compressed_bits, CompressionStats};
use crate::factorize::{
    factorize_accelerated, factorize_reference, FactorizeOptions, Factorizer, Overlap,
    Strategy as Search,
};
use crate::lcp::LcpArray;
use crate::pipeline::CidAnalyzer;
use crate::suffix_array::SuffixArray;
use proptest::prelude::*;

/// Small alphabets produce long repeats, which is where the strategies differ.
fn sequence() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(0u8..2, 1..200),
        prop::collection::vec(0u8..4, 1..200),
        prop::collection::vec(any::<u8>(), 1..200),
    ]
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

proptest! {
    /// Property 1: the suffix array is a permutation of 0..n.
    #[test]
    fn prop_sa_permutation(input in sequence()) {
        let sa = SuffixArray::build(&input).unwrap();
        let mut seen = vec![false; input.len()];
        for &p in sa.as_slice() {
            prop_assert!(!seen[p as usize], "position {} listed twice", p);
            seen[p as usize] = true;
        }
        prop_assert!(seen.iter().all(|&s| s));
    }

    /// Property 2: adjacent suffixes are in lexicographic order.
    #[test]
    fn prop_sa_ordering(input in sequence()) {
        let sa = SuffixArray::build(&input).unwrap();
        for w in sa.as_slice().windows(2) {
            prop_assert!(input[w[0] as usize..] < input[w[1] as usize..]);
        }
    }

    /// Property 3: every LCP entry matches a direct comparison.
    #[test]
    fn prop_lcp_correct(input in sequence()) {
        let sa = SuffixArray::build(&input).unwrap();
        let lcp = LcpArray::build(&input, &sa).unwrap();
        let sa = sa.as_slice();
        prop_assert_eq!(lcp.as_slice()[0], 0);
        for r in 1..sa.len() {
            let expected = common_prefix(&input[sa[r - 1] as usize..], &input[sa[r] as usize..]);
            prop_assert_eq!(lcp.as_slice()[r] as usize, expected);
        }
        for (r, &p) in sa.iter().enumerate() {
            prop_assert_eq!(lcp.ranks()[p as usize] as usize, r);
        }
    }

    /// Property 4: replaying the factors reproduces the input, for every
    /// strategy and overlap policy.
    #[test]
    fn prop_reconstruction(input in sequence()) {
        for strategy in [Search::Reference, Search::Accelerated] {
            for overlap in [Overlap::NonOverlapping, Overlap::Allowed] {
                let opts = FactorizeOptions { strategy, overlap };
                let f = Factorizer::new(opts).factorize(&input).unwrap();
                prop_assert_eq!(f.reconstruct().unwrap(), input.clone());
                if overlap == Overlap::NonOverlapping {
                    prop_assert!(f.is_non_overlapping());
                }
            }
        }
    }

    /// Property 5: factor lengths sum to n.
    #[test]
    fn prop_partition(input in sequence()) {
        let f = Factorizer::default().factorize(&input).unwrap();
        prop_assert_eq!(f.covered_len(), input.len());
        prop_assert!(f.factors().iter().all(|factor| !factor.is_empty()));
    }

    /// Property 6: both strategies find the same match lengths, and the
    /// accelerated walk never does more work than the exhaustive scan.
    #[test]
    fn prop_strategies_agree(input in sequence()) {
        let sa = SuffixArray::build(&input).unwrap();
        let lcp = LcpArray::build(&input, &sa).unwrap();
        for overlap in [Overlap::NonOverlapping, Overlap::Allowed] {
            let r = factorize_reference(&input, &sa, overlap).unwrap();
            let a = factorize_accelerated(&input, &sa, &lcp, overlap).unwrap();
            let rl: Vec<usize> = r.factors().iter().map(Factor::len).collect();
            let al: Vec<usize> = a.factors().iter().map(Factor::len).collect();
            prop_assert_eq!(rl, al);
            prop_assert!(a.comparisons() <= r.comparisons());
        }
    }

    /// Property 7: allowing overlap never needs more factors.
    #[test]
    fn prop_overlap_not_worse(input in sequence()) {
        let strict = Factorizer::default().factorize(&input).unwrap();
        let loose = Factorizer::new(FactorizeOptions::default().with_overlap(Overlap::Allowed))
            .factorize(&input)
            .unwrap();
        prop_assert!(loose.count() <= strict.count());
    }

    /// Property 8: the estimate depends only on (k, n) and stays finite and positive.
    #[test]
    fn prop_estimate_pure(k in 0usize..10_000, n in 1usize..10_000) {
        let a = CompressionStats::from_counts(k, n).unwrap();
        let b = CompressionStats::from_counts(k, n).unwrap();
        prop_assert_eq!(a, b);
        prop_assert!(a.compressed_bits.is_finite());
        prop_assert!(a.compressed_bits > 0.0);
        prop_assert_eq!(a.is_incompressible(), !(k > 0 && k < n));
        prop_assert_eq!(compressed_bits(k, n).0, a.compressed_bits);
    }

    /// Property 9: statistics agree between strategies.
    #[test]
    fn prop_stats_agree(input in sequence()) {
        let r = CidAnalyzer::new(FactorizeOptions::default().with_strategy(Search::Reference))
            .stats(&input)
            .unwrap();
        let a = CidAnalyzer::default().stats(&input).unwrap();
        prop_assert_eq!(r, a);
    }
}

/// Bolero fuzz test: no panics and exact reconstruction on arbitrary input
#[cfg(test)]
#[test]
fn fuzz_no_panic() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        let analyzer = CidAnalyzer::default();
        match analyzer.analyze(input) {
            Ok(analysis) => {
                assert_eq!(analysis.stats.length, input.len());
                assert_eq!(analysis.factorization.reconstruct().unwrap(), *input);
                assert!(analysis.stats.cid > 0.0);
            }
            Err(_) => assert!(input.is_empty()),
        }
    });
}

/// Bolero fuzz test: accelerated and reference produce the same factor count
#[cfg(test)]
#[test]
fn fuzz_strategy_equivalence() {
    bolero::check!()
        .with_type::<Vec<u8>>()
        .for_each(|input| {
            if input.is_empty() || input.len() > 512 {
                return;
            }
            let sa = SuffixArray::build(input).unwrap();
            let lcp = LcpArray::build(input, &sa).unwrap();
            let r = factorize_reference(input, &sa, Overlap::NonOverlapping).unwrap();
            let a = factorize_accelerated(input, &sa, &lcp, Overlap::NonOverlapping).unwrap();
            assert_eq!(r.count(), a.count());
        });
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::compute_cid;

    #[test]
    fn test_crystal_vs_gas() {
        // Periodic "lattice" vs. a scrambled sequence over the same symbols.
        let crystal: Vec<u8> = (0..512u32).map(|i| (i % 8) as u8).collect();
        let mut seed = 12345u64;
        let gas: Vec<u8> = (0..512)
            .map(|_| {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((seed >> 33) % 8) as u8
            })
            .collect();
        let c = compute_cid(&crystal).unwrap();
        let g = compute_cid(&gas).unwrap();
        assert!(c.cid < 0.1);
        assert!(g.cid > c.cid * 3.0);
    }

    #[test]
    fn test_empty_input_yields_no_stats() {
        for strategy in [Search::Reference, Search::Accelerated] {
            let analyzer = CidAnalyzer::new(FactorizeOptions::default().with_strategy(strategy));
            assert!(matches!(analyzer.analyze(&[]), Err(Error::InvalidInput { .. })));
        }
    }
}
