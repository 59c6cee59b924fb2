//! # cid-rs - LZ77 compression-based order metric
//!
//! Estimates how much structure a discretized symbol sequence carries by how
//! well it compresses under an LZ77 factorization. The sequence is typically a
//! Hilbert-curve scan of spatially binned particle positions: an ordered
//! (crystalline) configuration produces long repeated runs and a low CID,
//! while a disordered (gas-like) one is close to incompressible with a CID
//! near 1.
//!
//! The pipeline is:
//! 1. [`SuffixArray`]: SA-IS suffix array construction
//! 2. [`LcpArray`]: Kasai's linear-time LCP array
//! 3. [`Factorizer`]: longest-previous-match factorization, with a quadratic
//!    reference strategy and an LCP-bounded accelerated strategy
//! 4. [`CompressionStats`]: analytic compressed size `k·log2(k) + 2·k·log2(n/k)`
//!    and `cid = bits / 8n`
//!
//! ## Example
//!
//! ```
//! use cid_rs::compute_cid;
//!
//! let ordered = compute_cid(&b"AB".repeat(50)).unwrap();
//! assert!(ordered.cid < 0.2);
//!
//! let distinct: Vec<u8> = (0..10).collect();
//! assert_eq!(compute_cid(&distinct).unwrap().cid, 1.0);
//! ```
//!
//! ## Performance
//!
//! - Suffix and LCP arrays in O(n) time and 4 bytes per symbol each
//! - Accelerated factorization does no symbol comparisons; its work is
//!   sub-quadratic on repetitive input, against O(n²) for the reference.
//!   Periodic input stays near-linear, but the walk also steps over later
//!   positions sharing a long prefix, so runs following growing blocks cost
//!   closer to O(n^1.5)

mod baseline;
mod error;
mod estimate;
mod factor;
mod factorize;
mod lcp;
pub mod legacy;
mod pipeline;
mod suffix_array;

#[cfg(test)]
mod tests;

pub use baseline::{batch, batch_normalized, NormalizedCid, ShuffleBaseline};
pub use error::{ConstructionError, Error, Result};
pub use estimate::{compressed_bits, CompressionStats, Regime};
pub use factor::{Factor, Factorization};
pub use factorize::{
    factorize_accelerated, factorize_reference, FactorizeOptions, Factorizer, Overlap, Strategy,
};
pub use lcp::LcpArray;
pub use pipeline::{compute_cid, Analysis, CidAnalyzer};
pub use suffix_array::{SuffixArray, MAX_LEN};
