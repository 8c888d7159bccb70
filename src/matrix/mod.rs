//! Kernel matrix construction and utilities : normalization, combination, permutation, fold extraction.

/// Gram matrices from feature vectors.
pub mod kernelmatrix;

/// seeded permutations of instances.
pub mod permutation;

pub use kernelmatrix::*;
pub use permutation::{permute, Permutation};
