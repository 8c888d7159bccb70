//! Seeded permutations of instances.
//!
//! Cross validation splits instances in contiguous folds. To get random folds we permute instances beforehand,
//! and the same permutation must be applied to rows and columns of every kernel matrix and to the labels.
//! Everything here is a pure function of the seed, nothing is shuffled in place.

use ndarray::{Array2, Axis};

use rand::seq::SliceRandom;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{KernelError, Result};


/// position i of the permuted data holds the instance get_index(i) of the original data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    pub fn identity(size: usize) -> Self {
        Permutation {
            perm: (0..size).collect(),
        }
    }

    /// a random permutation, the same for a given (size, seed)
    pub fn from_seed(size: usize, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut perm: Vec<usize> = (0..size).collect();
        perm.shuffle(&mut rng);
        log::trace!("Permutation::from_seed size {} seed {}", size, seed);
        Permutation { perm }
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// original index of the instance at position i
    pub fn get_index(&self, i: usize) -> usize {
        self.perm[i]
    }

    pub fn get_indices(&self) -> &[usize] {
        &self.perm
    }

    /// the permutation restoring original order
    pub fn inverse(&self) -> Permutation {
        let mut inv = vec![0usize; self.perm.len()];
        for (i, p) in self.perm.iter().enumerate() {
            inv[*p] = i;
        }
        Permutation { perm: inv }
    }

    fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.perm.len() {
            return Err(KernelError::DimensionMismatch {
                what: what.to_string(),
                expected: self.perm.len(),
                got: len,
            });
        }
        Ok(())
    }

    pub fn apply_vec<T: Clone>(&self, data: &[T]) -> Result<Vec<T>> {
        self.check_len("permuted vector", data.len())?;
        Ok(self.perm.iter().map(|p| data[*p].clone()).collect())
    }

    /// permutes rows and columns
    pub fn apply_matrix(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_len("permuted matrix rows", matrix.nrows())?;
        self.check_len("permuted matrix columns", matrix.ncols())?;
        Ok(matrix.select(Axis(0), &self.perm).select(Axis(1), &self.perm))
    }
} // end of impl Permutation


/// permutes matrix and labels with the permutation given by seed.
/// Calling it twice with the same seed on the same data gives the same result.
pub fn permute<T: Clone>(matrix: &Array2<f64>, labels: &[T], seed: u64) -> Result<(Array2<f64>, Vec<T>)> {
    let permutation = Permutation::from_seed(labels.len(), seed);
    let permuted = permutation.apply_matrix(matrix)?;
    let permuted_labels = permutation.apply_vec(labels)?;
    Ok((permuted, permuted_labels))
} // end of permute


// end of mod tests
