//! Sparse feature vectors.
//!
//! A vector maps a feature index to a weight. Indices are only meaningful inside the batch
//! of vectors produced by one extraction, as they are ids of the label dictionary of that extraction.
//!
//! The vector also carries its last index (the dimension minus one). It is set once, when the dictionary
//! of the batch is complete, so that all vectors of a batch share the same dimension.
//! Dot products and norms only visit populated entries and so do not depend on it.

use indexmap::IndexMap;

use crate::error::{KernelError, Result};

/// Iteration follows first insertion order, which depends on the traversal of the graph, not on hashing.
/// So sums over entries are reproducible from one run to the other.
#[derive(Clone, Debug, Default)]
pub struct SparseVector {
    values: IndexMap<usize, f64, ahash::RandomState>,
    last_index: Option<usize>,
} // end of struct SparseVector


impl SparseVector {
    pub fn new() -> Self {
        SparseVector::default()
    }

    /// returns 0. for an unset index
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(&index).copied().unwrap_or(0.)
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.values.insert(index, value);
    }

    /// add value to entry index
    pub fn increment(&mut self, index: usize, value: f64) {
        *self.values.entry(index).or_insert(0.) += value;
    }

    /// declares the last index of the batch this vector belongs to.
    /// It can be set only once (setting the same value again is accepted) and must not be below a populated index.
    pub fn set_last_index(&mut self, last_index: usize) -> Result<()> {
        if let Some(previous) = self.last_index {
            if previous != last_index {
                return Err(KernelError::DimensionMismatch {
                    what: "last index already set".to_string(),
                    expected: previous,
                    got: last_index,
                });
            }
        }
        if let Some(max_index) = self.values.keys().max() {
            if *max_index > last_index {
                log::error!("set_last_index {} below max populated index {}", last_index, max_index);
                return Err(KernelError::InvalidParameter(format!(
                    "last index {} below populated index {}",
                    last_index, max_index
                )));
            }
        }
        self.last_index = Some(last_index);
        Ok(())
    } // end of set_last_index

    pub fn get_last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// declared dimension, 0 if no last index was set
    pub fn get_dimension(&self) -> usize {
        self.last_index.map_or(0, |l| l + 1)
    }

    /// number of populated entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// iterates on (index, value) of populated entries
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(i, v)| (*i, *v))
    }

    /// populated indices in increasing order
    pub fn get_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.values.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// dot product on the union of populated indices. Dimensions of the 2 vectors can differ.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.values.len() <= other.values.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .values
            .iter()
            .map(|(i, v)| match large.values.get(i) {
                Some(w) => v * w,
                None => 0.,
            })
            .sum()
    } // end of dot

    /// euclidean norm
    pub fn norm(&self) -> f64 {
        self.values.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn scale(&mut self, factor: f64) {
        self.values.values_mut().for_each(|v| *v *= factor);
    }

    /// divides by euclidean norm. A null vector is left as is and false is returned.
    pub fn normalize(&mut self) -> bool {
        let norm = self.norm();
        if norm > 0. {
            self.scale(1. / norm);
            true
        } else {
            log::trace!("SparseVector::normalize null norm, vector left unchanged");
            false
        }
    } // end of normalize
} // end of impl SparseVector


impl FromIterator<(usize, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut v = SparseVector::new();
        for (i, value) in iter {
            v.set(i, value);
        }
        v
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn get_unset_is_zero() {
        log_init_test();
        let mut v = SparseVector::new();
        assert_eq!(v.get(12), 0.);
        v.increment(3, 1.);
        v.increment(3, 1.);
        assert_eq!(v.get(3), 2.);
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get_dimension(), 0);
        v.set_last_index(7).unwrap();
        assert_eq!(v.get_dimension(), 8);
    }

    #[test]
    fn last_index_is_set_once() {
        log_init_test();
        let mut v: SparseVector = vec![(2, 1.), (6, 1.)].into_iter().collect();
        assert!(matches!(v.set_last_index(5), Err(KernelError::InvalidParameter(_))));
        assert_eq!(v.get_last_index(), None);
        v.set_last_index(9).unwrap();
        v.set_last_index(9).unwrap();
        assert!(matches!(
            v.set_last_index(12),
            Err(KernelError::DimensionMismatch { expected: 9, got: 12, .. })
        ));
        assert_eq!(v.get_dimension(), 10);
    }

    #[test]
    fn dot_with_different_dimensions() {
        log_init_test();
        let mut v1: SparseVector = vec![(0, 1.), (2, 3.), (5, 2.)].into_iter().collect();
        let mut v2: SparseVector = vec![(2, 2.), (9, 4.)].into_iter().collect();
        v1.set_last_index(5).unwrap();
        v2.set_last_index(9).unwrap();
        assert_eq!(v1.dot(&v2), 6.);
        assert_eq!(v2.dot(&v1), 6.);
        assert_eq!(v1.dot(&v1), 14.);
    }

    #[test]
    fn normalize_null_vector_stays_null() {
        log_init_test();
        let mut v = SparseVector::new();
        assert!(!v.normalize());
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.);
        //
        let mut w: SparseVector = vec![(1, 3.), (4, 4.)].into_iter().collect();
        assert!(w.normalize());
        assert!((w.norm() - 1.).abs() < 1.0e-12);
        assert!((w.get(1) - 0.6).abs() < 1.0e-12);
    }
} // end of mod tests
