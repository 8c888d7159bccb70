//! Kernel (Gram) matrices from feature vectors, and the algebra we need on them.
//!
//! Matrices are dense `Array2<f64>`, (nb instances, nb instances).
//! Symmetry is exact : each entry (i,j) with j >= i is computed once and copied to (j,i).

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use sprs::{CsMatI, TriMatI};

use crate::error::{KernelError, Result};
use crate::feature::SparseVector;


/// entry (i,j) is the dot product of vectors\[i\] and vectors\[j\].
/// With parallel set, rows are dispatched on rayon threads, the result is the same as in serial mode.
pub fn compute_kernel_matrix(vectors: &[SparseVector], parallel: bool) -> Array2<f64> {
    let nb_inst = vectors.len();
    log::debug!("compute_kernel_matrix nb vectors : {}, parallel : {}", nb_inst, parallel);
    // upper part of row i, from diagonal
    let upper_row = |i: usize| -> Vec<f64> { (i..nb_inst).map(|j| vectors[i].dot(&vectors[j])).collect() };
    let upper: Vec<Vec<f64>> = if parallel {
        (0..nb_inst).into_par_iter().map(|i| upper_row(i)).collect()
    } else {
        (0..nb_inst).map(|i| upper_row(i)).collect()
    };
    //
    let mut kernel = Array2::<f64>::zeros((nb_inst, nb_inst));
    for (i, row) in upper.iter().enumerate() {
        for (k, value) in row.iter().enumerate() {
            kernel[[i, i + k]] = *value;
            kernel[[i + k, i]] = *value;
        }
    }
    kernel
} // end of compute_kernel_matrix


/// cosine normalization of each vector. Null vectors stay null.
/// returns the number of null vectors encountered.
pub fn normalize_vectors(vectors: &mut [SparseVector]) -> usize {
    let nb_null = vectors.iter_mut().map(|v| v.normalize()).filter(|ok| !ok).count();
    if nb_null > 0 {
        log::debug!("normalize_vectors nb null vectors : {}", nb_null);
    }
    nb_null
} // end of normalize_vectors


pub(crate) fn check_square(matrix: &Array2<f64>) -> Result<usize> {
    let (nb_row, nb_col) = matrix.dim();
    if nb_row != nb_col {
        return Err(KernelError::DimensionMismatch {
            what: "kernel matrix columns".to_string(),
            expected: nb_row,
            got: nb_col,
        });
    }
    Ok(nb_row)
}


/// In place cosine normalization : K\[i\]\[j\] / sqrt(K\[i\]\[i\] * K\[j\]\[j\]).
/// Rows and columns of a null diagonal term are set to 0.
pub fn normalize_matrix(kernel: &mut Array2<f64>) -> Result<()> {
    let dim = check_square(kernel)?;
    let diagonal = kernel.diag().to_owned();
    let nb_null = diagonal.iter().filter(|d| !(**d > 0.)).count();
    if nb_null > 0 {
        log::debug!("normalize_matrix nb null diagonal terms : {}", nb_null);
    }
    for i in 0..dim {
        for j in 0..dim {
            let d = diagonal[i] * diagonal[j];
            kernel[[i, j]] = if d > 0. { kernel[[i, j]] / d.sqrt() } else { 0. };
        }
    }
    Ok(())
} // end of normalize_matrix


/// element wise sum of kernels of the same dataset.
/// Inputs should be normalized by caller if they must contribute comparably.
pub fn combine(matrices: &[Array2<f64>]) -> Result<Array2<f64>> {
    let first = matrices.first().ok_or(KernelError::EmptyKernelSet)?;
    let dim = check_square(first)?;
    let mut sum = Array2::<f64>::zeros((dim, dim));
    for matrix in matrices {
        if check_square(matrix)? != dim {
            return Err(KernelError::DimensionMismatch {
                what: "combined kernel".to_string(),
                expected: dim,
                got: matrix.nrows(),
            });
        }
        sum += matrix;
    }
    Ok(sum)
} // end of combine


/// extract the block of rows and columns given (in the given order).
pub fn sub_matrix(matrix: &Array2<f64>, rows: &[usize], cols: &[usize]) -> Array2<f64> {
    matrix.select(Axis(0), rows).select(Axis(1), cols)
}


/// One row per vector. The number of columns is the largest declared dimension
/// (or max populated index + 1 if larger). This is the design matrix given to linear solvers.
pub fn feature_matrix(vectors: &[SparseVector]) -> CsMatI<f64, usize> {
    let nb_cols = vectors
        .iter()
        .map(|v| v.get_dimension().max(v.get_indices().last().map_or(0, |i| i + 1)))
        .max()
        .unwrap_or(0);
    let nnz = vectors.iter().map(|v| v.nnz()).sum::<usize>();
    let mut rows = Vec::<usize>::with_capacity(nnz);
    let mut cols = Vec::<usize>::with_capacity(nnz);
    let mut values = Vec::<f64>::with_capacity(nnz);
    for (i, v) in vectors.iter().enumerate() {
        for (j, value) in v.iter() {
            rows.push(i);
            cols.push(j);
            values.push(value);
        }
    }
    let trimat = TriMatI::<f64, usize>::from_triplets((vectors.len(), nb_cols), rows, cols, values);
    trimat.to_csr()
} // end of feature_matrix


/// rows of a design matrix, in the given order. The number of columns is kept so train and test blocks
/// extracted from the same matrix stay in the same feature space.
pub fn select_rows(matrix: &CsMatI<f64, usize>, rows: &[usize]) -> CsMatI<f64, usize> {
    let mut row_idx = Vec::<usize>::new();
    let mut col_idx = Vec::<usize>::new();
    let mut values = Vec::<f64>::new();
    for (i, r) in rows.iter().enumerate() {
        if let Some(row) = matrix.outer_view(*r) {
            for (j, value) in row.iter() {
                row_idx.push(i);
                col_idx.push(j);
                values.push(*value);
            }
        }
    }
    TriMatI::<f64, usize>::from_triplets((rows.len(), matrix.cols()), row_idx, col_idx, values).to_csr()
} // end of select_rows


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn some_vectors() -> Vec<SparseVector> {
        vec![
            vec![(0, 1.), (1, 2.)].into_iter().collect(),
            vec![(1, 1.), (2, 3.)].into_iter().collect(),
            SparseVector::new(),
            vec![(0, 2.), (2, 1.), (3, 1.)].into_iter().collect(),
        ]
    }

    #[test]
    fn gram_is_symmetric_serial_and_parallel() {
        log_init_test();
        let vectors = some_vectors();
        let k = compute_kernel_matrix(&vectors, false);
        let kp = compute_kernel_matrix(&vectors, true);
        assert_eq!(k, kp);
        assert_eq!(k.dim(), (4, 4));
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(k[[i, j]], k[[j, i]]);
            }
        }
        assert_eq!(k[[0, 0]], 5.);
        assert_eq!(k[[0, 1]], 2.);
        assert_eq!(k[[1, 3]], 3.);
        assert_eq!(k[[2, 2]], 0.);
    }

    #[test]
    fn normalized_diagonal() {
        log_init_test();
        let vectors = some_vectors();
        let mut k = compute_kernel_matrix(&vectors, false);
        normalize_matrix(&mut k).unwrap();
        for i in 0..4 {
            if i == 2 {
                assert_eq!(k[[i, i]], 0.);
                assert!(k.row(i).iter().all(|v| *v == 0.));
                assert!(k.column(i).iter().all(|v| *v == 0.));
            } else {
                assert!((k[[i, i]] - 1.).abs() < 1.0e-12);
            }
        }
        // same thing from normalized vectors
        let mut nvectors = some_vectors();
        assert_eq!(normalize_vectors(&mut nvectors), 1);
        let kn = compute_kernel_matrix(&nvectors, false);
        for i in 0..4 {
            for j in 0..4 {
                assert!((kn[[i, j]] - k[[i, j]]).abs() < 1.0e-12);
            }
        }
    }

    #[test]
    fn combine_checks_dimensions() {
        log_init_test();
        assert!(matches!(combine(&[]), Err(KernelError::EmptyKernelSet)));
        let a = Array2::<f64>::eye(3);
        let b = Array2::<f64>::ones((3, 3));
        let c = combine(&[a.clone(), b]).unwrap();
        assert_eq!(c[[0, 0]], 2.);
        assert_eq!(c[[0, 1]], 1.);
        let bad = Array2::<f64>::eye(2);
        assert!(matches!(combine(&[a.clone(), bad]), Err(KernelError::DimensionMismatch { .. })));
        let mut rect = Array2::<f64>::zeros((2, 3));
        assert!(normalize_matrix(&mut rect).is_err());
    }

    #[test]
    fn sub_matrix_and_feature_matrix() {
        log_init_test();
        let vectors = some_vectors();
        let k = compute_kernel_matrix(&vectors, false);
        let sub = sub_matrix(&k, &[3, 0], &[1]);
        assert_eq!(sub.dim(), (2, 1));
        assert_eq!(sub[[0, 0]], k[[3, 1]]);
        assert_eq!(sub[[1, 0]], k[[0, 1]]);
        //
        let csmat = feature_matrix(&vectors);
        assert_eq!(csmat.shape(), (4, 4));
        assert_eq!(csmat.nnz(), 7);
        assert_eq!(csmat.get(3, 3), Some(&1.));
        assert_eq!(csmat.get(2, 0), None);
        //
        let rows = select_rows(&csmat, &[3, 2, 0]);
        assert_eq!(rows.shape(), (3, 4));
        assert_eq!(rows.nnz(), 5);
        assert_eq!(rows.get(0, 3), Some(&1.));
        assert_eq!(rows.get(2, 1), Some(&2.));
        assert_eq!(rows.outer_view(1).map(|r| r.nnz()), Some(0));
    }
} // end of mod tests
