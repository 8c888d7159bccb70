//! Cross validation selecting, in each fold, the best of several precomputed kernels.
//!
//! Instances are assumed already permuted (see [Permutation](crate::matrix::Permutation)) so outer folds are
//! contiguous ranges of indices. In each outer fold every (kernel, C) candidate is scored by an inner cross validation
//! on the training part, scored with accuracy. The first best candidate, in kernel insertion order then C order,
//! is trained on the whole training part and predicts the test part.
//! When the training part has fewer instances than 2 inner folds need, the candidate is scored by resubstitution.

use std::ops::Range;

use indexmap::IndexMap;
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{KernelError, Result};
use crate::matrix::kernelmatrix::check_square;
use crate::matrix::sub_matrix;

use super::evaluation::{Accuracy, EvaluationFunction};
use super::params::SolverParams;
use super::solver::KernelSolver;


/// prediction for one instance, with the kernel that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: f64,
    /// key of the kernel in the matrices map
    pub used_kernel: String,
    /// outer fold the instance was tested in
    pub fold: usize,
}


/// nb_folds contiguous ranges covering 0..nb_inst, sizes differ at most by one
pub fn fold_ranges(nb_inst: usize, nb_folds: usize) -> Vec<Range<usize>> {
    (0..nb_folds)
        .map(|f| (f * nb_inst / nb_folds)..((f + 1) * nb_inst / nb_folds))
        .collect()
}


/// training part of a fold : indices of 0..nb_inst outside range
pub(crate) fn complement(range: &Range<usize>, nb_inst: usize) -> Vec<usize> {
    (0..range.start).chain(range.end..nb_inst).collect()
}


fn check_config(matrices: &IndexMap<String, Array2<f64>>, target: &[f64], params: &SolverParams) -> Result<()> {
    if matrices.is_empty() {
        return Err(KernelError::EmptyKernelSet);
    }
    let nb_inst = target.len();
    for (name, matrix) in matrices {
        let dim = check_square(matrix)?;
        if dim != nb_inst {
            return Err(KernelError::DimensionMismatch {
                what: format!("kernel {}", name),
                expected: nb_inst,
                got: dim,
            });
        }
    }
    check_folds(nb_inst, params)
} // end of check_config


/// at least 2 outer folds and no more than instances, at least one C, all C > 0
pub(crate) fn check_folds(nb_inst: usize, params: &SolverParams) -> Result<()> {
    if params.get_nb_folds() < 2 || params.get_nb_folds() > nb_inst {
        return Err(KernelError::InvalidFoldCount {
            folds: params.get_nb_folds(),
            instances: nb_inst,
        });
    }
    if params.get_cs().is_empty() {
        return Err(KernelError::InvalidParameter("no regularization constant".to_string()));
    }
    if let Some(c) = params.get_cs().iter().find(|c| !(**c > 0.)) {
        return Err(KernelError::InvalidParameter(format!("regularization constant must be > 0, got {}", c)));
    }
    Ok(())
} // end of check_folds


// score of (kernel, c) on instances train by inner cross validation
fn inner_score<S: KernelSolver>(
    kernel: &Array2<f64>,
    target: &[f64],
    train: &[usize],
    c: f64,
    params: &SolverParams,
    solver: &S,
) -> Result<f64> {
    let class_weights = params.get_class_weights();
    let train_target: Vec<f64> = train.iter().map(|i| target[*i]).collect();
    let nb_folds = params.get_inner_folds().min(train.len());
    if nb_folds < 2 {
        let k = sub_matrix(kernel, train, train);
        let predicted = solver.train_predict(&k, &train_target, &k, c, &class_weights)?;
        return Ok(Accuracy.compute_score(&train_target, &predicted));
    }
    let mut predicted = Vec::<f64>::with_capacity(train.len());
    for range in fold_ranges(train.len(), nb_folds) {
        let inner_train: Vec<usize> = complement(&range, train.len()).iter().map(|i| train[*i]).collect();
        let inner_test = &train[range];
        let inner_target: Vec<f64> = inner_train.iter().map(|i| target[*i]).collect();
        let train_kernel = sub_matrix(kernel, &inner_train, &inner_train);
        let test_kernel = sub_matrix(kernel, inner_test, &inner_train);
        predicted.append(&mut solver.train_predict(&train_kernel, &inner_target, &test_kernel, c, &class_weights)?);
    }
    Ok(Accuracy.compute_score(&train_target, &predicted))
} // end of inner_score


fn run_fold<S: KernelSolver>(
    fold: usize,
    range: &Range<usize>,
    matrices: &IndexMap<String, Array2<f64>>,
    target: &[f64],
    params: &SolverParams,
    solver: &S,
) -> Result<Vec<Prediction>> {
    let train = complement(range, target.len());
    let test: Vec<usize> = range.clone().collect();
    // (kernel name, kernel, c, score)
    let mut best: Option<(&str, &Array2<f64>, f64, f64)> = None;
    for (name, kernel) in matrices {
        for c in params.get_cs() {
            let score = inner_score(kernel, target, &train, *c, params, solver)?;
            log::trace!("fold {} kernel {} c {:.3e} score {:.3e}", fold, name, c, score);
            let improves = match best {
                None => true,
                Some((_, _, _, best_score)) => Accuracy.is_better(score, best_score),
            };
            if improves {
                best = Some((name.as_str(), kernel, *c, score));
            }
        }
    }
    let (name, kernel, c, score) = best.ok_or(KernelError::EmptyKernelSet)?;
    log::debug!("fold {} selected kernel {} c {:.3e} inner score {:.3e}", fold, name, c, score);
    //
    let train_target: Vec<f64> = train.iter().map(|i| target[*i]).collect();
    let train_kernel = sub_matrix(kernel, &train, &train);
    let test_kernel = sub_matrix(kernel, &test, &train);
    let predicted = solver.train_predict(&train_kernel, &train_target, &test_kernel, c, &params.get_class_weights())?;
    if predicted.len() != test.len() {
        return Err(KernelError::Solver(format!(
            "solver returned {} predictions for {} test instances",
            predicted.len(),
            test.len()
        )));
    }
    Ok(predicted
        .into_iter()
        .map(|label| Prediction {
            label,
            used_kernel: name.to_string(),
            fold,
        })
        .collect())
} // end of run_fold


/// K fold cross validation over several kernels of the same (permuted) instances.
/// Returns one prediction per instance, in instance order.
///
/// Fails before any solver call on an empty kernel set, matrices not of size target.len(), fewer than 2 folds
/// or more folds than instances, no or non positive C.
pub fn cross_validate_multiple_kernels<S>(
    matrices: &IndexMap<String, Array2<f64>>,
    target: &[f64],
    params: &SolverParams,
    solver: &S,
) -> Result<Vec<Prediction>>
where
    S: KernelSolver + Sync,
{
    check_config(matrices, target, params)?;
    log::debug!(
        "cross_validate_multiple_kernels nb kernels : {}, nb instances : {}, nb folds : {}",
        matrices.len(),
        target.len(),
        params.get_nb_folds()
    );
    let folds = fold_ranges(target.len(), params.get_nb_folds());
    // folds are contiguous and in order, concatenation gives instance order
    let by_fold: Vec<Vec<Prediction>> = if params.get_parallel() {
        folds
            .par_iter()
            .enumerate()
            .map(|(f, range)| run_fold(f, range, matrices, target, params, solver))
            .collect::<Result<Vec<Vec<Prediction>>>>()?
    } else {
        folds
            .iter()
            .enumerate()
            .map(|(f, range)| run_fold(f, range, matrices, target, params, solver))
            .collect::<Result<Vec<Vec<Prediction>>>>()?
    };
    Ok(by_fold.into_iter().flatten().collect())
} // end of cross_validate_multiple_kernels


// end of mod tests
