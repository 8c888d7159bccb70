//! The solver collaborator : trains on a precomputed kernel and predicts test instances.
//!
//! An SVM solver is not provided here. [NearestMeanSolver] is a deterministic solver assigning a test
//! instance to the class whose mean is nearest in the feature space of the kernel:
//!
//!   d(x, c)² = K(x,x) - 2/|c| Σ_{i ∈ c} K(x,i) + 1/|c|² Σ_{i,j ∈ c} K(i,j)
//!
//! K(x,x) does not depend on the class so it is dropped.
//!
//! [FeatureVectorSolver] is the linear counterpart, it works on sparse design matrices (one row per instance)
//! and [NearestCentroidSolver] is its reference implementation.

use ndarray::Array2;
use sprs::CsMatI;

use crate::error::{KernelError, Result};

use super::target::class_counts;


pub trait KernelSolver {
    /// - train_kernel : (nb train, nb train) kernel
    /// - train_target : class of train instances
    /// - test_kernel : (nb test, nb train) kernel between test and train instances
    /// - c : regularization constant
    /// - class_weights : (label, weight) couples
    ///
    /// returns the predicted class of each test instance
    fn train_predict(
        &self,
        train_kernel: &Array2<f64>,
        train_target: &[f64],
        test_kernel: &Array2<f64>,
        c: f64,
        class_weights: &[(f64, f64)],
    ) -> Result<Vec<f64>>;
} // end of trait KernelSolver


pub(crate) fn check_solver_input(train_kernel: &Array2<f64>, train_target: &[f64], test_kernel: &Array2<f64>) -> Result<()> {
    let nb_train = train_target.len();
    if nb_train == 0 {
        return Err(KernelError::Solver("no training instance".to_string()));
    }
    let checks = [
        ("train kernel rows", train_kernel.nrows()),
        ("train kernel columns", train_kernel.ncols()),
        ("test kernel columns", test_kernel.ncols()),
    ];
    for (what, got) in checks {
        if got != nb_train {
            return Err(KernelError::DimensionMismatch {
                what: what.to_string(),
                expected: nb_train,
                got,
            });
        }
    }
    Ok(())
} // end of check_solver_input


/// Nearest class mean in kernel feature space. C and class weights have no effect.
/// Ties go to the smallest class value.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestMeanSolver;

impl KernelSolver for NearestMeanSolver {
    fn train_predict(
        &self,
        train_kernel: &Array2<f64>,
        train_target: &[f64],
        test_kernel: &Array2<f64>,
        c: f64,
        _class_weights: &[(f64, f64)],
    ) -> Result<Vec<f64>> {
        check_solver_input(train_kernel, train_target, test_kernel)?;
        log::trace!("NearestMeanSolver nb train : {}, nb test : {}, c : {:.3e}", train_target.len(), test_kernel.nrows(), c);
        // members and squared norm of mean of each class
        let classes: Vec<(f64, Vec<usize>, f64)> = class_counts(train_target)
            .into_iter()
            .map(|(class, count)| {
                let members: Vec<usize> = (0..train_target.len()).filter(|i| train_target[*i] == class).collect();
                let mut self_term = 0.;
                for i in &members {
                    for j in &members {
                        self_term += train_kernel[[*i, *j]];
                    }
                }
                (class, members, self_term / (count * count) as f64)
            })
            .collect();
        //
        let predictions = (0..test_kernel.nrows())
            .map(|x| {
                let mut best: Option<(f64, f64)> = None;
                for (class, members, self_term) in &classes {
                    let cross: f64 = members.iter().map(|i| test_kernel[[x, *i]]).sum();
                    let dist = self_term - 2. * cross / members.len() as f64;
                    match best {
                        Some((_, best_dist)) if dist >= best_dist => (),
                        _ => best = Some((*class, dist)),
                    }
                }
                // classes is not empty as there is at least one train instance
                best.map_or(train_target[0], |(class, _)| class)
            })
            .collect();
        Ok(predictions)
    } // end of train_predict
} // end of impl KernelSolver for NearestMeanSolver


/// A solver working directly on feature vectors (a linear SVM or logistic regression in real use).
pub trait FeatureVectorSolver {
    /// - train : (nb train, nb features) design matrix
    /// - train_target : class of train instances
    /// - test : (nb test, nb features) design matrix, in the feature space of train
    /// - c : regularization constant
    /// - class_weights : (label, weight) couples
    ///
    /// returns the predicted class of each test instance
    fn train_predict(
        &self,
        train: &CsMatI<f64, usize>,
        train_target: &[f64],
        test: &CsMatI<f64, usize>,
        c: f64,
        class_weights: &[(f64, f64)],
    ) -> Result<Vec<f64>>;
} // end of trait FeatureVectorSolver


fn check_design_input(train: &CsMatI<f64, usize>, train_target: &[f64], test: &CsMatI<f64, usize>) -> Result<()> {
    if train_target.is_empty() {
        return Err(KernelError::Solver("no training instance".to_string()));
    }
    if train.rows() != train_target.len() {
        return Err(KernelError::DimensionMismatch {
            what: "train matrix rows".to_string(),
            expected: train_target.len(),
            got: train.rows(),
        });
    }
    if test.cols() != train.cols() {
        return Err(KernelError::DimensionMismatch {
            what: "test matrix columns".to_string(),
            expected: train.cols(),
            got: test.cols(),
        });
    }
    Ok(())
} // end of check_design_input


/// Nearest class centroid in feature space : argmin over classes of |μ|² - 2 x.μ
/// C and class weights have no effect. Ties go to the smallest class value.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestCentroidSolver;

impl FeatureVectorSolver for NearestCentroidSolver {
    fn train_predict(
        &self,
        train: &CsMatI<f64, usize>,
        train_target: &[f64],
        test: &CsMatI<f64, usize>,
        c: f64,
        _class_weights: &[(f64, f64)],
    ) -> Result<Vec<f64>> {
        check_design_input(train, train_target, test)?;
        log::trace!(
            "NearestCentroidSolver nb train : {}, nb test : {}, nb features : {}, c : {:.3e}",
            train.rows(),
            test.rows(),
            train.cols(),
            c
        );
        let counts = class_counts(train_target);
        // dense centroid and its squared norm for each class
        let mut centroids: Vec<Vec<f64>> = vec![vec![0.; train.cols()]; counts.len()];
        for (i, row) in train.outer_iterator().enumerate() {
            if let Some(rank) = counts.iter().position(|(class, _)| *class == train_target[i]) {
                for (j, value) in row.iter() {
                    centroids[rank][j] += *value;
                }
            }
        }
        let classes: Vec<(f64, Vec<f64>, f64)> = counts
            .iter()
            .zip(centroids.into_iter())
            .map(|((class, count), mut centroid)| {
                centroid.iter_mut().for_each(|v| *v /= *count as f64);
                let norm2 = centroid.iter().map(|v| v * v).sum::<f64>();
                (*class, centroid, norm2)
            })
            .collect();
        //
        let predictions = test
            .outer_iterator()
            .map(|x| {
                let mut best: Option<(f64, f64)> = None;
                for (class, centroid, norm2) in &classes {
                    let cross: f64 = x.iter().map(|(j, value)| value * centroid[j]).sum();
                    let dist = norm2 - 2. * cross;
                    match best {
                        Some((_, best_dist)) if dist >= best_dist => (),
                        _ => best = Some((*class, dist)),
                    }
                }
                best.map_or(train_target[0], |(class, _)| class)
            })
            .collect();
        Ok(predictions)
    } // end of train_predict
} // end of impl FeatureVectorSolver for NearestCentroidSolver


// end of mod tests
