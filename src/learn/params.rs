//! Parameters of the cross validation driving the solver.

use serde::{Deserialize, Serialize};


/// hyperparameters given to the solver collaborator and to the multiple kernel selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// regularization constants tried for each kernel
    pub cs: Vec<f64>,
    /// number of outer folds, each fold is a contiguous range of (permuted) instances
    pub nb_folds: usize,
    /// number of folds of the cross validation choosing (kernel, C) on the training part of an outer fold
    pub inner_folds: usize,
    /// class labels having a weight. Labels not listed have weight 1.
    pub weight_labels: Vec<f64>,
    /// weights of classes in weight_labels
    pub weights: Vec<f64>,
    /// outer folds run on rayon threads
    pub parallel: bool,
} // end of SolverParams


impl SolverParams {
    /// inner folds defaults to 5, no class weights, serial.
    pub fn new(cs: Vec<f64>, nb_folds: usize) -> Self {
        SolverParams {
            cs,
            nb_folds,
            inner_folds: 5,
            weight_labels: Vec::new(),
            weights: Vec::new(),
            parallel: false,
        }
    }

    pub fn get_cs(&self) -> &[f64] {
        &self.cs
    }

    pub fn get_nb_folds(&self) -> usize {
        self.nb_folds
    }

    pub fn get_inner_folds(&self) -> usize {
        self.inner_folds
    }

    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    /// (label, weight) couples
    pub fn get_class_weights(&self) -> Vec<(f64, f64)> {
        self.weight_labels.iter().copied().zip(self.weights.iter().copied()).collect()
    }

    pub fn set_nb_folds(mut self, nb_folds: usize) -> Self {
        self.nb_folds = nb_folds;
        self
    }

    pub fn set_inner_folds(mut self, inner_folds: usize) -> Self {
        self.inner_folds = inner_folds;
        self
    }

    /// weight_labels and weights must have the same length, surplus values are ignored.
    pub fn set_weights(mut self, weight_labels: Vec<f64>, weights: Vec<f64>) -> Self {
        if weight_labels.len() != weights.len() {
            log::error!(
                "SolverParams::set_weights, {} labels for {} weights",
                weight_labels.len(),
                weights.len()
            );
        }
        self.weight_labels = weight_labels;
        self.weights = weights;
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
} // end of impl SolverParams


impl Default for SolverParams {
    fn default() -> Self {
        SolverParams::new(vec![1.], 10)
    }
}
