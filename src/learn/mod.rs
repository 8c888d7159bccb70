//! Learning with precomputed kernels.
//!
//! The solver (an SVM in real use) is a collaborator behind the [KernelSolver](solver::KernelSolver) trait.
//! This module provides what surrounds it : targets, evaluation functions, the cross validation selecting
//! the best kernel in each fold and experiments repeating it over seeds.
//! Feature vectors can also be given directly to a linear solver, see [FeatureVectorExperiment].

pub mod params;

pub mod solver;

pub mod evaluation;

/// class labels utilities
pub mod target;

/// multiple kernel cross validation
pub mod selector;

pub mod experiment;

/// experiments on explicit feature vectors
pub mod fvexperiment;

pub use evaluation::{Accuracy, EvalResult, EvaluationFunction, F1};
pub use experiment::{KernelExperiment, KERNEL_COMP_TIME};
pub use fvexperiment::FeatureVectorExperiment;
pub use params::SolverParams;
pub use selector::{cross_validate_multiple_kernels, Prediction};
pub use solver::{FeatureVectorSolver, KernelSolver, NearestCentroidSolver, NearestMeanSolver};
