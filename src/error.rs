//! Error types for kernel computations.
//!
//! Configuration and sequencing errors are caller bugs and are returned before any partial result is produced.
//! Degenerate data (zero norm vectors, null diagonal terms) is not an error, it is absorbed where it occurs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    /// no candidate kernel was given
    #[error("empty kernel set")]
    EmptyKernelSet,

    /// matrices (or labels) that must share a size do not
    #[error("dimension mismatch for {what} : expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid fold count {folds} for {instances} instances")]
    InvalidFoldCount { folds: usize, instances: usize },

    #[error("invalid parameter : {0}")]
    InvalidParameter(String),

    /// descriptions asked before any feature vector computation
    #[error("feature descriptions unavailable, compute feature vectors first")]
    FeatureDescriptionUnavailable,

    /// feature index not allocated by the last extraction
    #[error("unknown feature index {0}")]
    UnknownFeature(usize),

    #[error("solver error : {0}")]
    Solver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
