//! To ease access to most frequently items
//!
//! Items are re-exported by name : several modules have submodules of the same name (params, triples).


pub use crate::io::csv::{align_labels, graphs_from_csv, kernel_matrix_to_csv, labels_from_csv};

pub use crate::error::KernelError;
pub use crate::graph::{
    labeled_neighbours, triples_to_graph, EdgeData, GraphBuilder, GraphList, HasLabel, LabeledGraph, NodeData, Triple,
    TripleData,
};
pub use crate::feature::{FrozenDictionary, LabelDictionary, SparseVector};
pub use crate::kernels::{
    CombinedKernel, ComputationTimeTracker, FeatureInspector, FeatureVectorKernel, GraphKernel, TripleKernel,
    WLParams, WLSubTreeKernel, WalkCountKernel, WalkCountParams,
};
pub use crate::matrix::{
    combine, compute_kernel_matrix, feature_matrix, normalize_matrix, normalize_vectors, permute, select_rows,
    sub_matrix, Permutation,
};

pub use crate::learn::{
    cross_validate_multiple_kernels, Accuracy, EvalResult, EvaluationFunction, FeatureVectorExperiment,
    FeatureVectorSolver, KernelExperiment, KernelSolver, NearestCentroidSolver, NearestMeanSolver, Prediction,
    SolverParams, F1, KERNEL_COMP_TIME,
};
pub use crate::learn::target::{
    class_counts, compute_weight_labels, compute_weights, create_target, create_target_sorted, create_target_with_map,
    keep_largest_classes, remove_small_classes, select,
};
