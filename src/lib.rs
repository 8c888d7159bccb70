//! lib target
//!
//! Graph kernels computed from explicit feature vectors.
//!
//! - [kernels::WalkCountKernel] counts the labeled walks of bounded length rooted at every node and edge.
//! - [kernels::WLSubTreeKernel] counts the Weisfeiler-Lehman relabelings of nodes along a fixed number of iterations.
//!
//! Both produce one [feature::SparseVector] per graph, turned into a Gram matrix by [matrix].
//! The [learn] module drives a cross validation selecting, per fold, the best of several precomputed kernels.


use env_logger::Builder;


// install a logger facility
pub fn init_log() -> u64 {
    let _ = Builder::from_default_env().try_init();
    println!("\n ************** initializing logger *****************\n");
    return 1;
}

pub mod error;

pub mod graph;

pub mod feature;

pub mod kernels;

pub mod matrix;

pub mod learn;

pub mod io;

pub mod prelude;
