//! Kernel Parameters
//!
//!
//!
use serde::{Deserialize, Serialize};


/// parameters of the walk count kernel.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkCountParams {
    /// maximal length of walks. Nodes and edges each count for one step,
    /// so 0 is a node or an edge alone, 1 is a node and an edge or an edge and a node ...
    pub path_length: usize,
    /// cosine normalization of feature vectors
    pub normalize: bool,
    /// parallel mode for kernel matrix computation
    pub parallel: bool,
} // end of WalkCountParams


impl WalkCountParams {
    pub fn new(path_length: usize, normalize: bool, parallel: bool) -> Self {
        WalkCountParams {
            path_length,
            normalize,
            parallel,
        }
    }
    ///
    pub fn get_path_length(&self) -> usize {
        self.path_length
    }

    ///
    pub fn get_normalize(&self) -> bool {
        self.normalize
    }

    ///
    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize
    }
} // end of WalkCountParams


//==================================================================================


/// parameters of the Weisfeiler-Lehman subtree kernel.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WLParams {
    /// number of relabeling iterations. There is no stabilization check, exactly this number of iterations is run.
    pub iterations: usize,
    /// if true a node gathers labels of its successors (regular subtrees rooted at the node),
    /// else of its predecessors.
    pub reverse: bool,
    /// cosine normalization of feature vectors
    pub normalize: bool,
    /// parallel mode for kernel matrix computation
    pub parallel: bool,
} // end of WLParams


impl WLParams {
    pub fn new(iterations: usize, reverse: bool, normalize: bool, parallel: bool) -> Self {
        WLParams {
            iterations,
            reverse,
            normalize,
            parallel,
        }
    }

    pub fn get_iterations(&self) -> usize {
        self.iterations
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn get_normalize(&self) -> bool {
        self.normalize
    }

    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize
    }
} // end of WLParams
