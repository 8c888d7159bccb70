//! Feature vectors and the dictionaries giving their indices.

/// sparse vectors
pub mod sparsevec;

/// incremental label to id mapping
pub mod dictionary;

pub use dictionary::{FrozenDictionary, LabelDictionary};
pub use sparsevec::SparseVector;
