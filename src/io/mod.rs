//! io : csv loading of graph batches and labels, csv dump of kernel matrices

pub mod csv;
