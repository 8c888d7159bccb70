//! A kernel made of the sum of several kernels on the same data.
//!
//! Typical use is a walk count kernel summed over several path lengths, or walk count + WL.
//! Each kernel is computed independently (in parallel mode on rayon threads, each worker owning its kernel
//! and so its dictionaries), then matrices are added with [combine](crate::matrix::combine).

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{KernelError, Result};
use crate::matrix::{combine, normalize_matrix};

use super::*;


pub struct CombinedKernel<D> {
    kernels: Vec<Box<dyn GraphKernel<D> + Send>>,
    /// cosine normalization of the summed matrix
    normalize: bool,
    parallel: bool,
} // end of struct CombinedKernel


impl<D> CombinedKernel<D> {
    pub fn new(normalize: bool, parallel: bool) -> Self {
        CombinedKernel {
            kernels: Vec::new(),
            normalize,
            parallel,
        }
    }

    pub fn add_kernel(&mut self, kernel: Box<dyn GraphKernel<D> + Send>) {
        self.kernels.push(kernel);
    }

    pub fn get_nb_kernels(&self) -> usize {
        self.kernels.len()
    }
} // end of impl CombinedKernel


impl<D> GraphKernel<D> for CombinedKernel<D>
where
    D: Sync,
{
    fn get_label(&self) -> String {
        let labels: Vec<String> = self.kernels.iter().map(|k| k.get_label()).collect();
        format!("Combined_{}_[{}]", self.normalize, labels.join("+"))
    }

    fn compute(&mut self, data: &D) -> Result<Array2<f64>> {
        if self.kernels.is_empty() {
            return Err(KernelError::EmptyKernelSet);
        }
        log::debug!("CombinedKernel computing {} kernels, parallel : {}", self.kernels.len(), self.parallel);
        let matrices: Vec<Array2<f64>> = if self.parallel {
            self.kernels
                .par_iter_mut()
                .map(|kernel| kernel.compute(data))
                .collect::<Result<Vec<Array2<f64>>>>()?
        } else {
            self.kernels
                .iter_mut()
                .map(|kernel| kernel.compute(data))
                .collect::<Result<Vec<Array2<f64>>>>()?
        };
        let mut sum = combine(&matrices)?;
        if self.normalize {
            normalize_matrix(&mut sum)?;
        }
        Ok(sum)
    } // end of compute
} // end of impl GraphKernel


// end of mod tests
