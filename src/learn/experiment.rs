//! A multiple kernel experiment : kernel matrices of one dataset, repeated cross validations (one per seed),
//! scores of evaluation functions and frequency of use of each kernel.
//!
//! All the state of a run lives in the experiment, nothing is shared between experiments.

use std::time::SystemTime;

use cpu_time::ProcessTime;

use indexmap::IndexMap;
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{KernelError, Result};
use crate::kernels::GraphKernel;
use crate::matrix::Permutation;

use super::evaluation::{EvalResult, EvaluationFunction};
use super::params::SolverParams;
use super::selector::cross_validate_multiple_kernels;
use super::solver::KernelSolver;


/// label of the result recording kernel computation time, in ms.
pub const KERNEL_COMP_TIME: &str = "kernel comp time";


pub struct KernelExperiment {
    /// kernel matrices by kernel label, in insertion order
    matrices: IndexMap<String, Array2<f64>>,
    target: Vec<f64>,
    params: SolverParams,
    seeds: Vec<u64>,
    eval_functions: Vec<Box<dyn EvaluationFunction>>,
    /// one result per evaluation function, then possibly kernel computation time
    results: Vec<EvalResult>,
    /// fraction of (seed, instance) predicted with each kernel
    usage: IndexMap<String, f64>,
    /// ms spent computing matrices if the experiment computed them
    comp_time: Option<u128>,
} // end of struct KernelExperiment


impl KernelExperiment {
    pub fn new(
        matrices: IndexMap<String, Array2<f64>>,
        target: Vec<f64>,
        params: SolverParams,
        seeds: Vec<u64>,
        eval_functions: Vec<Box<dyn EvaluationFunction>>,
    ) -> Result<Self> {
        if matrices.is_empty() {
            return Err(KernelError::EmptyKernelSet);
        }
        if seeds.is_empty() {
            return Err(KernelError::InvalidParameter("no seed".to_string()));
        }
        Ok(KernelExperiment {
            matrices,
            target,
            params,
            seeds,
            eval_functions,
            results: Vec::new(),
            usage: IndexMap::new(),
            comp_time: None,
        })
    } // end of new


    /// computes the matrices of kernels on data, then builds the experiment.
    /// Kernels run on rayon threads if params ask for parallelism. A label occurring twice gets a `#rank` suffix.
    pub fn from_kernels<D>(
        mut kernels: Vec<Box<dyn GraphKernel<D> + Send>>,
        data: &D,
        target: Vec<f64>,
        params: SolverParams,
        seeds: Vec<u64>,
        eval_functions: Vec<Box<dyn EvaluationFunction>>,
    ) -> Result<Self>
    where
        D: Sync,
    {
        if kernels.is_empty() {
            return Err(KernelError::EmptyKernelSet);
        }
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        let computed: Vec<(String, Array2<f64>)> = if params.get_parallel() {
            kernels
                .par_iter_mut()
                .map(|kernel| kernel.compute(data).map(|m| (kernel.get_label(), m)))
                .collect::<Result<Vec<(String, Array2<f64>)>>>()?
        } else {
            kernels
                .iter_mut()
                .map(|kernel| kernel.compute(data).map(|m| (kernel.get_label(), m)))
                .collect::<Result<Vec<(String, Array2<f64>)>>>()?
        };
        let comp_time = sys_start.elapsed().map(|d| d.as_millis()).unwrap_or(0);
        log::info!(
            "KernelExperiment computed {} kernels, sys time(ms) {:?} cpu time(ms) {:?}",
            computed.len(),
            comp_time,
            cpu_start.elapsed().as_millis()
        );
        //
        let mut matrices = IndexMap::with_capacity(computed.len());
        for (rank, (label, matrix)) in computed.into_iter().enumerate() {
            let label = if matrices.contains_key(&label) {
                format!("{}#{}", label, rank)
            } else {
                label
            };
            matrices.insert(label, matrix);
        }
        let mut experiment = KernelExperiment::new(matrices, target, params, seeds, eval_functions)?;
        experiment.comp_time = Some(comp_time);
        Ok(experiment)
    } // end of from_kernels


    /// records the time (ms) spent computing the matrices when they were computed outside the experiment.
    /// It is reported as a result after run, as for [from_kernels](Self::from_kernels).
    pub fn set_computation_time(&mut self, comp_time: u128) {
        self.comp_time = Some(comp_time);
    }


    /// one cross validation per seed, instances permuted by the seed.
    pub fn run<S>(&mut self, solver: &S) -> Result<()>
    where
        S: KernelSolver + Sync,
    {
        let nb_inst = self.target.len();
        log::info!(
            "KernelExperiment::run nb kernels : {}, nb instances : {}, seeds : {:?}",
            self.matrices.len(),
            nb_inst,
            self.seeds
        );
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let mut results: Vec<EvalResult> = self.eval_functions.iter().map(|f| EvalResult::new(f.get_label())).collect();
        let mut counts: IndexMap<String, usize> = self.matrices.keys().map(|k| (k.clone(), 0)).collect();
        for seed in &self.seeds {
            let permutation = Permutation::from_seed(nb_inst, *seed);
            let target = permutation.apply_vec(&self.target)?;
            let matrices = self
                .matrices
                .iter()
                .map(|(k, m)| permutation.apply_matrix(m).map(|pm| (k.clone(), pm)))
                .collect::<Result<IndexMap<String, Array2<f64>>>>()?;
            let predictions = cross_validate_multiple_kernels(&matrices, &target, &self.params, solver)?;
            //
            let predicted: Vec<f64> = predictions.iter().map(|p| p.label).collect();
            for (f, result) in self.eval_functions.iter().zip(results.iter_mut()) {
                let score = f.compute_score(&target, &predicted);
                log::debug!("seed {} {} : {:.3e}", seed, f.get_label(), score);
                result.add_score(score);
            }
            for p in &predictions {
                if let Some(count) = counts.get_mut(&p.used_kernel) {
                    *count += 1;
                }
            }
        }
        //
        let nb_runs = (self.seeds.len() * nb_inst).max(1) as f64;
        self.usage = counts.into_iter().map(|(k, c)| (k, c as f64 / nb_runs)).collect();
        if let Some(comp_time) = self.comp_time {
            let mut result = EvalResult::new(KERNEL_COMP_TIME);
            result.add_score(comp_time as f64);
            results.push(result);
        }
        self.results = results;
        log::info!(
            "KernelExperiment::run done, sys time(ms) {:?} cpu time(ms) {:?}",
            sys_start.elapsed().map(|d| d.as_millis()).unwrap_or(0),
            cpu_start.elapsed().as_millis()
        );
        for result in &self.results {
            log::info!("{} mean : {:.3e}", result.get_label(), result.mean().unwrap_or(0.));
        }
        Ok(())
    } // end of run


    /// empty before run
    pub fn get_results(&self) -> &[EvalResult] {
        &self.results
    }

    /// kernel label -> frequency of use. Frequencies sum to 1 after run.
    pub fn get_usage(&self) -> &IndexMap<String, f64> {
        &self.usage
    }

    pub fn get_matrices(&self) -> &IndexMap<String, Array2<f64>> {
        &self.matrices
    }

    pub fn get_params(&self) -> &SolverParams {
        &self.params
    }
} // end of impl KernelExperiment


#[cfg(test)]
mod tests {

    use super::*;

    use crate::graph::{GraphBuilder, GraphList};
    use crate::kernels::{WLParams, WLSubTreeKernel, WalkCountKernel, WalkCountParams};
    use crate::learn::evaluation::{Accuracy, F1};
    use crate::learn::solver::NearestMeanSolver;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn block_kernel(target: &[f64]) -> Array2<f64> {
        Array2::from_shape_fn((target.len(), target.len()), |(i, j)| if target[i] == target[j] { 1. } else { 0. })
    }

    #[test]
    fn identical_kernels_usage_sums_to_one() {
        log_init_test();
        let target: Vec<f64> = (0..20).map(|i| (i % 2) as f64 + 1.).collect();
        let mut matrices = IndexMap::new();
        matrices.insert("k1".to_string(), block_kernel(&target));
        matrices.insert("k2".to_string(), block_kernel(&target));
        let params = SolverParams::new(vec![1., 10.], 4);
        let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy), Box::new(F1)];
        let mut experiment = KernelExperiment::new(matrices, target, params, vec![1, 2, 3], evals).unwrap();
        experiment.run(&NearestMeanSolver).unwrap();
        let usage = experiment.get_usage();
        let total: f64 = usage.values().sum();
        assert!((total - 1.).abs() < 1.0e-12);
        assert_eq!(usage.get("k1"), Some(&1.));
        assert_eq!(usage.get("k2"), Some(&0.));
        let results = experiment.get_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get_scores(), &[1., 1., 1.]);
        assert_eq!(results[1].mean(), Some(1.));
    }

    #[test]
    fn runs_are_reproducible() {
        log_init_test();
        // noisy kernel so that results depend on fold composition
        let target: Vec<f64> = (0..15).map(|i| (i % 3) as f64 + 1.).collect();
        let noisy = Array2::from_shape_fn((15, 15), |(i, j)| if i == j { 2. } else { ((i * j) % 5) as f64 / 4. });
        let mut matrices = IndexMap::new();
        matrices.insert("noisy".to_string(), noisy);
        matrices.insert("block".to_string(), block_kernel(&target) * 0.5);
        let params = SolverParams::new(vec![1.], 3);
        let make = || {
            let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy)];
            KernelExperiment::new(matrices.clone(), target.clone(), params.clone(), vec![7, 11], evals).unwrap()
        };
        let mut e1 = make();
        let mut e2 = make();
        e1.run(&NearestMeanSolver).unwrap();
        e2.run(&NearestMeanSolver).unwrap();
        assert_eq!(e1.get_results(), e2.get_results());
        assert_eq!(e1.get_usage(), e2.get_usage());
    }

    #[test]
    fn from_kernels_records_time() {
        log_init_test();
        let mut graphs = GraphList::default();
        let mut target = Vec::new();
        for i in 0..8 {
            let label = if i % 2 == 0 { "x" } else { "y" };
            let mut builder = GraphBuilder::new();
            let a = builder.add_node(label);
            let b = builder.add_node("z");
            builder.add_edge(a, "r", b);
            graphs.push(builder.build());
            target.push((i % 2) as f64 + 1.);
        }
        let kernels: Vec<Box<dyn GraphKernel<GraphList> + Send>> = vec![
            Box::new(WalkCountKernel::new(WalkCountParams::new(2, true, false))),
            Box::new(WLSubTreeKernel::new(WLParams::new(1, true, true, false))),
            Box::new(WalkCountKernel::new(WalkCountParams::new(2, true, false))),
        ];
        let params = SolverParams::new(vec![1.], 4).set_parallel(true);
        let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy)];
        let mut experiment = KernelExperiment::from_kernels(kernels, &graphs, target, params, vec![3], evals).unwrap();
        assert_eq!(experiment.get_matrices().len(), 3);
        experiment.run(&NearestMeanSolver).unwrap();
        let results = experiment.get_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get_scores(), &[1.]);
        assert_eq!(results[1].get_label(), KERNEL_COMP_TIME);
        let total: f64 = experiment.get_usage().values().sum();
        assert!((total - 1.).abs() < 1.0e-12);
    }

    #[test]
    fn external_computation_time_is_reported() {
        log_init_test();
        let target: Vec<f64> = (0..6).map(|i| (i % 2) as f64 + 1.).collect();
        let mut matrices = IndexMap::new();
        matrices.insert("block".to_string(), block_kernel(&target));
        let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy)];
        let mut experiment = KernelExperiment::new(matrices, target, SolverParams::new(vec![1.], 3), vec![2], evals).unwrap();
        experiment.run(&NearestMeanSolver).unwrap();
        assert_eq!(experiment.get_results().len(), 1);
        experiment.set_computation_time(42);
        experiment.run(&NearestMeanSolver).unwrap();
        let results = experiment.get_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].get_label(), KERNEL_COMP_TIME);
        assert_eq!(results[1].get_scores(), &[42.]);
    }

    #[test]
    fn empty_experiment_fails() {
        log_init_test();
        let res = KernelExperiment::new(IndexMap::new(), vec![], SolverParams::default(), vec![1], vec![]);
        assert!(matches!(res, Err(KernelError::EmptyKernelSet)));
    }
} // end of mod tests
