//! An experiment on explicit feature vectors : the linear counterpart of [KernelExperiment](super::KernelExperiment).
//!
//! The vectors of one extraction are turned into a sparse design matrix, permuted by each seed and cross validated
//! with a [FeatureVectorSolver]. In each outer fold C is chosen by an inner cross validation scored with accuracy,
//! the first best C wins. There is a single feature space so no kernel selection happens.

use std::ops::Range;
use std::time::SystemTime;

use cpu_time::ProcessTime;

use rayon::prelude::*;
use sprs::CsMatI;

use crate::error::{KernelError, Result};
use crate::feature::SparseVector;
use crate::kernels::{ComputationTimeTracker, FeatureVectorKernel};
use crate::matrix::{feature_matrix, select_rows, Permutation};

use super::evaluation::{Accuracy, EvalResult, EvaluationFunction};
use super::experiment::KERNEL_COMP_TIME;
use super::params::SolverParams;
use super::selector::{check_folds, complement, fold_ranges};
use super::solver::FeatureVectorSolver;


pub struct FeatureVectorExperiment {
    vectors: Vec<SparseVector>,
    target: Vec<f64>,
    params: SolverParams,
    seeds: Vec<u64>,
    eval_functions: Vec<Box<dyn EvaluationFunction>>,
    /// one result per evaluation function, then possibly extraction time
    results: Vec<EvalResult>,
    /// C chosen in each outer fold, seed after seed
    selected_cs: Vec<f64>,
    /// ms spent extracting vectors if the experiment extracted them
    comp_time: Option<u128>,
} // end of struct FeatureVectorExperiment


impl FeatureVectorExperiment {
    pub fn new(
        vectors: Vec<SparseVector>,
        target: Vec<f64>,
        params: SolverParams,
        seeds: Vec<u64>,
        eval_functions: Vec<Box<dyn EvaluationFunction>>,
    ) -> Result<Self> {
        if vectors.len() != target.len() {
            return Err(KernelError::DimensionMismatch {
                what: "feature vectors".to_string(),
                expected: target.len(),
                got: vectors.len(),
            });
        }
        if seeds.is_empty() {
            return Err(KernelError::InvalidParameter("no seed".to_string()));
        }
        Ok(FeatureVectorExperiment {
            vectors,
            target,
            params,
            seeds,
            eval_functions,
            results: Vec::new(),
            selected_cs: Vec::new(),
            comp_time: None,
        })
    } // end of new


    /// extracts the feature vectors of data with kernel, then builds the experiment.
    pub fn from_kernel<D, K>(
        kernel: &mut K,
        data: &D,
        target: Vec<f64>,
        params: SolverParams,
        seeds: Vec<u64>,
        eval_functions: Vec<Box<dyn EvaluationFunction>>,
    ) -> Result<Self>
    where
        K: FeatureVectorKernel<D> + ComputationTimeTracker,
    {
        let vectors = kernel.compute_feature_vectors(data)?;
        log::info!(
            "FeatureVectorExperiment extracted {} vectors with {}, time(ms) {:?}",
            vectors.len(),
            kernel.get_label(),
            kernel.get_computation_time()
        );
        let mut experiment = FeatureVectorExperiment::new(vectors, target, params, seeds, eval_functions)?;
        experiment.comp_time = Some(kernel.get_computation_time());
        Ok(experiment)
    } // end of from_kernel


    /// one cross validation per seed, rows of the design matrix permuted by the seed.
    pub fn run<S>(&mut self, solver: &S) -> Result<()>
    where
        S: FeatureVectorSolver + Sync,
    {
        let nb_inst = self.target.len();
        check_folds(nb_inst, &self.params)?;
        log::info!(
            "FeatureVectorExperiment::run nb instances : {}, nb folds : {}, seeds : {:?}",
            nb_inst,
            self.params.get_nb_folds(),
            self.seeds
        );
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let mut results: Vec<EvalResult> = self.eval_functions.iter().map(|f| EvalResult::new(f.get_label())).collect();
        let mut selected_cs = Vec::<f64>::with_capacity(self.seeds.len() * self.params.get_nb_folds());
        for seed in &self.seeds {
            let permutation = Permutation::from_seed(nb_inst, *seed);
            let target = permutation.apply_vec(&self.target)?;
            let design = feature_matrix(&permutation.apply_vec(&self.vectors)?);
            log::debug!("seed {} design matrix shape {:?} nnz {}", seed, design.shape(), design.nnz());
            let folds = fold_ranges(nb_inst, self.params.get_nb_folds());
            let by_fold: Vec<(f64, Vec<f64>)> = if self.params.get_parallel() {
                folds
                    .par_iter()
                    .enumerate()
                    .map(|(f, range)| run_fold(f, range, &design, &target, &self.params, solver))
                    .collect::<Result<Vec<(f64, Vec<f64>)>>>()?
            } else {
                folds
                    .iter()
                    .enumerate()
                    .map(|(f, range)| run_fold(f, range, &design, &target, &self.params, solver))
                    .collect::<Result<Vec<(f64, Vec<f64>)>>>()?
            };
            let mut predicted = Vec::<f64>::with_capacity(nb_inst);
            for (c, mut fold_predicted) in by_fold {
                selected_cs.push(c);
                predicted.append(&mut fold_predicted);
            }
            for (f, result) in self.eval_functions.iter().zip(results.iter_mut()) {
                let score = f.compute_score(&target, &predicted);
                log::debug!("seed {} {} : {:.3e}", seed, f.get_label(), score);
                result.add_score(score);
            }
        }
        if let Some(comp_time) = self.comp_time {
            let mut result = EvalResult::new(KERNEL_COMP_TIME);
            result.add_score(comp_time as f64);
            results.push(result);
        }
        self.results = results;
        self.selected_cs = selected_cs;
        log::info!(
            "FeatureVectorExperiment::run done, sys time(ms) {:?} cpu time(ms) {:?}",
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

    /// C chosen in each outer fold, nb seeds * nb folds values after run
    pub fn get_selected_cs(&self) -> &[f64] {
        &self.selected_cs
    }

    pub fn get_vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn get_params(&self) -> &SolverParams {
        &self.params
    }
} // end of impl FeatureVectorExperiment


// accuracy of c on rows train, by inner cross validation or resubstitution if train is too small
fn inner_score<S: FeatureVectorSolver>(
    design: &CsMatI<f64, usize>,
    target: &[f64],
    train: &[usize],
    c: f64,
    params: &SolverParams,
    solver: &S,
) -> Result<f64> {
    let class_weights = params.get_class_weights();
    let train_target: Vec<f64> = train.iter().map(|i| target[*i]).collect();
    let nb_folds = params.get_inner_folds().min(train.len());
    if nb_folds < 2 {
        let rows = select_rows(design, train);
        let predicted = solver.train_predict(&rows, &train_target, &rows, c, &class_weights)?;
        return Ok(Accuracy.compute_score(&train_target, &predicted));
    }
    let mut predicted = Vec::<f64>::with_capacity(train.len());
    for range in fold_ranges(train.len(), nb_folds) {
        let inner_train: Vec<usize> = complement(&range, train.len()).iter().map(|i| train[*i]).collect();
        let inner_target: Vec<f64> = inner_train.iter().map(|i| target[*i]).collect();
        let train_rows = select_rows(design, &inner_train);
        let test_rows = select_rows(design, &train[range]);
        predicted.append(&mut solver.train_predict(&train_rows, &inner_target, &test_rows, c, &class_weights)?);
    }
    Ok(Accuracy.compute_score(&train_target, &predicted))
} // end of inner_score


// returns the selected C and the predictions of the test range
fn run_fold<S: FeatureVectorSolver>(
    fold: usize,
    range: &Range<usize>,
    design: &CsMatI<f64, usize>,
    target: &[f64],
    params: &SolverParams,
    solver: &S,
) -> Result<(f64, Vec<f64>)> {
    let train = complement(range, target.len());
    let test: Vec<usize> = range.clone().collect();
    let mut best: Option<(f64, f64)> = None;
    for c in params.get_cs() {
        let score = inner_score(design, target, &train, *c, params, solver)?;
        log::trace!("fold {} c {:.3e} score {:.3e}", fold, c, score);
        let improves = match best {
            None => true,
            Some((_, best_score)) => Accuracy.is_better(score, best_score),
        };
        if improves {
            best = Some((*c, score));
        }
    }
    let (c, score) = best.ok_or_else(|| KernelError::InvalidParameter("no regularization constant".to_string()))?;
    log::debug!("fold {} selected c {:.3e} inner score {:.3e}", fold, c, score);
    //
    let train_target: Vec<f64> = train.iter().map(|i| target[*i]).collect();
    let train_rows = select_rows(design, &train);
    let test_rows = select_rows(design, &test);
    let predicted = solver.train_predict(&train_rows, &train_target, &test_rows, c, &params.get_class_weights())?;
    if predicted.len() != test.len() {
        return Err(KernelError::Solver(format!(
            "solver returned {} predictions for {} test instances",
            predicted.len(),
            test.len()
        )));
    }
    Ok((c, predicted))
} // end of run_fold


#[cfg(test)]
mod tests {

    //    RUST_LOG=graphkernel::learn::fvexperiment=DEBUG cargo test fvexperiment -- --nocapture

    use super::*;

    use crate::graph::{GraphBuilder, GraphList};
    use crate::kernels::{WalkCountKernel, WalkCountParams};
    use crate::learn::evaluation::F1;
    use crate::learn::solver::NearestCentroidSolver;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // class 1 instances carry feature 0, class 2 feature 1, each instance has its own extra feature
    fn separable(n: usize) -> (Vec<SparseVector>, Vec<f64>) {
        let target: Vec<f64> = (0..n).map(|i| (i % 2) as f64 + 1.).collect();
        let vectors = (0..n)
            .map(|i| vec![(i % 2, 1.), (2 + i, 0.5)].into_iter().collect::<SparseVector>())
            .collect();
        (vectors, target)
    }

    #[test]
    fn separable_vectors_are_classified() {
        log_init_test();
        let (vectors, target) = separable(12);
        let params = SolverParams::new(vec![0.1, 1.], 4).set_inner_folds(3);
        let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy), Box::new(F1)];
        let mut experiment = FeatureVectorExperiment::new(vectors, target, params, vec![1, 2, 3], evals).unwrap();
        assert!(experiment.get_results().is_empty());
        experiment.run(&NearestCentroidSolver).unwrap();
        let results = experiment.get_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get_scores(), &[1., 1., 1.]);
        assert_eq!(results[1].mean(), Some(1.));
        // the solver ignores C, ties go to the first one
        assert_eq!(experiment.get_selected_cs().len(), 12);
        assert!(experiment.get_selected_cs().iter().all(|c| *c == 0.1));
    }

    #[test]
    fn runs_are_reproducible_and_parallel_is_same() {
        log_init_test();
        // overlapping classes so that scores depend on fold composition
        let target: Vec<f64> = (0..15).map(|i| (i % 3) as f64 + 1.).collect();
        let vectors: Vec<SparseVector> = (0..15)
            .map(|i| vec![(i % 3, 1.), ((i * 7) % 4, 1.5), (3 + i % 5, 1.)].into_iter().collect())
            .collect();
        let make = |parallel: bool| {
            let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy)];
            let params = SolverParams::new(vec![1.], 3).set_parallel(parallel);
            FeatureVectorExperiment::new(vectors.clone(), target.clone(), params, vec![7, 11], evals).unwrap()
        };
        let mut e1 = make(false);
        let mut e2 = make(false);
        let mut e3 = make(true);
        e1.run(&NearestCentroidSolver).unwrap();
        e2.run(&NearestCentroidSolver).unwrap();
        e3.run(&NearestCentroidSolver).unwrap();
        assert_eq!(e1.get_results(), e2.get_results());
        assert_eq!(e1.get_results(), e3.get_results());
        assert_eq!(e1.get_results()[0].get_scores().len(), 2);
    }

    #[test]
    fn from_kernel_records_time() {
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
        let mut kernel = WalkCountKernel::new(WalkCountParams::new(2, true, false));
        let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy)];
        let params = SolverParams::new(vec![1.], 4);
        let mut experiment =
            FeatureVectorExperiment::from_kernel(&mut kernel, &graphs, target, params, vec![5], evals).unwrap();
        assert_eq!(experiment.get_vectors().len(), 8);
        experiment.run(&NearestCentroidSolver).unwrap();
        let results = experiment.get_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get_scores(), &[1.]);
        assert_eq!(results[1].get_label(), KERNEL_COMP_TIME);
        assert_eq!(results[1].get_scores(), &[kernel.get_computation_time() as f64]);
    }

    #[test]
    fn configuration_errors() {
        log_init_test();
        let (vectors, target) = separable(6);
        let evals = || -> Vec<Box<dyn EvaluationFunction>> { vec![Box::new(Accuracy)] };
        let res = FeatureVectorExperiment::new(vectors[..5].to_vec(), target.clone(), SolverParams::default(), vec![1], evals());
        assert!(matches!(res, Err(KernelError::DimensionMismatch { expected: 6, got: 5, .. })));
        let res = FeatureVectorExperiment::new(vectors.clone(), target.clone(), SolverParams::default(), vec![], evals());
        assert!(matches!(res, Err(KernelError::InvalidParameter(_))));
        // default params ask for 10 folds
        let mut experiment =
            FeatureVectorExperiment::new(vectors, target, SolverParams::default(), vec![1], evals()).unwrap();
        let res = experiment.run(&NearestCentroidSolver);
        assert!(matches!(res, Err(KernelError::InvalidFoldCount { folds: 10, instances: 6 })));
    }
} // end of mod tests
