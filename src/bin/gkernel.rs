//! an executable computing a graph kernel and, if labels are given, cross validating it.
//! example usage:
//! gkernel --graphs "mutag.csv" --labels "mutag_labels.csv" --output "kernel.csv" --normalize walk --depth 4
//! gkernel --graphs "mutag.csv" --labels "mutag_labels.csv" --folds 10 --seeds 1,2,3 wl --iter 3 --reverse
//!
//! The graph file is described in the io::csv module of the library.
//! Evaluation uses the nearest class mean solver, reporting accuracy and F1.

use std::path::Path;

use anyhow::anyhow;
use clap::{arg, Arg, ArgMatches, Command};
use indexmap::IndexMap;
use ndarray::Array2;

use graphkernel::prelude::*;


enum KernelChoice {
    Walk(WalkCountParams),
    WL(WLParams),
}


fn parse_value<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> anyhow::Result<T> {
    match matches.value_of(name) {
        Some(str) => str.parse::<T>().map_err(|_| anyhow!("error parsing {}, got {}", name, str)),
        _ => Err(anyhow!("missing argument {}", name)),
    }
}


fn parse_walk(matches: &ArgMatches, normalize: bool, parallel: bool) -> anyhow::Result<WalkCountParams> {
    log::debug!("in parse_walk");
    let depth = parse_value::<usize>(matches, "depth")?;
    Ok(WalkCountParams::new(depth, normalize, parallel))
}


fn parse_wl(matches: &ArgMatches, normalize: bool, parallel: bool) -> anyhow::Result<WLParams> {
    log::debug!("in parse_wl");
    let iterations = parse_value::<usize>(matches, "iter")?;
    let reverse = matches.is_present("reverse");
    Ok(WLParams::new(iterations, reverse, normalize, parallel))
}


// label, matrix and extraction time (ms) of kernel on graphs
fn compute_kernel<K>(kernel: &mut K, graphs: &GraphList) -> anyhow::Result<(String, Array2<f64>, u128)>
where
    K: GraphKernel<GraphList> + ComputationTimeTracker,
{
    log::info!("kernel : {}", kernel.get_label());
    let matrix = kernel.compute(graphs)?;
    Ok((kernel.get_label(), matrix, kernel.get_computation_time()))
}


fn parse_seeds(matches: &ArgMatches) -> anyhow::Result<Vec<u64>> {
    match matches.value_of("seeds") {
        Some(str) => str
            .split(',')
            .map(|s| s.trim().parse::<u64>().map_err(|_| anyhow!("error parsing seed {}", s)))
            .collect(),
        None => Ok(vec![1]),
    }
}


pub fn main() -> anyhow::Result<()> {
    //
    let _ = graphkernel::init_log();
    //
    let matches = Command::new("gkernel")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(Arg::new("graphs")
            .long("graphs")
            .takes_value(true)
            .required(true)
            .help("csv file of graphs"))
        .arg(Arg::new("labels")
            .long("labels")
            .takes_value(true)
            .required(false)
            .help("csv file of graph classes, triggers cross validation"))
        .arg(Arg::new("output")
            .long("output")
            .takes_value(true)
            .required(false)
            .help("csv file to dump the kernel matrix in"))
        .arg(Arg::new("normalize")
            .long("normalize")
            .help("cosine normalization of feature vectors"))
        .arg(Arg::new("parallel")
            .long("parallel")
            .help("parallel kernel matrix and folds"))
        .args(&[
            arg!(--folds [folds] "number of folds, default 10"),
            arg!(--seeds [seeds] "comma separated seeds, default 1"),
        ])
        .subcommand(Command::new("walk")
            .arg_required_else_help(true)
            .args(&[
                arg!(-d --depth <depth> "maximal walk length"),
            ])
        )
        .subcommand(Command::new("wl")
            .arg_required_else_help(true)
            .args(&[
                arg!(--iter <iter> "number of relabeling iterations"),
            ])
            .arg(Arg::new("reverse")
                .long("reverse")
                .help("relabel from successors instead of predecessors"))
        )
    .get_matches();
    //
    let normalize = matches.is_present("normalize");
    let parallel = matches.is_present("parallel");
    let choice = match matches.subcommand() {
        Some(("walk", sub_m)) => KernelChoice::Walk(parse_walk(sub_m, normalize, parallel)?),
        Some(("wl", sub_m)) => KernelChoice::WL(parse_wl(sub_m, normalize, parallel)?),
        _ => {
            log::error!("expected subcommand walk or wl");
            return Err(anyhow!("expected subcommand walk or wl"));
        }
    };
    //
    let graph_file = matches.value_of("graphs").ok_or_else(|| anyhow!("missing graphs file"))?;
    log::info!("input file : {:?}", graph_file);
    let (graphs, ids) = graphs_from_csv(Path::new(graph_file))?;
    //
    let (kernel_label, matrix, comp_time) = match choice {
        KernelChoice::Walk(params) => compute_kernel(&mut WalkCountKernel::new(params), &graphs)?,
        KernelChoice::WL(params) => compute_kernel(&mut WLSubTreeKernel::new(params), &graphs)?,
    };
    //
    if let Some(output) = matches.value_of("output") {
        kernel_matrix_to_csv(Path::new(output), &matrix)?;
    }
    //
    let label_file = match matches.value_of("labels") {
        Some(file) => file,
        None => return Ok(()),
    };
    let labels = labels_from_csv(Path::new(label_file))?;
    let labels = align_labels(&ids, &labels)?;
    let (target, label_map) = create_target(&labels);
    log::info!("nb classes : {}", label_map.len());
    //
    let nb_folds = match matches.value_of("folds") {
        Some(_) => parse_value::<usize>(&matches, "folds")?,
        None => 10,
    };
    let seeds = parse_seeds(&matches)?;
    let solver_params = SolverParams::new(vec![1.], nb_folds).set_parallel(parallel);
    let evals: Vec<Box<dyn EvaluationFunction>> = vec![Box::new(Accuracy), Box::new(F1)];
    let mut matrices = IndexMap::new();
    matrices.insert(kernel_label, matrix);
    let mut experiment = KernelExperiment::new(matrices, target, solver_params, seeds, evals)?;
    experiment.set_computation_time(comp_time);
    experiment.run(&NearestMeanSolver)?;
    for result in experiment.get_results() {
        println!("{} : {:.3e}", result.get_label(), result.mean().unwrap_or(0.));
    }
    Ok(())
} // end of main
