//! Load graph batches and class labels from csv files, dump kernel matrices to csv.
//!
//! Graph file : one record by node or edge, comma separated, lines beginning with # are skipped.
//!
//!  - `n,<graph id>,<node id>,<node label>`
//!  - `e,<graph id>,<source node id>,<edge tag>,<target node id>`
//!
//! A node must be declared before the edges using it. Graphs are numbered in order of first appearance of their id.
//!
//! Label file : records `<graph id>,<class>`.

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use indexmap::IndexMap;
use ndarray::Array2;
use petgraph::graph::NodeIndex;

use crate::error::{KernelError, Result};
use crate::graph::{GraphBuilder, GraphList};


fn open_reader(filepath: &Path) -> Result<csv::Reader<BufReader<std::fs::File>>> {
    let file = OpenOptions::new().read(true).open(filepath).map_err(|e| {
        log::error!("could not open file {:?}", filepath.as_os_str());
        e
    })?;
    let bufreader = BufReader::new(file);
    let rdr = ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(bufreader);
    Ok(rdr)
}


fn get_field<'a>(record: &'a StringRecord, rank: usize, nb_record: usize) -> Result<&'a str> {
    record
        .get(rank)
        .ok_or_else(|| KernelError::Parse(format!("record {} has no field {}", nb_record, rank + 1)))
}


// a graph being read, with the map from node ids of the file to node indices
struct GraphLoad {
    builder: GraphBuilder,
    nodes: IndexMap<String, NodeIndex>,
}


/// returns the graphs and their ids, in order of first appearance
pub fn graphs_from_csv(filepath: &Path) -> Result<(GraphList, Vec<String>)> {
    log::debug!("graphs_from_csv reading {:?}", filepath.as_os_str());
    let mut rdr = open_reader(filepath)?;
    let mut loads = IndexMap::<String, GraphLoad>::new();
    let mut nb_record = 0;
    let mut nb_edges = 0;
    for result in rdr.records() {
        let record = result?;
        nb_record += 1;
        let kind = get_field(&record, 0, nb_record)?;
        let expected = match kind {
            "n" => 4,
            "e" => 5,
            _ => {
                return Err(KernelError::Parse(format!(
                    "record {} : unknown record type {}",
                    nb_record, kind
                )))
            }
        };
        if record.len() != expected {
            return Err(KernelError::Parse(format!(
                "record {} has {} fields, expected {}",
                nb_record,
                record.len(),
                expected
            )));
        }
        let graph_id = get_field(&record, 1, nb_record)?;
        let load = loads.entry(graph_id.to_string()).or_insert_with(|| GraphLoad {
            builder: GraphBuilder::new(),
            nodes: IndexMap::new(),
        });
        if kind == "n" {
            let node_id = get_field(&record, 2, nb_record)?;
            if load.nodes.contains_key(node_id) {
                return Err(KernelError::Parse(format!(
                    "record {} : node {} declared twice in graph {}",
                    nb_record, node_id, graph_id
                )));
            }
            let node = load.builder.add_node(get_field(&record, 3, nb_record)?);
            load.nodes.insert(node_id.to_string(), node);
        } else {
            let node_of = |rank: usize| -> Result<NodeIndex> {
                let node_id = get_field(&record, rank, nb_record)?;
                load.nodes.get(node_id).copied().ok_or_else(|| {
                    KernelError::Parse(format!(
                        "record {} : undeclared node {} in graph {}",
                        nb_record, node_id, graph_id
                    ))
                })
            };
            let source = node_of(2)?;
            let target = node_of(4)?;
            load.builder.add_edge(source, get_field(&record, 3, nb_record)?, target);
            nb_edges += 1;
        }
    }
    log::info!(
        "graphs_from_csv nb records : {}, nb graphs : {}, nb edges : {}",
        nb_record,
        loads.len(),
        nb_edges
    );
    let ids: Vec<String> = loads.keys().cloned().collect();
    let graphs: GraphList = loads.into_iter().map(|(_, load)| load.builder.build()).collect();
    Ok((graphs, ids))
} // end of graphs_from_csv


/// graph id -> class, in file order
pub fn labels_from_csv(filepath: &Path) -> Result<IndexMap<String, String>> {
    let mut rdr = open_reader(filepath)?;
    let mut labels = IndexMap::<String, String>::new();
    let mut nb_record = 0;
    for result in rdr.records() {
        let record = result?;
        nb_record += 1;
        if record.len() != 2 {
            return Err(KernelError::Parse(format!("record {} has {} fields, expected 2", nb_record, record.len())));
        }
        let graph_id = get_field(&record, 0, nb_record)?;
        let class = get_field(&record, 1, nb_record)?;
        if let Some(previous) = labels.insert(graph_id.to_string(), class.to_string()) {
            log::debug!("labels_from_csv graph {} relabeled from {} to {}", graph_id, previous, class);
        }
    }
    log::debug!("labels_from_csv read {} labels", labels.len());
    Ok(labels)
} // end of labels_from_csv


/// class of each graph id, fails if one id has no label
pub fn align_labels(ids: &[String], labels: &IndexMap<String, String>) -> Result<Vec<String>> {
    ids.iter()
        .map(|id| {
            labels
                .get(id)
                .cloned()
                .ok_or_else(|| KernelError::Parse(format!("no label for graph {}", id)))
        })
        .collect()
}


/// one line per row, no header
pub fn kernel_matrix_to_csv(filepath: &Path, matrix: &Array2<f64>) -> Result<()> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(filepath)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(BufWriter::new(file));
    for row in matrix.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    log::info!("kernel_matrix_to_csv dumped ({}, {}) matrix in {:?}", matrix.nrows(), matrix.ncols(), filepath.as_os_str());
    Ok(())
} // end of kernel_matrix_to_csv


// end of mod tests
