//! Property-based tests for kernel matrices and feature extraction.
//!
//! - Gram matrices are exactly symmetric, serial and parallel builds agree
//! - cosine normalization gives a unit diagonal (0 for empty graphs)
//! - permutations are reproducible and move labels with matrix rows and columns
//! - WL features do not depend on node or edge insertion order

use ndarray::Array2;
use proptest::prelude::*;

use graphkernel::prelude::*;

/// node labels, and edges (source, tag, target) with indices < nb nodes
type GraphDesc = (Vec<String>, Vec<(usize, String, usize)>);

fn arb_graph(max_nodes: usize) -> impl Strategy<Value = GraphDesc> {
    (0..=max_nodes).prop_flat_map(|nb_nodes| {
        let edges = if nb_nodes == 0 {
            Just(Vec::new()).boxed()
        } else {
            proptest::collection::vec((0..nb_nodes, "[pq]", 0..nb_nodes), 0..10).boxed()
        };
        (proptest::collection::vec("[a-c]", nb_nodes), edges)
    })
}

fn arb_batch() -> impl Strategy<Value = Vec<GraphDesc>> {
    proptest::collection::vec(arb_graph(5), 1..6)
}

fn build(desc: &GraphDesc) -> LabeledGraph {
    let mut builder = GraphBuilder::new();
    let nodes: Vec<_> = desc.0.iter().map(|l| builder.add_node(l.as_str())).collect();
    for (s, tag, t) in &desc.1 {
        builder.add_edge(nodes[*s], tag.as_str(), nodes[*t]);
    }
    builder.build()
}

// same graph, nodes and edges inserted in reverse order
fn build_reversed(desc: &GraphDesc) -> LabeledGraph {
    let nb_nodes = desc.0.len();
    let mut builder = GraphBuilder::new();
    let mut nodes = vec![None; nb_nodes];
    for i in (0..nb_nodes).rev() {
        nodes[i] = Some(builder.add_node(desc.0[i].as_str()));
    }
    for (s, tag, t) in desc.1.iter().rev() {
        if let (Some(s), Some(t)) = (nodes[*s], nodes[*t]) {
            builder.add_edge(s, tag.as_str(), t);
        }
    }
    builder.build()
}

fn sorted_entries(v: &SparseVector) -> Vec<(usize, f64)> {
    let mut entries: Vec<(usize, f64)> = v.iter().collect();
    entries.sort_by_key(|e| e.0);
    entries
}

mod gram_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn gram_is_symmetric(batch in arb_batch(), depth in 0usize..4, iterations in 0usize..4) {
            let graphs: GraphList = batch.iter().map(build).collect();
            let mut walk = WalkCountKernel::new(WalkCountParams::new(depth, false, false));
            let mut wl = WLSubTreeKernel::new(WLParams::new(iterations, true, false, false));
            for k in [walk.compute(&graphs).unwrap(), wl.compute(&graphs).unwrap()] {
                let n = graphs.len();
                prop_assert_eq!(k.dim(), (n, n));
                for i in 0..n {
                    prop_assert!(k[[i, i]] >= 0.);
                    for j in 0..n {
                        prop_assert_eq!(k[[i, j]], k[[j, i]]);
                    }
                }
            }
        }

        #[test]
        fn parallel_gram_equals_serial(batch in arb_batch(), depth in 0usize..3) {
            let graphs: GraphList = batch.iter().map(build).collect();
            let serial = WalkCountKernel::new(WalkCountParams::new(depth, true, false)).compute(&graphs).unwrap();
            let parallel = WalkCountKernel::new(WalkCountParams::new(depth, true, true)).compute(&graphs).unwrap();
            prop_assert_eq!(serial, parallel);
        }

        #[test]
        fn normalized_diagonal(batch in arb_batch(), iterations in 0usize..3) {
            let graphs: GraphList = batch.iter().map(build).collect();
            let k = WLSubTreeKernel::new(WLParams::new(iterations, false, true, false)).compute(&graphs).unwrap();
            for (i, desc) in batch.iter().enumerate() {
                if desc.0.is_empty() {
                    prop_assert_eq!(k[[i, i]], 0.);
                } else {
                    prop_assert!((k[[i, i]] - 1.).abs() < 1.0e-10);
                }
            }
        }
    }
} // end of mod gram_props

mod permutation_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn permutation_tracks_instances(n in 1usize..12, seed in any::<u64>()) {
            // entry (i,j) encodes the instance pair
            let matrix = Array2::from_shape_fn((n, n), |(i, j)| (i * 100 + j) as f64);
            let labels: Vec<usize> = (0..n).collect();
            let (m1, l1) = permute(&matrix, &labels, seed).unwrap();
            let (m2, l2) = permute(&matrix, &labels, seed).unwrap();
            prop_assert_eq!(&m1, &m2);
            prop_assert_eq!(&l1, &l2);
            for i in 0..n {
                for j in 0..n {
                    prop_assert_eq!(m1[[i, j]], matrix[[l1[i], l1[j]]]);
                }
            }
            let permutation = Permutation::from_seed(n, seed);
            let restored = permutation.inverse().apply_matrix(&m1).unwrap();
            prop_assert_eq!(restored, matrix);
        }
    }
} // end of mod permutation_props

mod wl_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn wl_ignores_insertion_order(desc in arb_graph(6), iterations in 0usize..4, reverse in any::<bool>()) {
            let graphs = GraphList::new(vec![build(&desc), build_reversed(&desc)]);
            let mut kernel = WLSubTreeKernel::new(WLParams::new(iterations, reverse, false, false));
            let fvs = kernel.compute_feature_vectors(&graphs).unwrap();
            prop_assert_eq!(sorted_entries(&fvs[0]), sorted_entries(&fvs[1]));
        }

        #[test]
        fn wl_gram_ignores_batch_order(batch in arb_batch(), iterations in 0usize..3) {
            let graphs: GraphList = batch.iter().map(build).collect();
            let reversed: GraphList = batch.iter().rev().map(build).collect();
            let params = WLParams::new(iterations, true, false, false);
            let k = WLSubTreeKernel::new(params).compute(&graphs).unwrap();
            let kr = WLSubTreeKernel::new(params).compute(&reversed).unwrap();
            let n = batch.len();
            for i in 0..n {
                for j in 0..n {
                    prop_assert_eq!(k[[i, j]], kr[[n - 1 - i, n - 1 - j]]);
                }
            }
        }
    }
} // end of mod wl_props
