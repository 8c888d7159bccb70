//! Class labels to numeric targets, class statistics and class filtering.
//!
//! Targets are f64 values 1., 2. ... as solvers expect them. Filtering functions return the indices
//! of the instances kept, to be applied to labels with [select] and to kernel matrices
//! with [sub_matrix](crate::matrix::sub_matrix).

use std::hash::Hash;

use indexmap::IndexMap;


/// numeric target, labels get 1., 2. ... in order of first appearance.
/// The map is reused so that a test set gets the same values as the train set, new labels being appended.
pub fn create_target_with_map<T>(labels: &[T], label_map: &mut IndexMap<T, f64>) -> Vec<f64>
where
    T: Eq + Hash + Clone,
{
    labels
        .iter()
        .map(|label| {
            let next = label_map.len() as f64 + 1.;
            *label_map.entry(label.clone()).or_insert(next)
        })
        .collect()
} // end of create_target_with_map


pub fn create_target<T>(labels: &[T]) -> (Vec<f64>, IndexMap<T, f64>)
where
    T: Eq + Hash + Clone,
{
    let mut label_map = IndexMap::new();
    let target = create_target_with_map(labels, &mut label_map);
    (target, label_map)
}


/// same as [create_target] but values follow the order of labels.
pub fn create_target_sorted<T>(labels: &[T]) -> (Vec<f64>, IndexMap<T, f64>)
where
    T: Eq + Hash + Clone + Ord,
{
    let mut sorted: Vec<&T> = labels.iter().collect();
    sorted.sort();
    sorted.dedup();
    let mut label_map: IndexMap<T, f64> = sorted
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), i as f64 + 1.))
        .collect();
    let target = create_target_with_map(labels, &mut label_map);
    (target, label_map)
}


/// (class, count) sorted by increasing class value
pub fn class_counts(target: &[f64]) -> Vec<(f64, usize)> {
    let mut counts = Vec::<(f64, usize)>::new();
    for t in target {
        match counts.iter_mut().find(|(c, _)| c == t) {
            Some((_, count)) => *count += 1,
            None => counts.push((*t, 1)),
        }
    }
    counts.sort_by(|a, b| a.0.total_cmp(&b.0));
    counts
} // end of class_counts


/// classes present in target, increasing order. To be used with [compute_weights]
pub fn compute_weight_labels(target: &[f64]) -> Vec<f64> {
    class_counts(target).into_iter().map(|(c, _)| c).collect()
}


/// inverse class frequency, in the order of [compute_weight_labels].
pub fn compute_weights(target: &[f64]) -> Vec<f64> {
    class_counts(target).into_iter().map(|(_, n)| 1. / n as f64).collect()
}


/// indices of instances whose class has at least min_size instances
pub fn remove_small_classes(target: &[f64], min_size: usize) -> Vec<usize> {
    let counts = class_counts(target);
    let kept: Vec<usize> = target
        .iter()
        .enumerate()
        .filter(|(_, t)| counts.iter().any(|(c, n)| c == *t && *n >= min_size))
        .map(|(i, _)| i)
        .collect();
    log::debug!("remove_small_classes kept {} instances out of {}", kept.len(), target.len());
    kept
}


/// indices of instances belonging to the nb_classes largest classes. Among classes of equal size the smallest values are kept.
pub fn keep_largest_classes(target: &[f64], nb_classes: usize) -> Vec<usize> {
    let mut counts = class_counts(target);
    // stable sort so equal sizes stay in increasing class order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(nb_classes);
    target
        .iter()
        .enumerate()
        .filter(|(_, t)| counts.iter().any(|(c, _)| c == *t))
        .map(|(i, _)| i)
        .collect()
}


pub fn select<T: Clone>(data: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|i| data[*i].clone()).collect()
}


// end of mod tests
