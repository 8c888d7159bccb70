//! Evaluation functions comparing predicted labels to the target, and their accumulation over repetitions.

use serde::{Deserialize, Serialize};

use super::target::class_counts;


pub trait EvaluationFunction: Send + Sync {
    /// target and prediction are aligned, instance by instance.
    fn compute_score(&self, target: &[f64], prediction: &[f64]) -> f64;
    fn higher_is_better(&self) -> bool;
    fn get_label(&self) -> String;

    /// true if score strictly improves on reference
    fn is_better(&self, score: f64, reference: f64) -> bool {
        if self.higher_is_better() {
            score > reference
        } else {
            score < reference
        }
    }
} // end of trait EvaluationFunction


/// fraction of exact predictions. 0 for empty input.
#[derive(Copy, Clone, Debug, Default)]
pub struct Accuracy;

impl EvaluationFunction for Accuracy {
    fn compute_score(&self, target: &[f64], prediction: &[f64]) -> f64 {
        if target.is_empty() {
            return 0.;
        }
        let nb_ok = target.iter().zip(prediction.iter()).filter(|(t, p)| t == p).count();
        nb_ok as f64 / target.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn get_label(&self) -> String {
        String::from("Accuracy")
    }
}


/// F1 macro averaged over the classes present in target.
/// A class with no true positive has F1 = 0.
#[derive(Copy, Clone, Debug, Default)]
pub struct F1;

impl EvaluationFunction for F1 {
    fn compute_score(&self, target: &[f64], prediction: &[f64]) -> f64 {
        let classes = class_counts(target);
        if classes.is_empty() {
            return 0.;
        }
        let mut f1_sum = 0.;
        for (class, _) in &classes {
            let (mut tp, mut fp, mut fneg) = (0usize, 0usize, 0usize);
            for (t, p) in target.iter().zip(prediction.iter()) {
                match (t == class, p == class) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fneg += 1,
                    (false, false) => (),
                }
            }
            if tp > 0 {
                let precision = tp as f64 / (tp + fp) as f64;
                let recall = tp as f64 / (tp + fneg) as f64;
                f1_sum += 2. * precision * recall / (precision + recall);
            }
        }
        f1_sum / classes.len() as f64
    } // end of compute_score

    fn higher_is_better(&self) -> bool {
        true
    }

    fn get_label(&self) -> String {
        String::from("F1")
    }
}


//==================================================================================


/// scores of one evaluation function (or of a measured quantity such as computation time), one score per repetition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    label: String,
    scores: Vec<f64>,
}

impl EvalResult {
    pub fn new(label: impl Into<String>) -> Self {
        EvalResult {
            label: label.into(),
            scores: Vec::new(),
        }
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn get_scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn add_score(&mut self, score: f64) {
        self.scores.push(score)
    }

    /// appends the scores of another repetition of the same measure
    pub fn add_result(&mut self, other: &EvalResult) {
        if other.label != self.label {
            log::debug!("EvalResult::add_result merging {} into {}", other.label, self.label);
        }
        self.scores.extend_from_slice(&other.scores)
    }

    /// None if there is no score
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            None
        } else {
            Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
        }
    }
} // end of impl EvalResult


// end of mod tests
