use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, predicted: &[bool], actual: &[bool]) -> ClassifierMetrics {
        let support = predicted.len().min(actual.len());
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;

        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            match (p, a) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
                (false, false) => {}
            }
            if p == a {
                correct += 1;
            }
        }

        let precision = self.calculate_precision(tp, fp);
        let recall = self.calculate_recall(tp, fn_);

        ClassifierMetrics {
            accuracy: ratio(correct, support),
            precision,
            recall,
            f1_score: self.calculate_f1_score(precision, recall),
            support,
        }
    }

    pub fn calculate_precision(&self, tp: usize, fp: usize) -> f64 {
        ratio(tp, tp + fp)
    }

    pub fn calculate_recall(&self, tp: usize, fn_: usize) -> f64 {
        ratio(tp, tp + fn_)
    }

    pub fn calculate_f1_score(&self, precision: f64, recall: f64) -> f64 {
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
