//! ROUGE-1, ROUGE-2 and ROUGE-L F-measures between a reference text and a
//! generated one. Tokens are lowercased alphanumeric runs; tokens longer than
//! three characters are stemmed.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;

use super::readability::Band;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Metric name to F-measure, e.g. `"rouge1" -> 0.42`.
pub type RougeScores = BTreeMap<String, f64>;

/// One plotted ROUGE metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RougePoint {
    pub metric: String,
    pub value: f64,
    pub band: Band,
}

/// Scores as a chart series in metric order, each with its colour band.
pub fn series(scores: &RougeScores) -> Vec<RougePoint> {
    scores
        .iter()
        .map(|(metric, &value)| RougePoint {
            metric: metric.clone(),
            value,
            band: Band::for_overlap(value),
        })
        .collect()
}

pub fn tokenize(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let lower = text.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, " ")
        .split_whitespace()
        .map(|t| {
            if t.len() > 3 {
                stemmer.stem(t).into_owned()
            } else {
                t.to_string()
            }
        })
        .collect()
}

/// Scores `generated` against `reference`. Empty when either side has no
/// scorable tokens.
pub fn score(reference: &str, generated: &str) -> RougeScores {
    let stemmer = Stemmer::create(Algorithm::English);
    let target = tokenize(reference, &stemmer);
    let prediction = tokenize(generated, &stemmer);

    let mut scores = RougeScores::new();
    if target.is_empty() || prediction.is_empty() {
        return scores;
    }
    scores.insert("rouge1".into(), ngram_f1(&target, &prediction, 1));
    scores.insert("rouge2".into(), ngram_f1(&target, &prediction, 2));
    scores.insert("rougeL".into(), lcs_f1(&target, &prediction));
    scores
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

fn ngram_f1(target: &[String], prediction: &[String], n: usize) -> f64 {
    let target_counts = ngram_counts(target, n);
    let prediction_counts = ngram_counts(prediction, n);
    let overlap: usize = target_counts
        .iter()
        .map(|(gram, &c)| c.min(prediction_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let target_total: usize = target_counts.values().sum();
    let prediction_total: usize = prediction_counts.values().sum();
    f1(overlap, prediction_total, target_total)
}

fn lcs_f1(target: &[String], prediction: &[String]) -> f64 {
    f1(lcs_len(target, prediction), prediction.len(), target.len())
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn f1(overlap: usize, prediction_total: usize, target_total: usize) -> f64 {
    if overlap == 0 || prediction_total == 0 || target_total == 0 {
        return 0.0;
    }
    let precision = overlap as f64 / prediction_total as f64;
    let recall = overlap as f64 / target_total as f64;
    2.0 * precision * recall / (precision + recall)
}
