//! Grade-level readability metrics.
//!
//! Flesch-Kincaid grade, Gunning Fog and SMOG, computed from word, sentence
//! and syllable counts. Syllables are estimated from vowel groups, which is
//! close enough for grade-level bucketing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::outcome::{EmptyReason, Outcome};

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref SILENT_SUFFIX: Regex = Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").unwrap();
    static ref LEADING_Y: Regex = Regex::new(r"^y").unwrap();
    static ref VOWEL_GROUP: Regex = Regex::new(r"[aeiouy]{1,2}").unwrap();
}

/// Below this many words SMOG is unreliable and gets clamped.
const SMALL_SAMPLE_WORDS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    FleschKincaid,
    GunningFog,
    Smog,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::FleschKincaid => "Flesch-Kincaid Grade",
            Metric::GunningFog => "Gunning Fog Index",
            Metric::Smog => "SMOG Index",
        }
    }

    /// Short label for chart axes.
    pub fn label(self) -> &'static str {
        match self {
            Metric::FleschKincaid => "Flesch-Kincaid",
            Metric::GunningFog => "Gunning Fog",
            Metric::Smog => "SMOG",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn from_grade(grade: f64) -> Self {
        if grade <= 4.0 {
            DifficultyLevel::Beginner
        } else if grade <= 8.0 {
            DifficultyLevel::Intermediate
        } else {
            DifficultyLevel::Advanced
        }
    }
}

/// Colour band for plotting a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Orange,
    Red,
}

impl Band {
    /// Overlap scores in 0..=1: above 0.5 green, above 0.3 orange.
    pub fn for_overlap(score: f64) -> Self {
        if score > 0.5 {
            Band::Green
        } else if score > 0.3 {
            Band::Orange
        } else {
            Band::Red
        }
    }

    fn for_grade(grade: f64) -> Self {
        match DifficultyLevel::from_grade(grade) {
            DifficultyLevel::Beginner => Band::Green,
            DifficultyLevel::Intermediate => Band::Orange,
            DifficultyLevel::Advanced => Band::Red,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricScore {
    pub metric: Metric,
    pub name: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub band: Band,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadabilityReport {
    pub scores: Vec<MetricScore>,
    pub average: f64,
    pub level: DifficultyLevel,
    pub word_count: usize,
    pub sentence_count: usize,
}

impl ReadabilityReport {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.scores.iter().find(|s| s.metric == metric).map(|s| s.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextCounts {
    words: usize,
    sentences: usize,
    syllables: usize,
    polysyllables: usize,
}

pub fn assess(text: &str) -> Outcome<ReadabilityReport> {
    let text = crate::text::normalize(text);
    if text.is_empty() {
        return Outcome::Empty(EmptyReason::BlankInput);
    }
    let Some(counts) = count(&text) else {
        return Outcome::Empty(EmptyReason::NoWords);
    };

    // clamp applies to the reported, rounded values
    let fk = round2(flesch_kincaid_grade(&counts));
    let fog = round2(gunning_fog(&counts));
    let mut smog = round2(smog_index(&counts));
    if counts.words < SMALL_SAMPLE_WORDS {
        smog = smog.min(floor2_at_most((fk + fog) / 2.0));
    }

    let values = [
        (Metric::FleschKincaid, fk),
        (Metric::GunningFog, fog),
        (Metric::Smog, smog),
    ];
    if values.iter().any(|(_, v)| !v.is_finite()) {
        return Outcome::Empty(EmptyReason::NoWords);
    }

    let average = (fk + fog + smog) / 3.0;
    let scores = values
        .into_iter()
        .map(|(metric, value)| MetricScore {
            metric,
            name: metric.name(),
            label: metric.label(),
            value,
            band: Band::for_grade(value),
        })
        .collect();

    Outcome::Ready(ReadabilityReport {
        scores,
        average: round2(average),
        level: DifficultyLevel::from_grade(average),
        word_count: counts.words,
        sentence_count: counts.sentences,
    })
}

/// Largest two-decimal value not above `x`.
fn floor2_at_most(x: f64) -> f64 {
    let mut v = (x * 100.0).floor() / 100.0;
    while v > x {
        v = round2(v - 0.01);
    }
    v
}

fn count(text: &str) -> Option<TextCounts> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    let sentences = SENTENCE_END
        .split(text)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
        .max(1);

    let mut syllables = 0;
    let mut polysyllables = 0;
    for w in &words {
        let n = count_syllables(w);
        syllables += n;
        if n >= 3 {
            polysyllables += 1;
        }
    }

    Some(TextCounts {
        words: words.len(),
        sentences,
        syllables,
        polysyllables,
    })
}

pub fn count_syllables(word: &str) -> usize {
    let word: String = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if word.len() <= 3 {
        return 1;
    }
    let word = SILENT_SUFFIX.replace(&word, "");
    let word = LEADING_Y.replace(&word, "");
    VOWEL_GROUP.find_iter(&word).count().max(1)
}

fn flesch_kincaid_grade(c: &TextCounts) -> f64 {
    let asl = c.words as f64 / c.sentences as f64;
    let asw = c.syllables as f64 / c.words as f64;
    0.39 * asl + 11.8 * asw - 15.59
}

fn gunning_fog(c: &TextCounts) -> f64 {
    let asl = c.words as f64 / c.sentences as f64;
    let complex = c.polysyllables as f64 / c.words as f64 * 100.0;
    0.4 * (asl + complex)
}

fn smog_index(c: &TextCounts) -> f64 {
    if c.sentences < 3 {
        return 0.0;
    }
    1.043 * (c.polysyllables as f64 * (30.0 / c.sentences as f64)).sqrt() + 3.1291
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "The cat sat on the mat. The dog ran to the park. We like to play in the sun. \
        I see a big red ball. She has a hat and a cup. He can run fast. It is a good day for us. \
        Mom and Dad are home now.";

    const DENSE: &str = "Institutional accountability necessitates comprehensive organizational \
        evaluation of administrative responsibilities. Consequently, interdisciplinary \
        collaboration facilitates sophisticated methodological innovation. Furthermore, \
        international regulatory harmonization requires considerable diplomatic negotiation.";

    #[test]
    fn syllable_estimates() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("water"), 2);
        assert_eq!(count_syllables("banana"), 3);
        assert!(count_syllables("organization") >= 4);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(matches!(assess("  \n <n> "), Outcome::Empty(EmptyReason::BlankInput)));
        assert!(matches!(assess(""), Outcome::Empty(EmptyReason::BlankInput)));
    }

    #[test]
    fn punctuation_only_has_no_words() {
        assert!(matches!(assess("... !!! ??"), Outcome::Empty(EmptyReason::NoWords)));
    }

    #[test]
    fn short_simple_text_is_beginner() {
        let report = assess(SIMPLE).ready().expect("report");
        assert!(report.word_count < 50);
        assert!(report.scores.iter().all(|s| s.value <= 4.0));
        assert_eq!(report.level, DifficultyLevel::Beginner);
        assert_eq!(report.scores.len(), 3);
        assert!(report.scores.iter().all(|s| s.band == Band::Green));
    }

    #[test]
    fn smog_clamped_below_fifty_words() {
        for text in [SIMPLE, DENSE] {
            let r = assess(text).ready().expect("report");
            assert!(r.word_count < 50);
            let fk = r.value(Metric::FleschKincaid).unwrap();
            let fog = r.value(Metric::GunningFog).unwrap();
            let smog = r.value(Metric::Smog).unwrap();
            assert!(smog <= (fk + fog) / 2.0, "{} > avg({}, {})", smog, fk, fog);
        }
    }

    #[test]
    fn reported_smog_respects_clamp_after_rounding() {
        let words = ["run", "sat", "cat", "the", "happily", "institution", "beautiful", "water"];
        let mut texts = vec![
            "run sat cat cat. sat the happily institution run beautiful cat. the. water cat.".to_string(),
        ];
        for i in 0..400usize {
            let text: Vec<String> = (0..(5 + i % 40))
                .map(|j| {
                    let w = words[(i * 7 + j * 3 + j * j) % words.len()];
                    if (i + j) % 4 == 3 { format!("{}.", w) } else { w.to_string() }
                })
                .collect();
            texts.push(text.join(" "));
        }
        for text in texts {
            let Some(r) = assess(&text).ready() else { continue };
            if r.word_count >= 50 {
                continue;
            }
            let fk = r.value(Metric::FleschKincaid).unwrap();
            let fog = r.value(Metric::GunningFog).unwrap();
            let smog = r.value(Metric::Smog).unwrap();
            assert!(smog <= (fk + fog) / 2.0, "{text}: {} > avg({}, {})", smog, fk, fog);
        }
    }

    #[test]
    fn two_decimal_floor_never_exceeds_input() {
        assert_eq!(floor2_at_most(7.565), 7.56);
        assert_eq!(floor2_at_most(3.0), 3.0);
        assert!(floor2_at_most(-1.234) <= -1.234);
    }

    #[test]
    fn dense_text_is_advanced() {
        let r = assess(DENSE).ready().expect("report");
        assert_eq!(r.level, DifficultyLevel::Advanced);
        assert_eq!(r.sentence_count, 3);
    }

    #[test]
    fn tiers_follow_average() {
        assert_eq!(DifficultyLevel::from_grade(4.0), DifficultyLevel::Beginner);
        assert_eq!(DifficultyLevel::from_grade(4.01), DifficultyLevel::Intermediate);
        assert_eq!(DifficultyLevel::from_grade(8.0), DifficultyLevel::Intermediate);
        assert_eq!(DifficultyLevel::from_grade(8.5), DifficultyLevel::Advanced);
    }

    #[test]
    fn report_serializes_plottable_series() {
        let r = assess(SIMPLE).ready().unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["level"], "Beginner");
        assert_eq!(json["scores"][2]["label"], "SMOG");
        assert_eq!(json["scores"][0]["band"], "green");
    }
}
