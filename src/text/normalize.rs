use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NEWLINE_MARKER: Regex = Regex::new(r"(?:<|&lt;)[nN](?:>|&gt;)").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips `<n>` markers left by the tokenizer and collapses all whitespace
/// runs to a single space.
pub fn normalize(text: &str) -> String {
    let text = NEWLINE_MARKER.replace_all(text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// How much shorter `generated` is than `original`, as a percentage rounded
/// to two decimals. Negative when the output grew.
pub fn compression_percentage(original: &str, generated: &str) -> f64 {
    let orig_len = word_count(original);
    if orig_len == 0 {
        return 0.0;
    }
    let gen_len = word_count(generated);
    let pct = (1.0 - gen_len as f64 / orig_len as f64) * 100.0;
    (pct * 100.0).round() / 100.0
}
