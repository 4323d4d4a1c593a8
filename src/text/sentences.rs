use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOUNDARY: Regex = Regex::new(r"[.!?] +").unwrap();
    static ref TRAILING_DOTS: Regex = Regex::new(r"\.\.+$").unwrap();
}

/// Splits after `.`, `!` or `?` when followed by at least one space.
/// Empty pieces are dropped and each sentence keeps its terminator.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in BOUNDARY.find_iter(text) {
        // terminator is a single ASCII byte
        push_trimmed(&mut sentences, &text[start..m.start() + 1]);
        start = m.end();
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// Collapses a trailing run of dots (`"end..."`) to a single one.
pub fn strip_trailing_dots(text: &str) -> String {
    TRAILING_DOTS.replace(text, ".").trim().to_string()
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}
