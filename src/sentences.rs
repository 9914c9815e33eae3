//! Sentence segmentation.
//!
//! Boundaries come from Unicode sentence bounds (UAX #29). UAX #29 also
//! breaks after every line break and after "Dr." when the next word is
//! capitalised, so a piece that does not end in terminal punctuation, or
//! that ends in a known abbreviation, is glued onto the piece that follows.

use unicode_segmentation::UnicodeSegmentation;

/// Lowercased abbreviations that never end a sentence on their own.
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "mt.", "vs.", "e.g.", "i.e.",
    "cf.", "approx.", "fig.", "no.", "vol.", "inc.", "ltd.", "co.", "corp.", "jan.", "feb.",
    "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.", "dec.",
];

/// Split `text` into trimmed, non-empty sentences in document order.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut pending: Option<String> = None;

    for piece in text.split_sentence_bounds() {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }

        let sentence = match pending.take() {
            Some(prefix) => format!("{prefix} {piece}"),
            None => piece.to_string(),
        };

        if !ends_with_terminator(&sentence) || ends_with_abbreviation(&sentence) {
            pending = Some(sentence);
        } else {
            sentences.push(sentence);
        }
    }

    if let Some(rest) = pending {
        sentences.push(rest);
    }

    sentences
}

/// Closing quotes and brackets that may follow the terminal punctuation.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{BB}'];

fn ends_with_terminator(sentence: &str) -> bool {
    matches!(
        sentence.trim_end_matches(CLOSERS).chars().last(),
        Some('.' | '!' | '?' | '\u{2026}')
    )
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    let Some(last) = sentence.split_whitespace().last() else {
        return false;
    };
    let last = last.trim_start_matches(|c: char| c == '(' || c == '"' || c == '\'');
    ABBREVIATIONS.iter().any(|a| last.eq_ignore_ascii_case(a))
}
