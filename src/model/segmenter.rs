// File: ./src/model/segmenter.rs
//! Splits a raw capture into candidate strings.
//!
//! Separators are tried in a fixed order and the first one that yields a
//! clean split wins. Order of appearance in the source is always preserved.

/// Parts produced by the literal separators must be longer than this.
const MIN_PART_LEN: usize = 3;
/// Sentence splitting is only attempted on inputs longer than this.
const MIN_SENTENCE_INPUT_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    NewlineRun,
    Semicolon,
    CommaAnd,
    CommaThen,
    SentenceBoundary,
}

const SEPARATORS: [Separator; 5] = [
    Separator::NewlineRun,
    Separator::Semicolon,
    Separator::CommaAnd,
    Separator::CommaThen,
    Separator::SentenceBoundary,
];

impl Separator {
    fn split<'a>(&self, input: &'a str) -> Vec<&'a str> {
        match self {
            Separator::NewlineRun => input.split(['\n', '\r']).collect(),
            Separator::Semicolon => input.split(';').collect(),
            Separator::CommaAnd => input.split(", and").collect(),
            Separator::CommaThen => input.split(", then").collect(),
            Separator::SentenceBoundary => split_sentences(input),
        }
    }

    fn accepts(&self, input: &str, parts: &[&str]) -> bool {
        if parts.len() < 2 {
            return false;
        }
        if *self == Separator::SentenceBoundary && input.chars().count() <= MIN_SENTENCE_INPUT_LEN {
            return false;
        }
        parts.iter().all(|p| p.chars().count() > MIN_PART_LEN)
    }
}

/// Split after a run of `.`, `!` or `?` when whitespace and an uppercase
/// letter follow. The punctuation stays with the sentence it ends.
fn split_sentences(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let mut cut = idx + c.len_utf8();
        while let Some(&(i, p)) = chars.peek() {
            if matches!(p, '.' | '!' | '?') {
                cut = i + p.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let mut saw_space = false;
        let mut lookahead = chars.clone();
        while let Some(&(_, w)) = lookahead.peek() {
            if w.is_whitespace() {
                saw_space = true;
                lookahead.next();
            } else {
                break;
            }
        }
        if saw_space && lookahead.peek().is_some_and(|&(_, u)| u.is_uppercase()) {
            parts.push(&input[start..cut]);
            start = cut;
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Segment `input` into an ordered, never-empty list of trimmed candidates.
///
/// Whitespace-only input yields a single empty candidate so that later
/// stages always have something to work on.
pub fn segment(input: &str) -> Vec<String> {
    let trimmed = input.trim();

    for sep in SEPARATORS {
        let parts: Vec<&str> = sep
            .split(trimmed)
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if sep.accepts(trimmed, &parts) {
            log::debug!("Segmented input into {} parts via {:?}", parts.len(), sep);
            return parts.into_iter().map(str::to_string).collect();
        }
    }

    vec![trimmed.to_string()]
}
