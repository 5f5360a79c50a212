// File: ./src/model/tags.rs
use once_cell::sync::Lazy;
use regex::Regex;

static URGENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(urgent|urgently|asap)\b").expect("valid regex"));
static GOAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(goals?|objectives?)\b").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExtraction {
    /// Candidate text with explicit `#tags` removed.
    pub content: String,
    /// Explicit tags in order of appearance, then inferred ones. No duplicates.
    pub tags: Vec<String>,
}

/// Returns the tag name if `word` is an explicit `#tag` token.
/// Trailing sentence punctuation is not part of the tag.
fn explicit_tag(word: &str) -> Option<&str> {
    let name = word
        .strip_prefix('#')?
        .trim_end_matches(['.', ',', ';', '!', '?']);
    let valid = !name.is_empty()
        && !name.starts_with('#')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'));
    valid.then_some(name)
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// Tags inferred from wording alone.
pub fn inferred_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if URGENT_RE.is_match(text) {
        tags.push("priority".to_string());
    }
    if GOAL_RE.is_match(text) {
        tags.push("goal".to_string());
    }
    tags
}

pub fn extract_tags(candidate: &str) -> TagExtraction {
    let mut tags = Vec::new();
    let mut words = Vec::new();

    for word in candidate.split_whitespace() {
        match explicit_tag(word) {
            Some(name) => push_unique(&mut tags, name),
            None => words.push(word),
        }
    }

    let content = if tags.is_empty() {
        candidate.trim().to_string()
    } else {
        words.join(" ")
    };

    for tag in inferred_tags(candidate) {
        push_unique(&mut tags, &tag);
    }

    TagExtraction { content, tags }
}

/// Normalizes user-supplied tags: strips leading `#`, drops empties, sorts and dedups.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|t| t.as_ref().trim().trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
