// File: ./src/model/spatial.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const LOCATION_CONFIDENCE: f32 = 0.8;

/// Venue-type words recognised anywhere in the text, case-insensitively.
const KNOWN_VENUES: &[&str] = &[
    "WeWork",
    "Starbucks",
    "Office",
    "Home",
    "Gym",
    "Restaurant",
    "Cafe",
    "Coffee Shop",
    "Library",
    "School",
    "University",
    "Hospital",
    "Airport",
    "Park",
    "Mall",
    "Supermarket",
];

static PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:at|in|to|from)\s+([A-Z][\w'&-]*(?:\s+[A-Z][\w'&-]*)*)").expect("valid regex")
});
static AT_SIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\s*([A-Z][\w'&-]*(?:\s+[A-Z][\w'&-]*)*)").expect("valid regex"));
static VENUE_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = KNOWN_VENUES
        .iter()
        .map(|v| regex::escape(v).replace(' ', r"\s+"))
        .collect();
    Regex::new(&format!(r"(?i)\b({})\b", alternatives.join("|"))).expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialKind {
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialMatch {
    pub location: String,
    pub confidence: f32,
    #[serde(rename = "type")]
    pub kind: SpatialKind,
}

/// Find the single best location mention. Patterns are tried in order:
/// preposition + capitalized words, `@` + capitalized words, known venues.
pub fn extract_location(candidate: &str) -> Option<SpatialMatch> {
    let found = [&*PREPOSITION_RE, &*AT_SIGN_RE, &*VENUE_RE]
        .iter()
        .find_map(|re| re.captures(candidate).and_then(|c| c.get(1)))?;

    Some(SpatialMatch {
        location: found.as_str().to_string(),
        confidence: LOCATION_CONFIDENCE,
        kind: SpatialKind::Exact,
    })
}
