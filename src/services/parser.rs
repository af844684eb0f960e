//! Suggestion text parsing.
//!
//! Generative backends are asked for a JSON array but routinely wrap it in
//! markdown fences or fall back to prose lists. Parsing runs an ordered
//! list of independent format matchers and takes the first one that yields
//! any drafts; an entry that matches no shape is skipped, never fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::models::SuggestionDraft;

/// Body of a markdown-fenced code block, json-tagged or bare
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced block regex should compile")
});

/// Bracketed JSON-array-of-objects substring inside surrounding prose
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("json array regex should compile")
});

/// `N. Title (YEAR) - explanation` with optional numbering and separator
static SUGGESTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]\s*)?(.+?)\s*\((\d{4})\)\s*(?:[-–—:]\s*)?(.*)$")
        .expect("suggestion line regex should compile")
});

/// Throwaway lead-in some models put before the actual rationale
static REASON_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^here'?s why (?:it'?s|this (?:movie )?is) similar[^:]*:\s*")
        .expect("reason preamble regex should compile")
});

type Matcher = fn(&str) -> Vec<SuggestionDraft>;

/// Format matchers in preference order; the JSON shape the backends are
/// asked for first, the prose-line shape as the tolerant fallback
const MATCHERS: &[Matcher] = &[match_json_array, match_suggestion_lines];

/// Parses raw generator text into suggestion drafts.
///
/// An empty result is a valid outcome meaning the text held no usable
/// entries in any known shape.
pub fn parse(raw: &str) -> Vec<SuggestionDraft> {
    for matcher in MATCHERS {
        let drafts = matcher(raw);
        if !drafts.is_empty() {
            return drafts;
        }
    }
    Vec::new()
}

/// Raw draft as deserialized from the generator's JSON output
#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default)]
    title: String,
    #[serde(default = "unknown_year", deserialize_with = "year_as_string")]
    year: String,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    reason: String,
}

fn unknown_year() -> String {
    "N/A".to_string()
}

/// Generators emit years as strings or bare numbers interchangeably
fn year_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => unknown_year(),
    })
}

impl From<RawDraft> for SuggestionDraft {
    fn from(raw: RawDraft) -> Self {
        SuggestionDraft {
            title: strip_emphasis(&raw.title),
            year: raw.year,
            director: raw.director.filter(|d| !d.trim().is_empty()),
            reason: strip_preamble(raw.reason.trim()),
        }
    }
}

/// Extracts and parses a JSON array of drafts, tolerating markdown fences
/// and surrounding prose
fn match_json_array(raw: &str) -> Vec<SuggestionDraft> {
    let candidate = FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .or_else(|| JSON_ARRAY.find(raw).map(|m| m.as_str()))
        .unwrap_or(raw);

    match serde_json::from_str::<Vec<RawDraft>>(candidate) {
        Ok(drafts) => drafts.into_iter().map(SuggestionDraft::from).collect(),
        Err(_) => Vec::new(),
    }
}

/// Parses numbered or newline-delimited `Title (YEAR) - explanation`
/// entries, skipping lines that match nothing
fn match_suggestion_lines(raw: &str) -> Vec<SuggestionDraft> {
    raw.lines()
        .filter_map(|line| {
            let line = strip_emphasis(line);
            let caps = SUGGESTION_LINE.captures(&line)?;
            let title = caps.get(1)?.as_str().trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(SuggestionDraft {
                title,
                year: caps.get(2)?.as_str().to_string(),
                director: None,
                reason: strip_preamble(caps.get(3).map_or("", |m| m.as_str()).trim()),
            })
        })
        .collect()
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "").trim().to_string()
}

fn strip_preamble(reason: &str) -> String {
    REASON_PREAMBLE.replace(reason, "").trim().to_string()
}
