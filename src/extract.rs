use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Shape of an extracted verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeFormat {
    Numeric,
    Alphanumeric,
}

impl std::fmt::Display for CodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeFormat::Numeric => write!(f, "numeric"),
            CodeFormat::Alphanumeric => write!(f, "alphanumeric"),
        }
    }
}

/// A code candidate extracted from one message, before attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCode {
    pub value: String,
    pub format: CodeFormat,
}

/// Anything longer than this after trimming is a tracking identifier or a
/// hash, not a code a human is expected to retype.
const MAX_CODE_LEN: usize = 12;

lazy_static! {
    // Ordered funnel: short numeric PINs, hyphen-grouped tokens, then bare
    // upper-case alphanumeric tokens.
    static ref CODE_PATTERNS: [(Regex, CodeFormat); 3] = [
        (Regex::new(r"\b\d{4,8}\b").unwrap(), CodeFormat::Numeric),
        (
            Regex::new(r"\b[A-Z0-9]{3,}-[A-Z0-9]{3,}\b").unwrap(),
            CodeFormat::Alphanumeric,
        ),
        (
            Regex::new(r"\b[A-Z0-9]{5,8}\b").unwrap(),
            CodeFormat::Alphanumeric,
        ),
    ];
    static ref LINK_PATTERN: Regex =
        Regex::new(r"(?i)https?://[\w.-]+(?:/[\w\-./?%&=+#]*)?").unwrap();
}

/// Extract candidate verification codes from text, deduplicated by value.
///
/// Patterns run in a fixed order and a later pattern re-tags an
/// identically-valued earlier candidate, except that the bare alphanumeric
/// pattern never claims pure digit runs; those belong to the numeric
/// pattern. First-occurrence order is preserved.
pub fn extract_codes(text: &str) -> Vec<CandidateCode> {
    let mut codes: Vec<CandidateCode> = Vec::new();
    let mut by_value: HashMap<String, usize> = HashMap::new();

    for (pattern, format) in CODE_PATTERNS.iter() {
        for found in pattern.find_iter(text) {
            let value = found.as_str().trim();
            if value.len() > MAX_CODE_LEN {
                continue;
            }
            if *format == CodeFormat::Alphanumeric
                && !value.contains('-')
                && value.bytes().all(|b| b.is_ascii_digit())
            {
                continue;
            }
            match by_value.get(value) {
                Some(&at) => codes[at].format = *format,
                None => {
                    by_value.insert(value.to_string(), codes.len());
                    codes.push(CandidateCode {
                        value: value.to_string(),
                        format: *format,
                    });
                }
            }
        }
    }

    codes
}

/// Extract absolute HTTP(S) URLs from text, trimming trailing bracket and
/// whitespace noise, deduplicated by exact string in first-seen order.
pub fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for found in LINK_PATTERN.find_iter(text) {
        let url = found
            .as_str()
            .trim_end_matches(|c: char| matches!(c, ')' | '>' | ']') || c.is_whitespace());
        if url.is_empty() {
            continue;
        }
        if seen.insert(url.to_string()) {
            links.push(url.to_string());
        }
    }

    links
}
