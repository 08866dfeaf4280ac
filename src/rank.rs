use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use url::Url;

use crate::body::linearize;
use crate::extract::{extract_codes, extract_links, CodeFormat};
use crate::message::{index_headers, parse_date, Message};
use crate::score::{is_domain_match, match_score};

const UNKNOWN_SENDER: &str = "Unknown sender";

/// A verification code attributed to the message it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCode {
    pub value: String,
    pub format: CodeFormat,
    pub from: String,
    pub subject: String,
    pub snippet: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// A verification link attributed to its message and scored against the
/// target domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLink {
    pub url: String,
    pub hostname: String,
    pub from: String,
    pub subject: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub match_score: f64,
    pub is_domain_match: bool,
}

/// Output of one scan: codes newest-first, links by relevance then recency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResults {
    pub codes: Vec<RankedCode>,
    pub links: Vec<RankedLink>,
}

/// Scan a batch of messages and rank everything found.
///
/// One pure transform per call: per message, headers are indexed, the body
/// is linearized, and subject + snippet + body text are scanned together.
/// Codes deduplicate batch-wide by `(value, sender)`, first occurrence wins.
/// Links that fail URL parsing are dropped with a warning; the rest of the
/// batch is unaffected. Both sorts are stable so equal keys keep encounter
/// order.
pub fn aggregate(messages: &[Message], target_domain: &str) -> ScanResults {
    let target = target_domain.trim().to_lowercase();

    let mut codes: Vec<RankedCode> = Vec::new();
    let mut seen_codes: HashSet<(String, String)> = HashSet::new();
    let mut links: Vec<RankedLink> = Vec::new();

    for message in messages {
        let headers = index_headers(&message.headers);
        let from = headers
            .get("from")
            .cloned()
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());
        let subject = headers.get("subject").cloned().unwrap_or_default();
        let timestamp = headers.get("date").and_then(|value| parse_date(value));
        let body_text = message
            .body
            .as_ref()
            .map(linearize)
            .unwrap_or_default();
        let combined = format!("{subject}\n{}\n{body_text}", message.snippet);

        for candidate in extract_codes(&combined) {
            if seen_codes.insert((candidate.value.clone(), from.clone())) {
                codes.push(RankedCode {
                    value: candidate.value,
                    format: candidate.format,
                    from: from.clone(),
                    subject: subject.clone(),
                    snippet: message.snippet.clone(),
                    timestamp,
                });
            }
        }

        for raw in extract_links(&combined) {
            let parsed = match Url::parse(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::warn!("skipping unparseable link {raw:?}: {err}");
                    continue;
                }
            };
            let hostname = parsed.host_str().unwrap_or("").to_lowercase();
            links.push(RankedLink {
                match_score: match_score(&hostname, &target),
                is_domain_match: is_domain_match(&hostname, &target),
                url: raw,
                hostname,
                from: from.clone(),
                subject: subject.clone(),
                timestamp,
            });
        }
    }

    // Option's ordering places None below any Some, so undated entries land
    // last under a descending sort.
    codes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    links.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    let mut seen_urls: HashSet<String> = HashSet::new();
    links.retain(|link| seen_urls.insert(link.url.clone()));

    ScanResults { codes, links }
}
