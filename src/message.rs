use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single header pair as delivered by the mail provider.
/// Names are not normalized and may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// One node of a message's MIME body tree. A node with children is a
/// container; a node without children is a leaf whose `data`, when present,
/// is base64url-encoded content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub parts: Vec<BodyPart>,
}

/// A raw message handed to the scanner by the fetching collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<BodyPart>,
    #[serde(default)]
    pub snippet: String,
}

/// Build a case-insensitive header lookup. Duplicate names resolve
/// last-wins, matching a left-to-right reduce over the input order.
pub fn index_headers(headers: &[Header]) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(headers.len());
    for header in headers {
        index.insert(header.name.to_lowercase(), header.value.clone());
    }
    index
}

/// Parse a Date header value. RFC 2822 is what mail providers send; RFC 3339
/// is accepted as a fallback. Unparseable dates are simply absent.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(value.trim()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, value: &str) -> Header {
        Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_index_headers_case_insensitive() {
        let headers = vec![header("From", "a@example.com"), header("SUBJECT", "Hi")];
        let index = index_headers(&headers);
        assert_eq!(index.get("from").map(String::as_str), Some("a@example.com"));
        assert_eq!(index.get("subject").map(String::as_str), Some("Hi"));
        assert_eq!(index.get("date"), None);
    }

    #[test]
    fn test_index_headers_last_wins() {
        let headers = vec![
            header("X-Tag", "first"),
            header("x-tag", "second"),
            header("X-TAG", "third"),
        ];
        let index = index_headers(&headers);
        assert_eq!(index.get("x-tag").map(String::as_str), Some("third"));
    }

    #[test]
    fn test_parse_date_rfc2822() {
        let parsed = parse_date("Tue, 1 Jul 2025 10:52:37 +0200").unwrap();
        let expected = DateTime::parse_from_rfc3339("2025-07-01T10:52:37+02:00").unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_date_rfc3339_fallback() {
        assert!(parse_date("2025-07-01T10:52:37+02:00").is_some());
    }

    #[test]
    fn test_parse_date_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_message_deserializes_with_missing_fields() {
        let message: Message = serde_json::from_str("{}").unwrap();
        assert!(message.headers.is_empty());
        assert!(message.body.is_none());
        assert_eq!(message.snippet, "");
    }

    #[test]
    fn test_body_part_camel_case() {
        let part: BodyPart =
            serde_json::from_str(r#"{"mimeType":"text/plain","data":"SGVsbG8"}"#).unwrap();
        assert_eq!(part.mime_type, "text/plain");
        assert_eq!(part.data.as_deref(), Some("SGVsbG8"));
        assert!(part.parts.is_empty());
    }
}
