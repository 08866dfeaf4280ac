use base64::{engine::general_purpose, Engine as _};

use crate::message::BodyPart;

/// Upper bound on body-tree nodes visited per message. A malformed tree must
/// not keep the walk alive forever; anything past the budget is ignored.
const MAX_PARTS: usize = 10_000;

/// Wrap column for HTML rendering, wide enough that embedded URLs stay on
/// one line and remain extractable.
const HTML_RENDER_WIDTH: usize = 4096;

/// Flatten a message body tree into one searchable plain-text string.
///
/// Containers contribute their children in order, joined by newlines. Leaves
/// contribute their decoded content; HTML leaves are reduced to text content
/// only. A leaf that fails to decode contributes empty text so one malformed
/// part never suppresses the rest of the message.
pub fn linearize(root: &BodyPart) -> String {
    let mut texts: Vec<String> = Vec::new();
    let mut stack: Vec<&BodyPart> = vec![root];
    let mut visited = 0usize;

    while let Some(part) = stack.pop() {
        visited += 1;
        if visited > MAX_PARTS {
            log::debug!("body tree exceeded {MAX_PARTS} parts, truncating walk");
            break;
        }
        if !part.parts.is_empty() {
            for child in part.parts.iter().rev() {
                stack.push(child);
            }
            continue;
        }
        texts.push(leaf_text(part));
    }

    texts.join("\n")
}

fn leaf_text(part: &BodyPart) -> String {
    let Some(data) = part.data.as_deref() else {
        return String::new();
    };

    let bytes = match decode_base64url(data) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("failed to decode {} body part: {err}", part.mime_type);
            return String::new();
        }
    };

    let text = decode_text(&bytes);
    if part.mime_type.eq_ignore_ascii_case("text/html") {
        strip_html(&text)
    } else {
        text
    }
}

/// Decode base64url content (`-`/`_` alphabet). Padding and embedded
/// whitespace are tolerated.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut normalized: String = data
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    general_purpose::STANDARD.decode(normalized.as_bytes())
}

/// Strict UTF-8 first, then a byte-preserving Latin-1 fallback. This path
/// never fails.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn strip_html(html: &str) -> String {
    html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH)
        .unwrap_or_else(|_| html.to_string())
}
