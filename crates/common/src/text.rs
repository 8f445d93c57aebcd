use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

pub const ELLIPSIS: &str = "...";

static MARKUP_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`]").expect("invalid regex"));

/// Drops heading, emphasis and code markers. Link brackets and other syntax
/// survive, so the result is plain text but not safe HTML.
pub fn strip_markup(input: &str) -> String {
    MARKUP_CHARS.replace_all(input, "").into_owned()
}

/// Plain-text preview of a Markdown body: the first `limit` characters with
/// markup stripped and whitespace trimmed, suffixed with `...` only when the
/// body was cut.
pub fn excerpt(body: Option<&str>, limit: usize) -> String {
    let body = match body {
        Some(body) if !body.is_empty() => body,
        _ => return String::new(),
    };

    let (head, truncated) = match body.char_indices().nth(limit) {
        Some((cut, _)) => (&body[..cut], true),
        None => (body, false),
    };

    let mut text = strip_markup(head).trim().to_string();
    if truncated {
        text.push_str(ELLIPSIS);
    }
    text
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
