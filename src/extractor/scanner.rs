//! Manual scanner that rebuilds a tag map from raw markup without a tree
//!
//! The scanner trusts well-formed input. It rejects the two shapes it cannot
//! recover from, a tag missing its `>` and a closing tag with nothing open,
//! instead of guessing.

use tracing::debug;

use super::error::ExtractError;
use super::stack::TagStack;
use super::{TagMap, normalize_whitespace};

/// Elements that never take a closing tag, so they are not pushed
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching close tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Text under these tags is not recorded
const IGNORED_TEXT: &[&str] = &["script"];

/// Scan `html` left to right and attribute each text run to the innermost
/// open tag
pub fn scan_tag_map(html: &str) -> Result<TagMap, ExtractError> {
    let bytes = html.as_bytes();
    let mut stack = TagStack::new();
    let mut map = TagMap::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        if bytes[pos] != b'<' {
            let end = html[pos..].find('<').map_or(html.len(), |i| pos + i);
            record_text(&mut map, &stack, &html[pos..end]);
            pos = end;
            continue;
        }

        let rest = &html[pos..];
        if rest.starts_with("<!--") {
            let close = rest
                .find("-->")
                .ok_or(ExtractError::UnterminatedTag { offset: pos })?;
            pos += close + 3;
        } else if rest.starts_with("<!") {
            pos = tag_end(html, pos)? + 1;
        } else if rest.starts_with("</") {
            let end = tag_end(html, pos)?;
            stack
                .pop()
                .ok_or(ExtractError::UnbalancedClose { offset: pos })?;
            pos = end + 1;
        } else {
            let end = tag_end(html, pos)?;
            let inner = &html[pos + 1..end];
            let name = inner
                .split(|c: char| c.is_whitespace() || c == '/')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            pos = end + 1;

            let self_closing = inner.trim_end().ends_with('/');
            if name.is_empty() || self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }

            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                // Markup-looking text inside scripts must not be scanned as tags
                let close = find_ignore_case(html, pos, &format!("</{}", name))
                    .ok_or(ExtractError::UnterminatedTag { offset: pos })?;
                stack.push(name);
                record_text(&mut map, &stack, &html[pos..close]);
                pos = close;
            } else {
                stack.push(name);
            }
        }
    }

    debug!(
        "Scanned {} distinct tags, {} left open",
        map.len(),
        stack.depth()
    );
    Ok(map)
}

fn record_text(map: &mut TagMap, stack: &TagStack, raw: &str) {
    let text = normalize_whitespace(raw);
    if text.is_empty() {
        return;
    }
    match stack.peek() {
        Some(tag) if !IGNORED_TEXT.contains(&tag) => map.push(tag, text),
        _ => {}
    }
}

/// Byte offset of the `>` closing the tag that starts at `start`, skipping
/// over quoted attribute values
fn tag_end(html: &str, start: usize) -> Result<usize, ExtractError> {
    let mut quote: Option<u8> = None;
    for (i, &b) in html.as_bytes().iter().enumerate().skip(start + 1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Ok(i),
            (None, _) => {}
        }
    }
    Err(ExtractError::UnterminatedTag { offset: start })
}

fn find_ignore_case(html: &str, from: usize, needle: &str) -> Option<usize> {
    html[from..]
        .to_ascii_lowercase()
        .find(needle)
        .map(|i| from + i)
}
