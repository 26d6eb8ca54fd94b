//! Tree-based extraction over a `scraper` document

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::config::{ExtractorConfig, TextScope};
use super::error::ExtractError;
use super::rules::FormatRule;
use super::{FormattedText, TagMap, normalize_whitespace};

/// Tags skipped together with everything below them
const SKIPPED_SUBTREES: &[&str] = &["script", "style", "noscript"];

/// Document containers left out of the tag map; their children are still visited
const CONTAINERS: &[&str] = &["html", "head", "body"];

/// Inline tags that do not separate words when text is flattened
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "em", "i", "mark", "q", "s", "small", "span", "strong",
    "sub", "sup", "time", "u",
];

/// Key used for the meta description in the tag map
const META_DESCRIPTION_TAG: &str = "meta_description";

/// Extract a tag map from a whole document
///
/// The meta description, when present, is recorded first under
/// `meta_description`.
pub fn extract_text_by_tag(html: &str, config: &ExtractorConfig) -> Result<TagMap, ExtractError> {
    let document = Html::parse_document(html);
    let mut map = TagMap::new();

    if let Some(description) = meta_description(&document)? {
        map.push(META_DESCRIPTION_TAG, description);
    }

    let mut walk = Walk {
        scope: config.text_scope,
        containers: CONTAINERS,
        emit: |tag: &str, _rule: FormatRule, payload: String| map.push(tag, payload),
    };
    walk.children(document.root_element(), false);

    debug!("Extracted {} distinct tags", map.len());
    Ok(map)
}

/// Extract the labelled text document from the `<body>` of a page
pub fn extract_formatted_text(
    html: &str,
    config: &ExtractorConfig,
) -> Result<FormattedText, ExtractError> {
    let document = Html::parse_document(html);
    let mut out = String::new();

    if let Some(description) = meta_description(&document)? {
        FormatRule::MetaDescription.render_line(&description, &mut out);
    }

    let body_selector = Selector::parse("body")
        .map_err(|e| ExtractError::Selector(format!("Failed to parse body selector: {}", e)))?;
    let body = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut walk = Walk {
        scope: config.text_scope,
        containers: &[],
        emit: |_tag: &str, rule: FormatRule, payload: String| rule.render_line(&payload, &mut out),
    };
    walk.children(body, false);

    Ok(FormattedText::new(out.trim()))
}

fn meta_description(document: &Html) -> Result<Option<String>, ExtractError> {
    let selector = Selector::parse(r#"meta[name="description"][content]"#).map_err(|e| {
        ExtractError::Selector(format!("Failed to parse description selector: {}", e))
    })?;

    Ok(document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(normalize_whitespace)
        .filter(|content| !content.is_empty()))
}

/// Depth-first walk that hands each kept element to `emit`
struct Walk<'c, F> {
    scope: TextScope,
    containers: &'c [&'c str],
    emit: F,
}

impl<F> Walk<'_, F>
where
    F: FnMut(&str, FormatRule, String),
{
    fn children(&mut self, parent: ElementRef<'_>, in_list_item: bool) {
        for child in parent.children().filter_map(ElementRef::wrap) {
            let tag = child.value().name();
            if SKIPPED_SUBTREES.contains(&tag) {
                continue;
            }
            if !self.containers.contains(&tag) {
                self.element(child, tag, in_list_item);
            }
            self.children(child, in_list_item || tag == "li");
        }
    }

    fn element(&mut self, element: ElementRef<'_>, tag: &str, in_list_item: bool) {
        let rule = FormatRule::for_tag(tag);
        if in_list_item && rule.folds_into_list_item() {
            return;
        }

        let text = match (rule, self.scope) {
            (FormatRule::ListItem, _) => subtree_text(element, true),
            (_, TextScope::Direct) => direct_text(element),
            (_, TextScope::Full) => subtree_text(element, false),
        };
        if text.is_empty() && !rule.keeps_empty() {
            return;
        }

        let payload = rule.payload(&text, |name| element.value().attr(name));
        (self.emit)(tag, rule, payload);
    }
}

/// Text nodes that are immediate children of `element`
fn direct_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .children()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect();
    normalize_whitespace(&raw)
}

/// All text below `element`, optionally leaving out nested list items
fn subtree_text(element: ElementRef<'_>, skip_nested_items: bool) -> String {
    let mut raw = String::new();
    collect_text(element, skip_nested_items, &mut raw);
    normalize_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, skip_nested_items: bool, out: &mut String) {
    for node in element.children() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => {
                let name = child.name();
                if SKIPPED_SUBTREES.contains(&name) || (skip_nested_items && name == "li") {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(node) else {
                    continue;
                };
                let block = !INLINE_TAGS.contains(&name);
                if block {
                    out.push(' ');
                }
                collect_text(child_ref, skip_nested_items, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
