//! Diagram element discovery in rendered HTML.
//!
//! A diagram element is a `<code>` element carrying a `language-<kind>` class
//! for an enabled [`DiagramLanguage`]. Its container is the element that
//! directly wraps it (usually `<pre>`), with only whitespace in between.

use std::ops::Range;
use std::sync::LazyLock;

use krokify_diagrams::DiagramLanguage;
use regex::Regex;

use crate::markup::text_content;

static CODE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<code(\s[^>]*)?>").unwrap());

static CODE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</code\s*>").unwrap());

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

static OPEN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*>$").unwrap());

/// A diagram code block found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramElement {
    /// Zero-based position among the diagram elements of the page.
    pub index: usize,
    pub language: DiagramLanguage,
    /// Text content of the element, passed to the renderer as-is.
    pub source: String,
    /// Byte range of the `<code>` element.
    pub element: Range<usize>,
    /// Byte range of the immediate container (equal to `element` when unwrapped).
    pub container: Range<usize>,
}

/// Find all diagram elements of the enabled languages, in document order.
///
/// Code blocks tagged with any other language are skipped.
#[must_use]
pub fn find_diagram_elements(html: &str, enabled: &[DiagramLanguage]) -> Vec<DiagramElement> {
    let mut elements = Vec::new();
    let mut pos = 0;

    while let Some(open) = CODE_OPEN_RE.captures_at(html, pos) {
        let Some(open_match) = open.get(0) else {
            break;
        };
        let Some(close) = CODE_CLOSE_RE.find_at(html, open_match.end()) else {
            break;
        };
        pos = close.end();

        let attrs = open.get(1).map_or("", |m| m.as_str());
        let Some(language) = class_language(attrs, enabled) else {
            continue;
        };

        let element = open_match.start()..close.end();
        let source = text_content(&html[open_match.end()..close.start()]);
        let container = find_container(html, &element).unwrap_or_else(|| element.clone());

        elements.push(DiagramElement {
            index: elements.len(),
            language,
            source,
            element,
            container,
        });
    }

    elements
}

/// Diagram language named by the first enabled `language-*` class token.
fn class_language(attrs: &str, enabled: &[DiagramLanguage]) -> Option<DiagramLanguage> {
    let caps = CLASS_ATTR_RE.captures(attrs)?;
    let classes = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str();
    classes
        .split_whitespace()
        .find_map(|token| DiagramLanguage::from_class(token).filter(|l| enabled.contains(l)))
}

/// Range of the element directly wrapping `element`, if there is one.
fn find_container(html: &str, element: &Range<usize>) -> Option<Range<usize>> {
    let before = html[..element.start].trim_end();
    if !before.ends_with('>') {
        return None;
    }
    let tag_start = before.rfind('<')?;
    let caps = OPEN_TAG_RE.captures(&before[tag_start..])?;
    let name = &caps[1];
    if before.ends_with("/>") {
        return None;
    }

    let after = &html[element.end..];
    let trimmed = after.trim_start();
    let close_start = element.end + (after.len() - trimmed.len());
    let close_len = closing_tag_len(trimmed, name)?;

    Some(tag_start..close_start + close_len)
}

/// Length of the closing tag for `name` at the start of `s`.
fn closing_tag_len(s: &str, name: &str) -> Option<usize> {
    let rest = s.strip_prefix("</")?;
    let tag = rest.get(..name.len())?;
    if !tag.eq_ignore_ascii_case(name) {
        return None;
    }
    let rest = &rest[name.len()..];
    let trimmed = rest.trim_start();
    trimmed.strip_prefix('>')?;
    Some(2 + name.len() + (rest.len() - trimmed.len()) + 1)
}
