//! Markup produced and consumed by page processing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Class of the container that replaces a rendered diagram's code block.
pub const DIAGRAM_CLASS: &str = "kroki-diagram";

/// Notice inserted before a code block whose diagram failed to render.
pub const ERROR_NOTICE: &str = concat!(
    r#"<div class="admonition error">"#,
    r#"<p class="admonition-title">Diagram Rendering Error</p>"#,
    "<p>Failed to render diagram. Check if Kroki service is running.</p>",
    "</div>",
);

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").unwrap()
});

/// Wrap rendered markup in a diagram container.
///
/// The markup is inserted verbatim. Kroki output is trusted and not sanitized.
#[must_use]
pub fn diagram_container(markup: &str) -> String {
    format!(r#"<div class="{DIAGRAM_CLASS}">{markup}</div>"#)
}

/// Text content of an HTML fragment: tags stripped, entities decoded.
///
/// Each character reference is decoded on its own. Unknown references and
/// stray `&` stay as written without affecting the rest of the text.
#[must_use]
pub fn text_content(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, "");
    ENTITY_RE
        .replace_all(&stripped, |caps: &Captures<'_>| {
            let entity = &caps[0];
            decode_entity(entity).unwrap_or_else(|| entity.to_owned())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    // Not in the HTML4 table
    if entity == "&apos;" {
        return Some("'".to_owned());
    }
    htmlescape::decode_html(entity).ok()
}
