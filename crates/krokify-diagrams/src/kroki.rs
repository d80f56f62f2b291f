//! Kroki HTTP client.
//!
//! Diagram source is sent as the body of `POST {server}/{endpoint}/svg` with a
//! `text/plain` content type; the response body is the rendered SVG.
//!
//! The client sits behind the [`RenderService`] trait so page processing can be
//! exercised against a stub service.

use std::time::Duration;

use ureq::Agent;

use crate::consts::SVG_FORMAT;
use crate::language::DiagramLanguage;

/// Renders diagram source to SVG markup.
pub trait RenderService: Send + Sync {
    /// Render `source` as a diagram of the given language.
    ///
    /// The source is opaque: it is passed to the renderer unmodified.
    fn render_svg(
        &self,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<String, DiagramErrorKind>;
}

/// Single diagram rendering error.
#[derive(Debug, thiserror::Error)]
#[error("diagram {index} ({language}): {kind}")]
pub struct DiagramError {
    /// Zero-based position of the diagram within its page.
    pub index: usize,
    pub language: DiagramLanguage,
    pub kind: DiagramErrorKind,
}

/// Kind of diagram rendering error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramErrorKind {
    /// Connection, DNS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be used as markup.
    #[error("invalid response body: {0}")]
    Body(String),
}

/// Create HTTP agent with an optional global timeout.
///
/// Without a timeout, requests wait as long as the transport allows.
pub fn create_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`RenderService`] backed by a Kroki server.
///
/// The agent is reused across calls for connection pooling.
pub struct KrokiClient {
    server_url: String,
    agent: Agent,
}

impl KrokiClient {
    /// Create a client for the given Kroki server URL (e.g. `http://localhost:8001`).
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            agent: create_agent(None),
        }
    }

    /// Set a global timeout for each request.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Server URL without trailing slash.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Endpoint URL for rendering the given language to SVG.
    #[must_use]
    pub fn svg_url(&self, language: DiagramLanguage) -> String {
        format!(
            "{}/{}/{SVG_FORMAT}",
            self.server_url,
            language.kroki_endpoint()
        )
    }
}

impl RenderService for KrokiClient {
    fn render_svg(
        &self,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<String, DiagramErrorKind> {
        let url = self.svg_url(language);
        tracing::debug!(%url, bytes = source.len(), "Sending diagram to Kroki");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| DiagramErrorKind::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let mut body = response.into_body();

        if !(200..300).contains(&status) {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramErrorKind::Status {
                status,
                body: error_body,
            });
        }

        if let Some(content_type) = content_type.as_deref()
            && !is_textual(content_type)
        {
            return Err(DiagramErrorKind::Body(format!(
                "unexpected content type {content_type}"
            )));
        }

        let data = body
            .read_to_vec()
            .map_err(|e| DiagramErrorKind::Body(e.to_string()))?;
        String::from_utf8(data)
            .map_err(|e| DiagramErrorKind::Body(format!("invalid UTF-8: {e}")))
    }
}

/// Whether a content type carries markup we can inline.
fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.ends_with("+xml") || mime.ends_with("/xml")
}
