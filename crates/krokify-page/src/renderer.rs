//! Per-page diagram rendering.
//!
//! [`DiagramRenderer`] finds the diagram elements of a page, renders each one
//! through a [`RenderService`] and rewrites the page:
//!
//! - success: the element's container is replaced by
//!   `<div class="kroki-diagram">` holding the returned markup verbatim
//! - failure: the element stays and an error notice is inserted right before
//!   its container
//!
//! Elements render concurrently on the rayon global pool. Each yields its own
//! result, so one failure never changes the outcome of another.

use krokify_diagrams::{DiagramError, DiagramLanguage, RenderService};
use rayon::prelude::*;

use crate::element::{DiagramElement, find_diagram_elements};
use crate::markup::{ERROR_NOTICE, diagram_container};

/// Outcome of processing a single diagram element.
#[derive(Debug)]
pub enum ElementOutcome {
    /// The container was replaced by the rendered diagram.
    Replaced {
        index: usize,
        language: DiagramLanguage,
    },
    /// Rendering failed and an error notice was inserted.
    Errored(DiagramError),
}

impl ElementOutcome {
    /// Zero-based position of the element within its page.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Replaced { index, .. } => *index,
            Self::Errored(e) => e.index,
        }
    }

    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Result of rendering all diagrams of a page.
#[derive(Debug)]
pub struct RenderedPage {
    /// Page HTML after replacements and notices.
    pub html: String,
    /// One outcome per diagram element, in document order.
    pub outcomes: Vec<ElementOutcome>,
}

impl RenderedPage {
    /// Whether processing modified the page.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// Number of diagrams replaced by rendered markup.
    #[must_use]
    pub fn replaced(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_replaced()).count()
    }

    /// Number of diagrams that failed to render.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.outcomes.len() - self.replaced()
    }
}

/// Renders the diagram elements of HTML pages.
///
/// # Example
///
/// ```ignore
/// use krokify_diagrams::KrokiClient;
/// use krokify_page::DiagramRenderer;
///
/// let renderer = DiagramRenderer::new(Box::new(KrokiClient::new("http://localhost:8001")));
/// let page = renderer.render_page(&html);
/// std::fs::write(path, page.html)?;
/// ```
pub struct DiagramRenderer {
    service: Box<dyn RenderService>,
    languages: Vec<DiagramLanguage>,
}

impl DiagramRenderer {
    /// Create a renderer for `PlantUML` and Mermaid code blocks.
    #[must_use]
    pub fn new(service: Box<dyn RenderService>) -> Self {
        Self {
            service,
            languages: DiagramLanguage::DEFAULT_ENABLED.to_vec(),
        }
    }

    /// Set the diagram languages recognized on pages.
    #[must_use]
    pub fn languages(mut self, languages: &[DiagramLanguage]) -> Self {
        self.languages = languages.to_vec();
        self
    }

    /// Diagram languages recognized on pages.
    #[must_use]
    pub fn enabled_languages(&self) -> &[DiagramLanguage] {
        &self.languages
    }

    /// Find the diagram elements of a page.
    #[must_use]
    pub fn find_elements(&self, html: &str) -> Vec<DiagramElement> {
        find_diagram_elements(html, &self.languages)
    }

    /// Render a single element.
    pub fn render(&self, element: &DiagramElement) -> Result<String, DiagramError> {
        self.service
            .render_svg(element.language, &element.source)
            .map_err(|kind| DiagramError {
                index: element.index,
                language: element.language,
                kind,
            })
    }

    /// Render every diagram element of a page and return the rewritten page.
    #[must_use]
    pub fn render_page(&self, html: &str) -> RenderedPage {
        let elements = self.find_elements(html);
        if elements.is_empty() {
            return RenderedPage {
                html: html.to_owned(),
                outcomes: Vec::new(),
            };
        }

        let results: Vec<Result<String, DiagramError>> =
            elements.par_iter().map(|e| self.render(e)).collect();

        // Containers are disjoint and in document order; applying back to
        // front keeps earlier offsets valid.
        let mut output = html.to_owned();
        let mut outcomes = Vec::with_capacity(elements.len());
        for (element, result) in elements.iter().zip(results).rev() {
            match result {
                Ok(markup) => {
                    let container = diagram_container(&markup);
                    output.replace_range(element.container.clone(), &container);
                    outcomes.push(ElementOutcome::Replaced {
                        index: element.index,
                        language: element.language,
                    });
                }
                Err(error) => {
                    tracing::error!(
                        index = element.index,
                        language = %element.language,
                        error = %error.kind,
                        "Error rendering diagram"
                    );
                    output.insert_str(element.container.start, ERROR_NOTICE);
                    outcomes.push(ElementOutcome::Errored(error));
                }
            }
        }
        outcomes.reverse();

        RenderedPage {
            html: output,
            outcomes,
        }
    }
}
