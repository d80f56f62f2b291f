//! Diagram rendering for built HTML pages.
//!
//! Scans pages for code blocks tagged as diagram source
//! (`<code class="language-plantuml">`, `language-mermaid`, ...), renders them
//! through a [`RenderService`](krokify_diagrams::RenderService) and rewrites
//! the page.
//!
//! # Architecture
//!
//! - [`element`]: diagram element discovery (`DiagramElement`)
//! - [`markup`]: diagram container, error notice and text extraction
//! - [`renderer`]: `DiagramRenderer`, per-page rendering and mutation
//! - [`site`]: `SiteProcessor`, in-place processing of files and directories
//!
//! # Example
//!
//! ```ignore
//! use krokify_diagrams::KrokiClient;
//! use krokify_page::{DiagramRenderer, SiteProcessor};
//!
//! let renderer = DiagramRenderer::new(Box::new(KrokiClient::new("http://localhost:8001")));
//! let report = SiteProcessor::new(&renderer).process_path("site".as_ref())?;
//! ```

mod element;
mod markup;
mod renderer;
mod site;

pub use element::{DiagramElement, find_diagram_elements};
pub use markup::{DIAGRAM_CLASS, ERROR_NOTICE, diagram_container, text_content};
pub use renderer::{DiagramRenderer, ElementOutcome, RenderedPage};
pub use site::{PageReport, SiteError, SiteProcessor, SiteReport};
