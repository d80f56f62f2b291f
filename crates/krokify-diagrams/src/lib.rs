//! Diagram kinds and Kroki rendering for krokify.
//!
//! - [`DiagramLanguage`]: the diagram kinds a page may tag code blocks with
//! - [`RenderService`]: the seam between page processing and the network
//! - [`KrokiClient`]: `RenderService` backed by a Kroki server over HTTP
//!
//! # Example
//!
//! ```ignore
//! use krokify_diagrams::{DiagramLanguage, KrokiClient, RenderService};
//!
//! let client = KrokiClient::new("http://localhost:8001");
//! let svg = client.render_svg(DiagramLanguage::Mermaid, "graph TD; A-->B")?;
//! ```

mod consts;
mod kroki;
mod language;

pub use consts::DEFAULT_KROKI_URL;
pub use kroki::{DiagramError, DiagramErrorKind, KrokiClient, RenderService, create_agent};
pub use language::DiagramLanguage;
