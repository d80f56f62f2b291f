//! Internal constants for diagram rendering.

/// Kroki server used when nothing else is configured.
pub const DEFAULT_KROKI_URL: &str = "http://localhost:8001";

/// Output format requested from Kroki.
pub(crate) const SVG_FORMAT: &str = "svg";
