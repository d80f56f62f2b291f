//! Diagram kinds understood by the Kroki service.
//!
//! A page marks a code block as diagram source with a `language-<name>` class,
//! the same class markdown renderers emit for fenced code blocks.

use std::fmt;

/// Class prefix that markdown renderers put on fenced code blocks.
const CLASS_PREFIX: &str = "language-";

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramLanguage {
    PlantUml,
    C4PlantUml,
    Mermaid,
    GraphViz,
    Ditaa,
    BlockDiag,
    SeqDiag,
    ActDiag,
    NwDiag,
    PacketDiag,
    RackDiag,
    Erd,
    Nomnoml,
    Svgbob,
    Vega,
    VegaLite,
    WaveDrom,
    Bpmn,
    Bytefield,
    Excalidraw,
    Pikchr,
    Structurizr,
    D2,
    TikZ,
    Umlet,
    WireViz,
    Symbolator,
    Dbml,
}

impl DiagramLanguage {
    /// Every supported language, in the order `krokify kinds` lists them.
    pub const ALL: [Self; 28] = [
        Self::PlantUml,
        Self::C4PlantUml,
        Self::Mermaid,
        Self::GraphViz,
        Self::Ditaa,
        Self::BlockDiag,
        Self::SeqDiag,
        Self::ActDiag,
        Self::NwDiag,
        Self::PacketDiag,
        Self::RackDiag,
        Self::Erd,
        Self::Nomnoml,
        Self::Svgbob,
        Self::Vega,
        Self::VegaLite,
        Self::WaveDrom,
        Self::Bpmn,
        Self::Bytefield,
        Self::Excalidraw,
        Self::Pikchr,
        Self::Structurizr,
        Self::D2,
        Self::TikZ,
        Self::Umlet,
        Self::WireViz,
        Self::Symbolator,
        Self::Dbml,
    ];

    /// Languages enabled when the configuration does not name any.
    pub const DEFAULT_ENABLED: [Self; 2] = [Self::PlantUml, Self::Mermaid];

    /// Parse a language name.
    ///
    /// Accepts both `mermaid` and `kroki-mermaid`, the latter being the form
    /// the `MkDocs` Kroki plugin uses. Returns `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lang = s.strip_prefix("kroki-").unwrap_or(s);

        match lang {
            "plantuml" | "puml" => Some(Self::PlantUml),
            "c4plantuml" => Some(Self::C4PlantUml),
            "mermaid" => Some(Self::Mermaid),
            "graphviz" | "dot" => Some(Self::GraphViz),
            "ditaa" => Some(Self::Ditaa),
            "blockdiag" => Some(Self::BlockDiag),
            "seqdiag" => Some(Self::SeqDiag),
            "actdiag" => Some(Self::ActDiag),
            "nwdiag" => Some(Self::NwDiag),
            "packetdiag" => Some(Self::PacketDiag),
            "rackdiag" => Some(Self::RackDiag),
            "erd" => Some(Self::Erd),
            "nomnoml" => Some(Self::Nomnoml),
            "svgbob" => Some(Self::Svgbob),
            "vega" => Some(Self::Vega),
            "vegalite" => Some(Self::VegaLite),
            "wavedrom" => Some(Self::WaveDrom),
            "bpmn" => Some(Self::Bpmn),
            "bytefield" => Some(Self::Bytefield),
            "excalidraw" => Some(Self::Excalidraw),
            "pikchr" => Some(Self::Pikchr),
            "structurizr" => Some(Self::Structurizr),
            "d2" => Some(Self::D2),
            "tikz" => Some(Self::TikZ),
            "umlet" => Some(Self::Umlet),
            "wireviz" => Some(Self::WireViz),
            "symbolator" => Some(Self::Symbolator),
            "dbml" => Some(Self::Dbml),
            _ => None,
        }
    }

    /// Parse a single `class` token such as `language-plantuml`.
    #[must_use]
    pub fn from_class(token: &str) -> Option<Self> {
        token.strip_prefix(CLASS_PREFIX).and_then(Self::parse)
    }

    /// Kroki endpoint name for this diagram type.
    #[must_use]
    pub fn kroki_endpoint(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::C4PlantUml => "c4plantuml",
            Self::Mermaid => "mermaid",
            Self::GraphViz => "graphviz",
            Self::Ditaa => "ditaa",
            Self::BlockDiag => "blockdiag",
            Self::SeqDiag => "seqdiag",
            Self::ActDiag => "actdiag",
            Self::NwDiag => "nwdiag",
            Self::PacketDiag => "packetdiag",
            Self::RackDiag => "rackdiag",
            Self::Erd => "erd",
            Self::Nomnoml => "nomnoml",
            Self::Svgbob => "svgbob",
            Self::Vega => "vega",
            Self::VegaLite => "vegalite",
            Self::WaveDrom => "wavedrom",
            Self::Bpmn => "bpmn",
            Self::Bytefield => "bytefield",
            Self::Excalidraw => "excalidraw",
            Self::Pikchr => "pikchr",
            Self::Structurizr => "structurizr",
            Self::D2 => "d2",
            Self::TikZ => "tikz",
            Self::Umlet => "umlet",
            Self::WireViz => "wireviz",
            Self::Symbolator => "symbolator",
            Self::Dbml => "dbml",
        }
    }
}

impl fmt::Display for DiagramLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kroki_endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_languages_parse_from_endpoint() {
        for lang in DiagramLanguage::ALL {
            let endpoint = lang.kroki_endpoint();
            assert_eq!(DiagramLanguage::parse(endpoint), Some(lang), "{endpoint}");

            let prefixed = format!("kroki-{endpoint}");
            assert_eq!(DiagramLanguage::parse(&prefixed), Some(lang), "{prefixed}");
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(DiagramLanguage::parse("dot"), Some(DiagramLanguage::GraphViz));
        assert_eq!(DiagramLanguage::parse("puml"), Some(DiagramLanguage::PlantUml));
    }

    #[test]
    fn test_unknown_language() {
        assert!(DiagramLanguage::parse("rust").is_none());
        assert!(DiagramLanguage::parse("kroki-unknown").is_none());
        assert!(DiagramLanguage::parse("kroki-").is_none());
        assert!(DiagramLanguage::parse("").is_none());
    }

    #[test]
    fn test_from_class() {
        assert_eq!(
            DiagramLanguage::from_class("language-plantuml"),
            Some(DiagramLanguage::PlantUml)
        );
        assert_eq!(
            DiagramLanguage::from_class("language-kroki-mermaid"),
            Some(DiagramLanguage::Mermaid)
        );
        // Bare names are not classes
        assert!(DiagramLanguage::from_class("plantuml").is_none());
        assert!(DiagramLanguage::from_class("language-python").is_none());
        assert!(DiagramLanguage::from_class("highlight").is_none());
    }

    #[test]
    fn test_display_is_endpoint() {
        assert_eq!(DiagramLanguage::Mermaid.to_string(), "mermaid");
        assert_eq!(DiagramLanguage::C4PlantUml.to_string(), "c4plantuml");
    }

    #[test]
    fn test_default_enabled() {
        assert_eq!(
            DiagramLanguage::DEFAULT_ENABLED,
            [DiagramLanguage::PlantUml, DiagramLanguage::Mermaid]
        );
    }
}
