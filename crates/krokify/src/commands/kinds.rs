//! `krokify kinds` command implementation.

use krokify_diagrams::DiagramLanguage;

use crate::output::Output;

/// List supported diagram kinds with the class that tags them.
pub(crate) fn execute() {
    let output = Output::new();
    for language in DiagramLanguage::ALL {
        let class = format!("language-{language}");
        if DiagramLanguage::DEFAULT_ENABLED.contains(&language) {
            let detail = format!("{class} (enabled by default)");
            output.row(language.kroki_endpoint(), &detail);
        } else {
            output.row(language.kroki_endpoint(), &class);
        }
    }
}
