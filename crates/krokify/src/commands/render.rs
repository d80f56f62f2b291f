//! `krokify render` command implementation.

use std::path::PathBuf;

use clap::Args;
use krokify_config::{CliSettings, Config};
use krokify_diagrams::KrokiClient;
use krokify_page::{DiagramRenderer, SiteProcessor, SiteReport};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// HTML pages or site directories to process (default: site dir from config).
    paths: Vec<PathBuf>,

    /// Kroki server URL (overrides config).
    #[arg(long, env = "KROKI_URL")]
    kroki_url: Option<String>,

    /// Comma-separated diagram kinds to render (overrides config).
    #[arg(long, value_delimiter = ',')]
    kinds: Option<Vec<String>>,

    /// Request timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to configuration file (default: auto-discover krokify.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render diagrams but do not write pages.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (info-level logging).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            kroki_url: self.kroki_url,
            kinds: self.kinds,
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_path = ?config.config_path, "Loaded configuration");
        let kroki = &config.kroki_resolved;

        let client = KrokiClient::new(kroki.url.clone()).timeout(kroki.timeout);
        let server_url = client.server_url().to_owned();
        let renderer = DiagramRenderer::new(Box::new(client)).languages(&kroki.languages);
        let processor = SiteProcessor::new(&renderer).dry_run(self.dry_run);

        let paths = if self.paths.is_empty() {
            vec![config.site_resolved.dir.clone()]
        } else {
            self.paths
        };

        output.info(&kroki_summary(&server_url, &renderer));

        let mut report = SiteReport::default();
        for path in &paths {
            output.info(&format!("Processing {}", path.display()));
            report.merge(processor.process_path(path)?);
        }

        print_summary(&output, &report, self.dry_run);
        Ok(())
    }
}

fn kroki_summary(server_url: &str, renderer: &DiagramRenderer) -> String {
    let kinds: Vec<_> = renderer
        .enabled_languages()
        .iter()
        .map(ToString::to_string)
        .collect();
    format!("Kroki: {server_url} ({})", kinds.join(", "))
}

fn print_summary(output: &Output, report: &SiteReport, dry_run: bool) {
    for (path, reason) in &report.failed_pages {
        output.warning(&format!("Skipped {}: {reason}", path.display()));
    }

    if report.diagrams_errored > 0 {
        output.warning(&format!(
            "{} diagram(s) failed to render; error notices were inserted",
            report.diagrams_errored
        ));
    }

    let verb = if dry_run { "Would update" } else { "Updated" };
    output.success(&format!(
        "{verb} {} of {} page(s): {} diagram(s) rendered",
        report.pages_changed, report.pages_scanned, report.diagrams_replaced
    ));
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    #[test]
    fn test_parse_render_args() {
        let cli = TestCli::try_parse_from([
            "krokify",
            "site",
            "extra/page.html",
            "--kinds",
            "plantuml,mermaid,d2",
            "--timeout",
            "10",
            "--dry-run",
            "-v",
        ])
        .unwrap();

        assert_eq!(
            cli.args.paths,
            vec![PathBuf::from("site"), PathBuf::from("extra/page.html")]
        );
        assert_eq!(
            cli.args.kinds,
            Some(vec![
                "plantuml".to_owned(),
                "mermaid".to_owned(),
                "d2".to_owned()
            ])
        );
        assert_eq!(cli.args.timeout, Some(10));
        assert!(cli.args.dry_run);
        assert!(cli.args.verbose);
        assert!(cli.args.config.is_none());
    }

    #[test]
    fn test_kroki_summary_uses_client_and_renderer_settings() {
        let client = KrokiClient::new("http://kroki.internal:8000/");
        let server_url = client.server_url().to_owned();
        let renderer = DiagramRenderer::new(Box::new(client)).languages(&[
            krokify_diagrams::DiagramLanguage::Mermaid,
            krokify_diagrams::DiagramLanguage::D2,
        ]);

        assert_eq!(
            kroki_summary(&server_url, &renderer),
            "Kroki: http://kroki.internal:8000 (mermaid, d2)"
        );
    }

    #[test]
    fn test_parse_render_defaults() {
        let cli = TestCli::try_parse_from(["krokify"]).unwrap();

        assert!(cli.args.paths.is_empty());
        assert!(cli.args.kinds.is_none());
        assert!(!cli.args.dry_run);
        assert!(!cli.args.verbose);
    }
}
