//! krokify CLI - diagram rendering for built documentation sites.
//!
//! Provides commands for:
//! - `render`: Replace diagram code blocks in HTML pages with rendered SVG
//! - `kinds`: List supported diagram kinds

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::RenderArgs;
use output::Output;

/// krokify - render diagram code blocks via Kroki.
#[derive(Parser)]
#[command(name = "krokify", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render diagrams in HTML pages or site directories.
    Render(RenderArgs),
    /// List supported diagram kinds.
    Kinds,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Kinds => {
            commands::kinds::execute();
            Ok(())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_kinds_command() {
        let cli = Cli::try_parse_from(["krokify", "kinds"]).unwrap();
        assert!(matches!(cli.command, Commands::Kinds));
    }
}
