//! grow - browse a tree of markdown documents in the browser.
//!
//! `grow serve` starts an HTTP server rooted at a content directory. Each
//! request path is either a directory (listing) or a markdown file compiled
//! by an external program.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ServeArgs;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// grow - live-reloading markdown tree server.
#[derive(Parser)]
#[command(name = "grow", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute(VERSION)),
            Err(err) => Err(err.into()),
        },
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        #[allow(clippy::exit)]
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["grow", "serve", "-p", "9000"]).unwrap();
        let Commands::Serve(args) = cli.command;
        assert_eq!(args.port, Some(9000));
    }

    #[test]
    fn test_live_reload_flags_conflict() {
        let result =
            Cli::try_parse_from(["grow", "serve", "--live-reload", "true", "--no-live-reload"]);
        assert!(result.is_err());
    }
}
