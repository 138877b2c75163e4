//! # CLI Argument Definitions
//!
//! The dispatcher is environment-driven, so the whole command line is
//! optional: flags only override or relax what the environment provides.

use clap::Parser;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "ci-runner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Two-branch CI entry point: workspace tests or the integration suite")]
pub struct Cli {
    /// Run kind, overriding the `KIND` environment variable ("build" or "integration")
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Treat a missing KIND as a no-op instead of a configuration error
    #[arg(long)]
    pub lenient: bool,
}
