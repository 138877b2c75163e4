#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use crate::error::DispatchError;
use crate::handlers::{build, integration};
use crate::models::args::Cli;
use crate::models::config::{RunConfig, RunKind};

use clap::Parser;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    init_diagnostics();

    match try_main() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(err.exit_code());
        },
    }
}

fn try_main() -> Result<i32, DispatchError> {
    let cli = Cli::parse();
    let config = RunConfig::resolve(&cli)?;
    tracing::debug!(?config, "resolved run configuration");

    match config.kind {
        RunKind::Build => build::run_workspace_tests(&config),
        RunKind::Integration => integration::run_integration_suite(&config),
        RunKind::Unrecognized => {
            match config.raw_kind.as_deref() {
                Some(raw) => println!(
                    "Nothing to do for KIND=\"{raw}\" (recognized kinds: \"build\", \"integration\")."
                ),
                None => println!("KIND is not set, nothing to do."),
            }
            Ok(0)
        },
    }
}

/// Installs the tracing subscriber for the dispatcher's own diagnostics,
/// filtered through `RUST_LOG` with a `warn` default. Collaborator output is
/// inherited untouched, and the xtrace echo is printed directly rather than
/// logged so it survives any filter setting.
fn init_diagnostics() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
