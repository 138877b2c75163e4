use crate::error::DispatchError;
use crate::models::config::RunConfig;
use crate::services::process::CommandSpec;

/// Workspace member holding the integration entry point.
const INTEGRATION_PACKAGE: &str = "integration";

/// Run profile handed to the integration binary.
const RUN_PROFILE: &str = "default";

/// Target-selection mode handed to the integration binary.
const TARGET_MODE: &str = "sniffed_node";

/// Verbosity override exported into the child environment only; the
/// integration binary reads it for diagnostics, it has no effect on
/// pass/fail.
const LOG_VAR: &str = "ELASTIC_LOG";
const LOG_LEVEL: &str = "debug";

/// Runs the integration-test collaborator against the fixed run profile and
/// target-selection mode, and propagates its exit code unchanged.
///
/// # Result
/// Returns the collaborator's exit code; 0 means the scenario passed.
///
/// # Errors
/// Returns an error only if the collaborator cannot be launched at all.
pub fn run_integration_suite(config: &RunConfig) -> Result<i32, DispatchError> {
    println!("🔌 Running integration suite (profile `{RUN_PROFILE}`, target `{TARGET_MODE}`)...");
    command(config).status()
}

/// The single invocation this branch performs.
fn command(config: &RunConfig) -> CommandSpec {
    CommandSpec::new(config.cargo.clone())
        .args(["run", "-p", INTEGRATION_PACKAGE, "--", RUN_PROFILE, TARGET_MODE])
        .env(LOG_VAR, LOG_LEVEL)
}
