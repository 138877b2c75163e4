use crate::error::DispatchError;
use crate::models::config::RunConfig;
use crate::services::process::CommandSpec;

/// Runs the project-wide test runner across every workspace member,
/// verbosely, and propagates its exit code unchanged.
///
/// # Result
/// Returns the test runner's exit code; 0 means every test target passed.
///
/// # Errors
/// Returns an error only if the test runner cannot be launched at all.
pub fn run_workspace_tests(config: &RunConfig) -> Result<i32, DispatchError> {
    println!("🧪 Running workspace tests...");
    command(config).status()
}

/// The single invocation this branch performs.
fn command(config: &RunConfig) -> CommandSpec {
    CommandSpec::new(config.cargo.clone()).args(["test", "--workspace", "--verbose"])
}
