//! Plan execution and detailed-exit-code classification.

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::command::build_plan_args;
use crate::config::PlanConfig;
use crate::error::Error;
use crate::error::TransformError;
use crate::exec::is_command_available;
use crate::exec::run_command;
use crate::transform::process_error;
use crate::transform::process_output;

/// Classified result of one plan invocation, per the tool's
/// `-detailed-exitcode` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Exit code 0: the plan is empty.
    NoChanges,
    /// Exit code 1: the tool reported an error.
    Failed,
    /// Exit code 2: the plan contains changes.
    Changed,
    /// Any other exit code, including signal termination (`-1`). The tool
    /// defines no such codes today; never folded into `NoChanges`, and
    /// failure-equivalent for the wrapping process.
    Unknown(i32),
}

impl PlanOutcome {
    /// Map a detailed exit code onto its outcome.
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => Self::NoChanges,
            1 => Self::Failed,
            2 => Self::Changed,
            other => Self::Unknown(other),
        }
    }

    /// Whether this outcome should fail the wrapping process.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Unknown(_))
    }
}

/// Immutable record of one plan run.
///
/// The raw streams are write-once; the diff-style and error renderings are
/// derived on demand and never stored back.
#[derive(Debug, Clone)]
pub struct PlanResult {
    raw_output: String,
    raw_error: String,
    outcome: PlanOutcome,
    workspace: String,
    color_enabled: bool,
}

impl PlanResult {
    /// Assemble a result from captured process state.
    pub fn new(
        raw_output: String,
        raw_error: String,
        outcome: PlanOutcome,
        workspace: String,
        color_enabled: bool,
    ) -> Self {
        Self {
            raw_output,
            raw_error,
            outcome,
            workspace,
            color_enabled,
        }
    }

    pub fn outcome(&self) -> PlanOutcome {
        self.outcome
    }

    /// Captured stdout of the plan invocation, untouched.
    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    /// Captured stderr of the plan invocation, untouched.
    pub fn raw_error(&self) -> &str {
        &self.raw_error
    }

    /// Active workspace name; empty when none is in use or the query failed.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Whether the invocation requested colorized output.
    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Diff-style rendering of the captured plan body.
    pub fn processed_output(&self) -> Result<String, TransformError> {
        process_output(&self.raw_output)
    }

    /// Normalized error text.
    pub fn processed_error(&self) -> String {
        process_error(&self.raw_error)
    }
}

/// Run `terraform plan` and classify its detailed exit code.
///
/// The active workspace name is captured first through `workspace show`;
/// that query failing is non-critical and leaves the name empty. An
/// unresolvable tool binary is fatal.
pub async fn run_plan(config: &PlanConfig) -> Result<PlanResult, Error> {
    if !is_command_available(&config.path) {
        return Err(Error::ToolUnavailable {
            path: config.path.clone(),
        });
    }

    let workspace = current_workspace(config).await;

    let args = build_plan_args(config);
    info!("running command `{} {}`", config.path, args.join(" "));
    let output = run_command(&config.path, &args).await;

    let outcome = PlanOutcome::from_exit_code(output.exit_code);
    match outcome {
        PlanOutcome::Unknown(code) => {
            warn!("plan exited with undefined detailed exit code {code}");
        }
        _ => debug!("plan exited with code {} ({outcome:?})", output.exit_code),
    }

    Ok(PlanResult::new(
        output.stdout,
        output.stderr,
        outcome,
        workspace,
        !config.no_color,
    ))
}

/// Capture the active workspace name, or empty when the query fails.
async fn current_workspace(config: &PlanConfig) -> String {
    let args = vec!["workspace".to_string(), "show".to_string()];
    let output = run_command(&config.path, &args).await;

    if output.exit_code != 0 {
        debug!(
            "workspace query failed with code {}: {}",
            output.exit_code,
            output.stderr.trim()
        );
        return String::new();
    }

    output.stdout.trim().to_string()
}
