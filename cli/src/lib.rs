//! Command-line surface for plandiff.
//!
//! Parses the tool pass-through flags plus the pull request address, runs
//! the plan, prints the raw tool output for the CI log, and publishes the
//! rendered comment. Only a failed (or undefined) plan outcome drives the
//! process exit code; a failed comment post is logged and swallowed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plandiff_core::PlanConfig;
use plandiff_core::run_plan;
use plandiff_github::CommentClient;
use plandiff_github::PublishError;
use plandiff_github::PullRequest;
use tracing::info;
use tracing::warn;

/// Run `terraform plan`, rewrite its output into a diff-style preview, and
/// post it as a pull request comment.
#[derive(Debug, Parser)]
#[command(name = "plandiff", version, about)]
pub struct Cli {
    /// Path to the terraform binary. Be sure it is on your $PATH.
    #[arg(long, default_value = "terraform")]
    pub path: String,

    /// Show warnings that have no accompanying errors in compact form.
    #[arg(long)]
    pub compact_warnings: bool,

    /// Generate a plan to destroy all managed resources.
    #[arg(long)]
    pub destroy: bool,

    /// Do not ask for input for variables that are not directly set.
    #[arg(long)]
    pub no_input: bool,

    /// State lock timeout, passed through to the tool (e.g. "30s").
    #[arg(long)]
    pub lock_timeout: Option<String>,

    /// Ask the tool for uncolored output.
    #[arg(long)]
    pub no_color: bool,

    /// Write the generated plan file to the given path.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Limit on concurrent operations inside the tool.
    #[arg(long, default_value_t = 10)]
    pub parallelism: u32,

    /// Skip the state refresh before planning.
    #[arg(long)]
    pub no_refresh: bool,

    /// Path to the state file to read.
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Resource to target; repeatable.
    #[arg(long = "target", value_name = "RESOURCE")]
    pub targets: Vec<String>,

    /// Variable override as `key=value`; repeatable.
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Variable definition file; repeatable.
    #[arg(long = "var-file", value_name = "PATH")]
    pub var_files: Vec<PathBuf>,

    /// Owner of the repository to comment on.
    #[arg(long, default_value = "")]
    pub owner: String,

    /// Repository name.
    #[arg(long, default_value = "")]
    pub repo: String,

    /// Pull request number; non-positive skips commenting.
    #[arg(long, default_value_t = 0)]
    pub pr_number: i64,
}

impl Cli {
    /// Immutable plan configuration from the parsed flags.
    pub fn plan_config(&self) -> PlanConfig {
        PlanConfig {
            path: self.path.clone(),
            compact_warnings: self.compact_warnings,
            destroy: self.destroy,
            input: !self.no_input,
            lock_timeout: self.lock_timeout.clone(),
            no_color: self.no_color,
            out: self.out.clone(),
            parallelism: self.parallelism,
            refresh: !self.no_refresh,
            state: self.state.clone(),
            targets: self.targets.clone(),
            vars: self.vars.clone(),
            var_files: self.var_files.clone(),
        }
    }

    /// Pull request address from the parsed flags.
    pub fn pull_request(&self) -> PullRequest {
        PullRequest {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number: self.pr_number,
        }
    }
}

/// Run one plan-and-comment cycle.
///
/// Fatal conditions (unresolvable tool, missing token when a comment must
/// be posted, malformed plan output) surface as errors for `main` to
/// render; everything else maps onto the exit code contract.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.plan_config();
    let plan = run_plan(&config).await?;

    // Raw tool output goes to the CI log; only the rewrite goes to the PR.
    println!("{}", plan.raw_output());

    let pr = cli.pull_request();
    if pr.number > 0 {
        let client = CommentClient::from_env()?;
        match client.publish(&pr, &plan).await {
            Ok(()) => {}
            // A plan body we cannot extract would publish a corrupted
            // comment; stop instead.
            Err(err @ PublishError::Transform(_)) => return Err(err.into()),
            Err(err) => warn!("failed to post plan comment: {err}"),
        }
    } else {
        info!("no pull request to comment on, skipping comment");
    }

    if plan.outcome().is_failure() {
        eprintln!("{}", plan.processed_error());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
