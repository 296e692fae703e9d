//! Pull request comment publishing.
//!
//! Renders one of three fixed comment templates keyed on the plan outcome
//! and posts it through the GitHub issues-comment API. Publishing is
//! best-effort from the caller's point of view: a failed post is reported,
//! never retried, and never changes the process exit code.

use plandiff_core::PlanOutcome;
use plandiff_core::PlanResult;
use plandiff_core::TransformError;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the API token.
pub const GITHUB_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("plandiff/", env!("CARGO_PKG_VERSION"));

const ERROR_TEMPLATE: &str = r"## :rotating_light: Terraform plan failed

**Folder:** `{folder}`
**Workspace:** `{workspace}`

```
{output}
```
";

const NO_CHANGES_TEMPLATE: &str = r"## :white_check_mark: Terraform plan: no changes

**Folder:** `{folder}`
**Workspace:** `{workspace}`

Infrastructure is up to date.
";

const PLAN_TEMPLATE: &str = r"## :white_check_mark: Terraform plan: changes detected

**Folder:** `{folder}`
**Workspace:** `{workspace}`

<details><summary>Show plan</summary>

```diff
{output}
```

</details>
";

/// Errors from rendering or posting a comment.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No API token in the environment.
    #[error("you must set your GitHub token in the GITHUB_TOKEN environment variable")]
    MissingToken,

    /// The captured plan output could not be rewritten.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The HTTP request could not be performed.
    #[error("comment request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the comment.
    #[error("comment rejected by the API: {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Addressed pull request. A non-positive `number` means there is no pull
/// request to comment on (local or non-PR pipeline run).
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub owner: String,
    pub repo: String,
    pub number: i64,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Client for the issues-comment endpoint.
pub struct CommentClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl CommentClient {
    /// Build a client authenticated from the `GITHUB_TOKEN` environment
    /// variable. A missing or empty token is a configuration error, not a
    /// retryable condition.
    pub fn from_env() -> Result<Self, PublishError> {
        match std::env::var(GITHUB_TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(Self::new(DEFAULT_API_BASE, token)),
            _ => Err(PublishError::MissingToken),
        }
    }

    /// Build a client against a specific API base URL.
    pub fn new(api_base: &str, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Render the outcome-keyed template and post it as a single comment.
    ///
    /// Returns without any network call when `pr` addresses no real pull
    /// request.
    pub async fn publish(&self, pr: &PullRequest, plan: &PlanResult) -> Result<(), PublishError> {
        if pr.number <= 0 {
            info!(
                "no pull request to comment on (pr number {}), skipping comment",
                pr.number
            );
            return Ok(());
        }

        let comment = render_comment(plan)?;
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, pr.owner, pr.repo, pr.number
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&CommentBody { body: &comment })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, body });
        }

        info!("posted plan comment to {}/{}#{}", pr.owner, pr.repo, pr.number);
        Ok(())
    }
}

/// Render the comment body for a plan result.
///
/// The error template serves both the `Failed` outcome and the undefined
/// exit codes; the plan template carries the diff-style rewrite inside a
/// collapsible block.
pub fn render_comment(plan: &PlanResult) -> Result<String, PublishError> {
    let folder = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();

    let comment = match plan.outcome() {
        PlanOutcome::NoChanges => render(NO_CHANGES_TEMPLATE, &folder, plan.workspace(), ""),
        PlanOutcome::Changed => {
            let output = plan.processed_output()?;
            render(PLAN_TEMPLATE, &folder, plan.workspace(), &output)
        }
        PlanOutcome::Failed | PlanOutcome::Unknown(_) => {
            render(ERROR_TEMPLATE, &folder, plan.workspace(), &plan.processed_error())
        }
    };

    Ok(comment)
}

fn render(template: &str, folder: &str, workspace: &str, output: &str) -> String {
    template
        .replace("{folder}", folder)
        .replace("{workspace}", workspace)
        .replace("{output}", output)
}
