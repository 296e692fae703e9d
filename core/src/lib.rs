//! Core engine for plandiff.
//!
//! Runs `terraform plan` with `-detailed-exitcode`, classifies the tri-state
//! exit status into a [`PlanOutcome`], and rewrites the captured plan text
//! into a diff-style rendering suitable for a pull request comment.

mod command;
mod config;
mod error;
mod exec;
mod plan;
mod transform;

pub use command::build_plan_args;
pub use config::PlanConfig;
pub use error::Error;
pub use error::TransformError;
pub use exec::CommandOutput;
pub use exec::is_command_available;
pub use exec::run_command;
pub use plan::PlanOutcome;
pub use plan::PlanResult;
pub use plan::run_plan;
pub use transform::process_error;
pub use transform::process_output;
