use thiserror::Error;

/// Fatal failures of the plan engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The terraform binary could not be resolved on the search path.
    #[error("`{path}` not found. Be sure the terraform binary is on your $PATH.")]
    ToolUnavailable { path: String },

    /// The captured plan output did not have the expected shape.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Failures of the output rewriting pipeline.
///
/// Continuing with a partial match would silently publish a corrupted
/// comment, so extraction failures propagate as typed errors instead of
/// degrading to the unfiltered text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The divider/summary delimiters were not found in the captured output.
    #[error(
        "could not locate the plan body between the divider and the `Plan: …` summary line"
    )]
    PlanBodyNotFound,
}
