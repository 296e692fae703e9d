use std::path::PathBuf;

/// Configuration for one `terraform plan` invocation.
///
/// Built once from the parsed command line and never mutated afterwards;
/// every field maps onto a flag of the external tool (see
/// [`build_plan_args`](crate::build_plan_args)).
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Path or name of the terraform binary, resolved against `PATH`.
    pub path: String,
    /// Show warnings that have no accompanying errors in compact form.
    pub compact_warnings: bool,
    /// Plan the destruction of all managed resources.
    pub destroy: bool,
    /// Ask for input for variables that are not directly set.
    pub input: bool,
    /// State lock timeout, passed through verbatim (e.g. `30s`).
    pub lock_timeout: Option<String>,
    /// Request uncolored output from the tool.
    pub no_color: bool,
    /// Write the generated plan file to this path.
    pub out: Option<PathBuf>,
    /// Limit on concurrent operations inside the tool.
    pub parallelism: u32,
    /// Refresh state before planning.
    pub refresh: bool,
    /// Path to the state file to read.
    pub state: Option<PathBuf>,
    /// Restrict the plan to these resources and their dependencies.
    pub targets: Vec<String>,
    /// `key=value` variable overrides.
    pub vars: Vec<String>,
    /// Variable definition files.
    pub var_files: Vec<PathBuf>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            path: "terraform".to_string(),
            compact_warnings: false,
            destroy: false,
            input: true,
            lock_timeout: None,
            no_color: false,
            out: None,
            parallelism: crate::command::DEFAULT_PARALLELISM,
            refresh: true,
            state: None,
            targets: Vec::new(),
            vars: Vec::new(),
            var_files: Vec::new(),
        }
    }
}
