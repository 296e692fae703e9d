//! Argument list construction for the `plan` subcommand.

use crate::config::PlanConfig;

/// The tool's own default for `-parallelism`; the flag is only emitted when
/// the configured value deviates.
pub(crate) const DEFAULT_PARALLELISM: u32 = 10;

/// Build the argv for `terraform plan` from the configuration.
///
/// `-detailed-exitcode` is always requested so the exit status carries the
/// tri-state outcome instead of a flat pass/fail. Order follows the tool's
/// own CLI contract: the positional `plan` first, then flags.
///
/// `-var` values are emitted as two argv tokens; they reach the child via
/// exec, not a shell, so no quoting is applied.
pub fn build_plan_args(config: &PlanConfig) -> Vec<String> {
    let mut args = vec!["plan".to_string(), "-detailed-exitcode".to_string()];

    if config.compact_warnings {
        args.push("-compact-warnings".to_string());
    }

    if config.destroy {
        args.push("-destroy".to_string());
    }

    if !config.input {
        args.push("-input=false".to_string());
    }

    if let Some(timeout) = &config.lock_timeout {
        args.push(format!("-lock-timeout={timeout}"));
    }

    if config.no_color {
        args.push("-no-color".to_string());
    }

    if let Some(out) = &config.out {
        args.push(format!("-out={}", out.display()));
    }

    if config.parallelism != DEFAULT_PARALLELISM {
        args.push(format!("-parallelism={}", config.parallelism));
    }

    if !config.refresh {
        args.push("-refresh=false".to_string());
    }

    if let Some(state) = &config.state {
        args.push(format!("-state={}", state.display()));
    }

    for target in &config.targets {
        args.push(format!("-target={target}"));
    }

    for var in &config.vars {
        args.push("-var".to_string());
        args.push(var.clone());
    }

    for var_file in &config.var_files {
        args.push(format!("-var-file={}", var_file.display()));
    }

    args
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_requests_only_detailed_exitcode() {
        let args = build_plan_args(&PlanConfig::default());
        assert_eq!(args, vec!["plan", "-detailed-exitcode"]);
    }

    #[test]
    fn default_valued_flags_are_omitted() {
        let config = PlanConfig {
            input: true,
            refresh: true,
            parallelism: DEFAULT_PARALLELISM,
            ..PlanConfig::default()
        };
        let args = build_plan_args(&config);
        assert!(!args.iter().any(|a| a.starts_with("-input")));
        assert!(!args.iter().any(|a| a.starts_with("-refresh")));
        assert!(!args.iter().any(|a| a.starts_with("-parallelism")));
    }

    #[test]
    fn full_config_emits_flags_in_contract_order() {
        let config = PlanConfig {
            compact_warnings: true,
            destroy: true,
            input: false,
            lock_timeout: Some("30s".to_string()),
            no_color: true,
            out: Some(PathBuf::from("plan.out")),
            parallelism: 4,
            refresh: false,
            state: Some(PathBuf::from("custom.tfstate")),
            targets: vec!["aws_instance.web".to_string()],
            vars: vec!["region=us-east-1".to_string()],
            var_files: vec![PathBuf::from("prod.tfvars")],
            ..PlanConfig::default()
        };

        let args = build_plan_args(&config);
        assert_eq!(
            args,
            vec![
                "plan",
                "-detailed-exitcode",
                "-compact-warnings",
                "-destroy",
                "-input=false",
                "-lock-timeout=30s",
                "-no-color",
                "-out=plan.out",
                "-parallelism=4",
                "-refresh=false",
                "-state=custom.tfstate",
                "-target=aws_instance.web",
                "-var",
                "region=us-east-1",
                "-var-file=prod.tfvars",
            ]
        );
    }

    #[test]
    fn repeatable_flags_emit_one_entry_per_value() {
        let config = PlanConfig {
            targets: vec!["a.b".to_string(), "c.d".to_string()],
            vars: vec!["x=1".to_string(), "y=2".to_string()],
            ..PlanConfig::default()
        };

        let args = build_plan_args(&config);
        assert_eq!(args.iter().filter(|a| a.starts_with("-target=")).count(), 2);
        assert_eq!(args.iter().filter(|a| *a == "-var").count(), 2);
        // Each `-var` is immediately followed by its unquoted value.
        let first_var = args.iter().position(|a| a == "-var").unwrap();
        assert_eq!(args[first_var + 1], "x=1");
    }
}
