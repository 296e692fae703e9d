//! Subprocess execution with independently captured streams and a
//! normalized exit code.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

/// Exit code reported when the child could not be launched at all.
const DEFAULT_FAILED_CODE: i32 = 1;

/// Exit code reported when the child was terminated by a signal.
const SIGNAL_EXIT_CODE: i32 = -1;

/// Captured result of one child process run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run `program` with `args`, capturing stdout and stderr separately.
///
/// A child that starts and terminates reports its real exit status, or
/// `-1` when it was killed by a signal. A child that cannot be launched at
/// all (binary missing, permission denied) reports exit code 1, with a
/// synthesized stderr line since the child produced none. The call blocks
/// until both streams are fully drained; there is no retry.
pub async fn run_command(program: &str, args: &[String]) -> CommandOutput {
    match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
    {
        Ok(output) => CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(SIGNAL_EXIT_CODE),
        },
        Err(err) => {
            debug!("failed to launch `{program}`: {err}");
            CommandOutput {
                stdout: String::new(),
                stderr: format!("failed to launch `{program}`: {err}"),
                exit_code: DEFAULT_FAILED_CODE,
            }
        }
    }
}

/// Check whether `program` resolves to an executable on the search path.
///
/// Used as a fail-fast gate before the real run; an unresolvable binary is
/// a fatal configuration problem, not a recoverable error.
pub fn is_command_available(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn captures_streams_and_exit_code_separately() {
        let args = vec![
            "-c".to_string(),
            "echo out; echo err 1>&2; exit 2".to_string(),
        ];
        let output = run_command("sh", &args).await;

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.exit_code, 2);
    }

    #[tokio::test]
    async fn successful_child_reports_zero() {
        let args = vec!["-c".to_string(), "true".to_string()];
        let output = run_command("sh", &args).await;

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn unlaunchable_program_reports_sentinel_and_synthesized_stderr() {
        let output = run_command("plandiff-no-such-binary", &[]).await;

        assert_eq!(output.exit_code, DEFAULT_FAILED_CODE);
        assert_eq!(output.stdout, "");
        assert!(
            output.stderr.contains("failed to launch"),
            "stderr was: {}",
            output.stderr
        );
    }

    #[test]
    fn availability_follows_the_search_path() {
        assert!(is_command_available("sh"));
        assert!(!is_command_available("plandiff-no-such-binary"));
    }
}
