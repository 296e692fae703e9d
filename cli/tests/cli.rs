//! CLI integration tests.
//!
//! Exit code contract: 0 on success, 1 on a failed plan outcome or any
//! fatal condition (unresolvable binary, missing token).

use anyhow::Result;

fn plandiff_command() -> Result<assert_cmd::Command> {
    Ok(assert_cmd::Command::cargo_bin("plandiff")?)
}

#[test]
fn help_describes_the_tool_flags() -> Result<()> {
    plandiff_command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--pr-number"))
        .stdout(predicates::str::contains("terraform"));
    Ok(())
}

#[test]
fn unresolvable_binary_is_fatal_with_a_clear_message() -> Result<()> {
    plandiff_command()?
        .args(["--path", "plandiff-no-such-binary"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("not found"));
    Ok(())
}

#[test]
fn unknown_flags_are_rejected() -> Result<()> {
    plandiff_command()?
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicates::str::contains("unexpected argument"));
    Ok(())
}

/// Install a fake terraform script into a temp dir and return its path.
#[cfg(unix)]
fn fake_terraform(script: &str) -> Result<(tempfile::TempDir, std::path::PathBuf)> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("terraform");
    std::fs::write(&path, format!("#!/bin/sh\n{script}"))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok((dir, path))
}

#[cfg(unix)]
#[test]
fn failed_plan_outcome_drives_exit_code_one() -> Result<()> {
    let (_dir, fake) = fake_terraform(
        "if [ \"$1\" = workspace ]; then echo default; exit 0; fi\n\
         echo 'Error: boom' 1>&2\n\
         exit 1\n",
    )?;

    plandiff_command()?
        .args(["--path", fake.to_str().expect("utf-8 path")])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Error: boom"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn changed_plan_without_a_pull_request_exits_zero() -> Result<()> {
    let (_dir, fake) = fake_terraform(
        "if [ \"$1\" = workspace ]; then echo staging; exit 0; fi\n\
         echo '------------------------------------------------------------------------'\n\
         echo ''\n\
         echo '  + aws_instance.web'\n\
         echo ''\n\
         echo 'Plan: 1 to add, 0 to change, 0 to destroy.'\n\
         exit 2\n",
    )?;

    plandiff_command()?
        .args(["--path", fake.to_str().expect("utf-8 path")])
        .assert()
        .success()
        .stdout(predicates::str::contains("aws_instance.web"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn no_changes_outcome_exits_zero() -> Result<()> {
    let (_dir, fake) = fake_terraform("exit 0\n")?;

    plandiff_command()?
        .args(["--path", fake.to_str().expect("utf-8 path")])
        .assert()
        .success();
    Ok(())
}
