// Standard library
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// External crates
use crate::error::{AdevError, Result};
use duct::cmd;
use tracing::debug;
use which::which;

/// Runs delegated programs (vagrant, ansible-playbook, ansible-galaxy, ...).
///
/// Implementations block until the program exits and map a non-zero exit
/// status to [`AdevError::Execution`]. Whether that is fatal is up to the caller.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Runs programs on the host with stdin/stdout/stderr passed straight through,
/// so interactive prompts (vault or become passwords) keep working.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    working_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let full_command = format_command(program, args);
        debug!(command = %full_command, cwd = %self.working_dir.display(), "running command");

        let output = cmd(program, args)
            .dir(&self.working_dir)
            .unchecked()
            .run()
            .map_err(|e| spawn_error(program, &full_command, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(AdevError::Execution {
                command: full_command,
                status: output.status.code(),
            })
        }
    }
}

/// Run a program with its output captured instead of streamed.
///
/// Returns whether it exited successfully together with its stdout.
pub fn capture_command<A: AsRef<OsStr>>(program: &str, args: &[A]) -> Result<(bool, String)> {
    let full_command = format_command(program, args);
    let output = cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|e| spawn_error(program, &full_command, e))?;

    Ok((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

/// Render a program and its arguments the way a user would type them.
pub fn format_command<A: AsRef<OsStr>>(program: &str, args: &[A]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(program: &str, full_command: &str, err: std::io::Error) -> AdevError {
    if err.kind() == ErrorKind::NotFound {
        AdevError::Dependency(format!("'{program}' is not installed or not on PATH"))
    } else {
        AdevError::Execution {
            command: format!("{full_command} ({err})"),
            status: None,
        }
    }
}

/// Checks if a command-line tool is available in the system's PATH.
pub fn is_tool_installed(tool_name: &str) -> bool {
    which(tool_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_command_joins_program_and_args() {
        let args = vec!["up".to_string(), "debian".to_string()];
        assert_eq!(format_command("vagrant", &args), "vagrant up debian");
    }

    #[test]
    fn format_command_without_args_is_program() {
        let args: Vec<String> = Vec::new();
        assert_eq!(format_command("vagrant", &args), "vagrant");
    }

    #[test]
    fn missing_program_is_a_dependency_error() {
        let runner = SystemRunner::new(std::env::temp_dir());
        let err = runner
            .run("adev-definitely-not-a-real-program", &[])
            .unwrap_err();
        assert!(matches!(err, AdevError::Dependency(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_execution_error() {
        let runner = SystemRunner::new(std::env::temp_dir());
        let err = runner.run("false", &[]).unwrap_err();
        match err {
            AdevError::Execution { command, status } => {
                assert_eq!(command, "false");
                assert_eq!(status, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_program_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(dir.path());
        runner
            .run("touch", &["marker".to_string()])
            .unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn capture_command_returns_stdout() {
        let (ok, out) = capture_command("echo", &["hello"]).unwrap();
        assert!(ok);
        assert_eq!(out.trim(), "hello");
    }
}
