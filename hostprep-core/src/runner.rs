//! External process seams
//!
//! Everything hostprep does to the host goes through two traits: a
//! [`ToolLocator`] that answers "is this program on PATH?" and a
//! [`CommandRunner`] that executes an [`Invocation`]. The system
//! implementations wrap `which` and `std::process::Command`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// A single external command: program, arguments, and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            envs: Vec::new(),
        }
    }

    /// Adds an environment variable for the child process
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Returns the same command run through `wrapper` (e.g. `sudo`)
    pub fn wrapped_in(&self, wrapper: &str) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program.clone());
        args.extend(self.args.iter().cloned());
        Self {
            program: wrapper.to_string(),
            args,
            envs: self.envs.clone(),
        }
    }

    /// Builds the std command for this invocation
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; None when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Executes external commands
pub trait CommandRunner {
    /// Runs the command to completion and captures its output.
    ///
    /// An `Err` means the command could not be started at all.
    fn output(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// Resolves program names against the host
pub trait ToolLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;

    fn is_available(&self, program: &str) -> bool {
        self.locate(program).is_some()
    }
}

/// Runs commands on the real host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let output = invocation.to_command().output()?;
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Resolves programs through the PATH
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_in_prepends_program() {
        let inv = Invocation::new("apt-get", ["install", "-y", "pkg-config"]);
        let wrapped = inv.wrapped_in("sudo");

        assert_eq!(wrapped.program, "sudo");
        assert_eq!(wrapped.args, vec!["apt-get", "install", "-y", "pkg-config"]);
        assert_eq!(wrapped.to_string(), "sudo apt-get install -y pkg-config");
    }

    #[test]
    fn test_env_is_carried_through_wrapping() {
        let inv = Invocation::new("cargo", ["run"]).env("RUST_LOG", "info");
        let wrapped = inv.wrapped_in("nice");
        assert_eq!(wrapped.envs, vec![("RUST_LOG".to_string(), "info".to_string())]);
    }

    #[test]
    fn test_path_locator_misses_nonexistent_program() {
        assert!(!PathLocator.is_available("this_command_definitely_does_not_exist_12345"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let inv = Invocation::new("sh", ["-c", "echo hello; exit 3"]);
        let output = SystemRunner.output(&inv).unwrap();

        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
        assert!(!output.success());
    }

    #[test]
    fn test_system_runner_reports_spawn_failure() {
        let inv = Invocation::new("this_command_definitely_does_not_exist_12345", Vec::<String>::new());
        assert!(SystemRunner.output(&inv).is_err());
    }
}
