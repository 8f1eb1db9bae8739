use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while bootstrapping the host or launching the project
#[derive(Error, Debug)]
pub enum Error {
    #[error("No supported package manager found (apt-get, dnf, or pacman required)")]
    UnsupportedPackageManager,

    #[error("C compiler (cc) not found after installation. Please verify your toolchain manually.")]
    CompilerMissing,

    #[error("No project directory found above {}. Pass --project-dir or set HOSTPREP_PROJECT_DIR.", .exe.display())]
    ProjectDirNotFound { exe: PathBuf },

    #[error("`{command}` failed with {}", describe_status(.status))]
    CommandFailed {
        command: String,
        /// Exit code, or None when the process was terminated by a signal
        status: Option<i32>,
    },

    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code that reports this error to the caller.
    ///
    /// A failed external command passes its own status through; every
    /// other failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed { status, .. } => status.filter(|code| *code != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
