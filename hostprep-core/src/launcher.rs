//! Release launcher
//!
//! Defaults `RUST_LOG`, moves into the project directory, and hands the
//! process over to `cargo run --release`.

use log::info;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::Invocation;

pub const LOG_ENV: &str = "RUST_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const PROJECT_DIR_ENV: &str = "HOSTPREP_PROJECT_DIR";

const MANIFEST: &str = "Cargo.toml";

/// Keeps a caller-supplied log filter, falling back to `info`
pub fn resolve_log_level(current: Option<String>) -> String {
    match current {
        Some(level) if !level.trim().is_empty() => level,
        _ => DEFAULT_LOG_LEVEL.to_string(),
    }
}

/// Workspace root this launcher was built from
fn own_workspace() -> Option<&'static Path> {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent()
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Project directory that owns the given executable.
///
/// The nearest ancestor holding a `Cargo.toml` wins, so a binary running
/// out of `target/release` still resolves to the project root. The
/// launcher's own workspace (`skip`) never counts as the project, or
/// `cargo run` would start the launcher again.
pub fn project_dir_for(exe: &Path, skip: Option<&Path>) -> Option<PathBuf> {
    let exe_dir = exe.parent().unwrap_or(exe);
    exe_dir
        .ancestors()
        .filter(|dir| dir.join(MANIFEST).is_file())
        .find(|dir| !skip.map(|own| same_dir(dir, own)).unwrap_or(false))
        .map(Path::to_path_buf)
}

/// Picks the project directory: explicit flag, then environment, then
/// the directory owning the running executable
pub fn resolve_project_dir(
    flag: Option<PathBuf>,
    env_override: Option<PathBuf>,
    exe: &Path,
) -> Result<PathBuf> {
    if let Some(dir) = flag.or(env_override) {
        return Ok(dir);
    }
    project_dir_for(exe, own_workspace()).ok_or_else(|| Error::ProjectDirNotFound {
        exe: exe.to_path_buf(),
    })
}

/// Everything needed to launch the project
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub project_dir: PathBuf,
    pub log_level: String,
    pub build_tool: String,
    pub build_args: Vec<String>,
    /// Passed to the project binary after `--`
    pub forwarded_args: Vec<String>,
}

impl LaunchConfig {
    pub fn new(project_dir: PathBuf, log_level: String) -> Self {
        Self {
            project_dir,
            log_level,
            build_tool: "cargo".to_string(),
            build_args: vec!["run".to_string(), "--release".to_string()],
            forwarded_args: Vec::new(),
        }
    }

    /// Builds the config from the process environment and the running
    /// executable. The caller's working directory is never consulted.
    pub fn from_env(project_dir_flag: Option<PathBuf>, forwarded_args: Vec<String>) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let env_dir = std::env::var_os(PROJECT_DIR_ENV).map(PathBuf::from);
        let project_dir = resolve_project_dir(project_dir_flag, env_dir, &exe)?;
        let log_level = resolve_log_level(std::env::var(LOG_ENV).ok());

        let mut config = Self::new(project_dir, log_level);
        config.forwarded_args = forwarded_args;
        Ok(config)
    }

    pub fn invocation(&self) -> Invocation {
        let mut args = self.build_args.clone();
        if !self.forwarded_args.is_empty() {
            args.push("--".to_string());
            args.extend(self.forwarded_args.iter().cloned());
        }
        Invocation::new(&self.build_tool, args).env(LOG_ENV, &self.log_level)
    }
}

/// Changes into the project directory and replaces this process with the
/// build tool. Only returns on failure.
#[cfg(unix)]
pub fn launch(config: &LaunchConfig) -> Result<()> {
    use std::os::unix::process::CommandExt;

    enter_project_dir(config)?;
    let invocation = config.invocation();
    info!("Launching: {}", invocation);

    let source = invocation.to_command().exec();
    Err(Error::Spawn {
        command: invocation.to_string(),
        source,
    })
}

/// Changes into the project directory and runs the build tool to
/// completion, propagating its exit status.
#[cfg(not(unix))]
pub fn launch(config: &LaunchConfig) -> Result<()> {
    enter_project_dir(config)?;
    let invocation = config.invocation();
    info!("Launching: {}", invocation);

    let status = invocation
        .to_command()
        .status()
        .map_err(|source| Error::Spawn {
            command: invocation.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: invocation.to_string(),
            status: status.code(),
        })
    }
}

fn enter_project_dir(config: &LaunchConfig) -> Result<()> {
    std::env::set_current_dir(&config.project_dir)?;
    info!("Working directory: {}", config.project_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_level_defaults_to_info() {
        assert_eq!(resolve_log_level(None), "info");
        assert_eq!(resolve_log_level(Some(String::new())), "info");
    }

    #[test]
    fn test_log_level_preserves_supplied_value() {
        assert_eq!(resolve_log_level(Some("debug".to_string())), "debug");
        assert_eq!(
            resolve_log_level(Some("warn,my_crate=trace".to_string())),
            "warn,my_crate=trace"
        );
    }

    #[test]
    fn test_project_dir_walks_up_to_manifest() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("Cargo.toml"), "[package]\n").unwrap();
        let release = root.path().join("target").join("release");
        std::fs::create_dir_all(&release).unwrap();

        assert_eq!(
            project_dir_for(&release.join("hostprep"), None),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_own_workspace_is_skipped() {
        // companion/Cargo.toml holds the launcher's checkout at companion/tools/hostprep
        let companion = TempDir::new().unwrap();
        std::fs::write(companion.path().join("Cargo.toml"), "[package]\n").unwrap();
        let own = companion.path().join("tools").join("hostprep");
        let release = own.join("target").join("release");
        std::fs::create_dir_all(&release).unwrap();
        std::fs::write(own.join("Cargo.toml"), "[workspace]\n").unwrap();

        let exe = release.join("hostprep");
        assert_eq!(project_dir_for(&exe, None), Some(own.clone()));
        assert_eq!(
            project_dir_for(&exe, Some(&own)),
            Some(companion.path().to_path_buf())
        );
    }

    #[test]
    fn test_only_own_workspace_yields_nothing() {
        let own = TempDir::new().unwrap();
        std::fs::write(own.path().join("Cargo.toml"), "[workspace]\n").unwrap();
        let release = own.path().join("target").join("release");
        std::fs::create_dir_all(&release).unwrap();

        // A manifest somewhere above the temp dir would change the answer
        let above = own
            .path()
            .parent()
            .and_then(|p| p.ancestors().find(|d| d.join("Cargo.toml").is_file()))
            .map(Path::to_path_buf);
        assert_eq!(project_dir_for(&release.join("hostprep"), Some(own.path())), above);
    }

    #[test]
    fn test_running_from_own_build_does_not_relaunch_itself() {
        let own = own_workspace().unwrap();
        let exe = own.join("target").join("release").join("hostprep");

        match resolve_project_dir(None, None, &exe) {
            Ok(dir) => assert!(!same_dir(&dir, own), "resolved to own workspace"),
            Err(err) => {
                assert!(matches!(err, Error::ProjectDirNotFound { .. }));
                assert!(err.to_string().contains("--project-dir"));
                assert_eq!(err.exit_code(), 1);
            }
        }
    }

    #[test]
    fn test_flag_beats_env_beats_exe() {
        let exe = Path::new("/opt/app/bin/hostprep");
        let flag = Some(PathBuf::from("/flag"));
        let env = Some(PathBuf::from("/env"));

        assert_eq!(resolve_project_dir(flag, env.clone(), exe).unwrap(), PathBuf::from("/flag"));
        assert_eq!(resolve_project_dir(None, env, exe).unwrap(), PathBuf::from("/env"));
    }

    #[test]
    fn test_enter_project_dir_ignores_caller_cwd() {
        let caller = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let previous = std::env::current_dir().unwrap();

        std::env::set_current_dir(caller.path()).unwrap();
        let config = LaunchConfig::new(project.path().to_path_buf(), "info".to_string());
        enter_project_dir(&config).unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(previous).unwrap();

        assert_eq!(cwd.canonicalize().unwrap(), project.path().canonicalize().unwrap());
    }

    #[test]
    fn test_invocation_is_release_run_with_log_env() {
        let config = LaunchConfig::new(PathBuf::from("/srv/app"), "info".to_string());
        let inv = config.invocation();

        assert_eq!(inv.to_string(), "cargo run --release");
        assert_eq!(inv.envs, vec![("RUST_LOG".to_string(), "info".to_string())]);
    }

    #[test]
    fn test_forwarded_args_follow_separator() {
        let mut config = LaunchConfig::new(PathBuf::from("/srv/app"), "debug".to_string());
        config.forwarded_args = vec!["--port".to_string(), "8080".to_string()];

        assert_eq!(config.invocation().to_string(), "cargo run --release -- --port 8080");
    }
}
