use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::deps_check;
use crate::error::{Error, Result};
use crate::privilege::Privilege;
use crate::runner::{CommandRunner, Invocation, ToolLocator};

mod linux;
mod logger;

pub use logger::{InstallLogger, KEEP_LOGS};

/// Host package managers hostprep knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
}

impl PackageManager {
    /// Detection priority; the first resolvable manager wins
    pub const DETECTION_ORDER: [PackageManager; 3] =
        [PackageManager::Apt, PackageManager::Dnf, PackageManager::Pacman];

    /// Executable probed on PATH and invoked for installs
    pub fn binary(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
        }
    }

    /// Fixed command list installing the build dependencies
    pub fn install_steps(self) -> Vec<InstallStep> {
        match self {
            PackageManager::Apt => linux::apt_steps(),
            PackageManager::Dnf => linux::dnf_steps(),
            PackageManager::Pacman => linux::pacman_steps(),
        }
    }

    /// Returns the first manager in [`Self::DETECTION_ORDER`] that resolves
    pub fn detect(locator: &dyn ToolLocator) -> Option<Self> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|manager| locator.is_available(manager.binary()))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// One labelled external command of an install plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    pub label: String,
    pub invocation: Invocation,
}

impl InstallStep {
    pub fn new<I, S>(label: &str, program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.to_string(),
            invocation: Invocation::new(program, args),
        }
    }
}

/// Ordered steps for one package manager, escalated as needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub manager: PackageManager,
    pub steps: Vec<InstallStep>,
}

impl InstallPlan {
    pub fn new(manager: PackageManager, privilege: Privilege) -> Self {
        let steps = manager
            .install_steps()
            .into_iter()
            .map(|step| InstallStep {
                label: step.label,
                invocation: privilege.wrap(step.invocation),
            })
            .collect();

        Self { manager, steps }
    }
}

/// Configuration for a dependency install run
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Log the plan without executing it
    pub dry_run: bool,
    /// Directory for the install log file; None disables the file
    pub log_dir: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            log_dir: Some(std::env::temp_dir()),
        }
    }
}

/// Outcome of a successful install run
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub manager: PackageManager,
    pub steps_run: usize,
    /// First line of `cc --version`
    pub compiler_version: String,
    pub log_path: Option<PathBuf>,
}

/// Sends progress to the log facade and, when present, the install log file
struct Reporter {
    file: Option<InstallLogger>,
}

impl Reporter {
    fn open(config: &InstallConfig) -> Self {
        let file = config.log_dir.as_ref().and_then(|dir| {
            if let Err(e) = InstallLogger::cleanup_old_logs(dir, KEEP_LOGS.saturating_sub(1)) {
                debug!("Could not prune old install logs in {}: {}", dir.display(), e);
            }
            match InstallLogger::create(dir) {
                Ok(logger) => Some(logger),
                Err(e) => {
                    warn!("Could not create install log in {}: {}", dir.display(), e);
                    None
                }
            }
        });
        Self { file }
    }

    fn info(&self, message: &str) {
        info!("{}", message);
        if let Some(file) = &self.file {
            file.info(message);
        }
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
        if let Some(file) = &self.file {
            file.warn(message);
        }
    }

    /// Records a fatal error. The caller surfaces it on stderr, so the
    /// terminal only gets it at debug level.
    fn error(&self, message: &str) {
        debug!("{}", message);
        if let Some(file) = &self.file {
            file.error(message);
        }
    }

    fn output(&self, stream: &str, text: &str) {
        for line in text.lines() {
            debug!("  {}: {}", stream, line);
        }
        if let Some(file) = &self.file {
            file.log_output(stream, text);
        }
    }

    fn finish(self) -> Option<PathBuf> {
        self.file.map(|file| {
            file.finalize();
            file.log_path().to_path_buf()
        })
    }
}

/// Detects the package manager, installs the build dependencies, and
/// verifies that a C compiler resolves afterwards.
///
/// Fails fast: the first failing step aborts the run and its exit status
/// is carried in [`Error::CommandFailed`]. No command is invoked when no
/// supported package manager is found.
pub fn install_dependencies(
    runner: &dyn CommandRunner,
    locator: &dyn ToolLocator,
    privilege: Privilege,
    config: &InstallConfig,
) -> Result<InstallReport> {
    let reporter = Reporter::open(config);

    let Some(manager) = PackageManager::detect(locator) else {
        reporter.error(&Error::UnsupportedPackageManager.to_string());
        reporter.finish();
        return Err(Error::UnsupportedPackageManager);
    };
    reporter.info(&format!("Detected package manager: {}", manager));

    if privilege == Privilege::User {
        reporter.info("Not running as root, escalating install commands with sudo");
    }

    let plan = InstallPlan::new(manager, privilege);
    let mut steps_run = 0;

    for step in &plan.steps {
        if config.dry_run {
            reporter.info(&format!("[DRY RUN] {}: {}", step.label, step.invocation));
            continue;
        }

        reporter.info(&format!("{}: {}", step.label, step.invocation));
        let output = match runner.output(&step.invocation) {
            Ok(output) => output,
            Err(source) => {
                let err = Error::Spawn {
                    command: step.invocation.to_string(),
                    source,
                };
                reporter.error(&err.to_string());
                reporter.finish();
                return Err(err);
            }
        };

        reporter.output("stdout", &output.stdout);
        reporter.output("stderr", &output.stderr);

        if !output.success() {
            let err = Error::CommandFailed {
                command: step.invocation.to_string(),
                status: output.status,
            };
            reporter.error(&err.to_string());
            if let Some(last) = output.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                reporter.warn(last.trim());
            }
            reporter.finish();
            return Err(err);
        }
        steps_run += 1;
    }

    let compiler_version = match deps_check::verify_compiler(locator, runner) {
        Ok(version) => version,
        Err(err) => {
            reporter.error(&err.to_string());
            reporter.finish();
            return Err(err);
        }
    };
    reporter.info(&format!("C compiler: {}", compiler_version));

    let log_path = reporter.finish();
    Ok(InstallReport {
        manager,
        steps_run,
        compiler_version,
        log_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_order_is_apt_dnf_pacman() {
        let order: Vec<&str> = PackageManager::DETECTION_ORDER
            .iter()
            .map(|m| m.binary())
            .collect();
        assert_eq!(order, vec!["apt-get", "dnf", "pacman"]);
    }

    #[test]
    fn test_apt_updates_before_installing() {
        let steps = PackageManager::Apt.install_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].invocation.to_string(), "apt-get update");
        assert_eq!(
            steps[1].invocation.to_string(),
            "apt-get install -y build-essential pkg-config libssl-dev"
        );
    }

    #[test]
    fn test_every_manager_installs_toolchain_pkgconfig_and_openssl() {
        for manager in PackageManager::DETECTION_ORDER {
            let steps = manager.install_steps();
            let last = steps.last().unwrap();
            assert_eq!(last.invocation.program, manager.binary());

            let args = last.invocation.args.join(" ");
            assert!(args.contains("pkg"), "{} lacks pkg-config: {}", manager, args);
            assert!(args.contains("ssl"), "{} lacks OpenSSL: {}", manager, args);
        }
    }

    #[test]
    fn test_plan_for_user_is_escalated() {
        let plan = InstallPlan::new(PackageManager::Pacman, Privilege::User);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(
            plan.steps[0].invocation.to_string(),
            "sudo pacman -Sy --needed --noconfirm base-devel pkgconf openssl"
        );
    }

    #[test]
    fn test_plan_for_root_is_not_escalated() {
        let plan = InstallPlan::new(PackageManager::Dnf, Privilege::Root);
        assert!(plan.steps.iter().all(|s| s.invocation.program == "dnf"));
    }

    #[test]
    fn test_default_config_logs_to_temp_dir() {
        let config = InstallConfig::default();
        assert!(!config.dry_run);
        assert_eq!(config.log_dir, Some(std::env::temp_dir()));
    }
}
