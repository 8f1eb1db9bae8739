//! Host bootstrap for building the project: installs the system build
//! dependencies through the host package manager and launches a release
//! build.

mod deps;
mod deps_check;
mod error;
mod launcher;
mod privilege;
mod runner;

pub use deps::{
    install_dependencies, InstallConfig, InstallLogger, InstallPlan, InstallReport, InstallStep,
    PackageManager, KEEP_LOGS,
};
pub use deps_check::{
    check_dependencies, first_version_line, verify_compiler, DependencyReport, ToolStatus,
    TrackedTool, COMPILER, TRACKED_TOOLS,
};
pub use error::{Error, Result};
pub use launcher::{
    launch, project_dir_for, resolve_log_level, resolve_project_dir, LaunchConfig,
    DEFAULT_LOG_LEVEL, LOG_ENV, PROJECT_DIR_ENV,
};
pub use privilege::{Privilege, ESCALATION_PROGRAM};
pub use runner::{CommandOutput, CommandRunner, Invocation, PathLocator, SystemRunner, ToolLocator};

/// Installs build dependencies on the real host
pub fn install_host_dependencies(config: &InstallConfig) -> Result<InstallReport> {
    install_dependencies(&SystemRunner, &PathLocator, Privilege::current(), config)
}

/// Reports build dependency status for the real host
pub fn check_host_dependencies() -> DependencyReport {
    check_dependencies(&PathLocator, &SystemRunner, Privilege::current())
}
