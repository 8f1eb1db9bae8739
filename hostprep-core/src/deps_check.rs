use serde::Serialize;
use std::path::PathBuf;

use crate::deps::PackageManager;
use crate::error::{Error, Result};
use crate::privilege::Privilege;
use crate::runner::{CommandRunner, Invocation, ToolLocator};

/// Compiler that must resolve once dependencies are installed
pub const COMPILER: &str = "cc";

/// A host tool whose presence matters for building the project
#[derive(Debug, Clone, Copy)]
pub struct TrackedTool {
    pub command: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Tools reported by `check-deps`
pub const TRACKED_TOOLS: &[TrackedTool] = &[
    TrackedTool {
        command: COMPILER,
        required: true,
        description: "C compiler for native build scripts",
    },
    TrackedTool {
        command: "pkg-config",
        required: true,
        description: "Locates system libraries such as OpenSSL",
    },
    TrackedTool {
        command: "cargo",
        required: false,
        description: "Builds and runs the project",
    },
];

/// Status of one tool on this host
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub required: bool,
    pub description: String,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Snapshot of everything install-deps would touch
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub package_manager: Option<PackageManager>,
    pub privilege: Privilege,
    pub tools: Vec<ToolStatus>,
}

impl DependencyReport {
    /// True when every required tool resolves
    pub fn is_ready(&self) -> bool {
        self.tools
            .iter()
            .filter(|tool| tool.required)
            .all(ToolStatus::is_available)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the report as a table
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str("\n==================================================\n");
        out.push_str("  Build Dependency Status\n");
        out.push_str("==================================================\n\n");

        match self.package_manager {
            Some(manager) => out.push_str(&format!("Package manager: {}\n", manager)),
            None => out.push_str("Package manager: none supported (apt-get, dnf, pacman)\n"),
        }
        out.push_str(&format!("Privilege:       {:?}\n\n", self.privilege));

        for tool in &self.tools {
            let status = if tool.is_available() { "✓" } else { "✗" };
            let label = if tool.required { "[REQUIRED]" } else { "[OPTIONAL]" };
            out.push_str(&format!("{} {} {}\n", status, tool.name, label));
            out.push_str(&format!("   {}\n", tool.description));
            if let Some(version) = &tool.version {
                out.push_str(&format!("   {}\n", version));
            }
            out.push('\n');
        }

        out.push_str("==================================================\n");

        if !self.is_ready() {
            out.push_str("\n⚠ WARNING: Some required tools are missing!\n");
            out.push_str("Run 'hostprep install-deps' to install them.\n");
        }
        out
    }

    pub fn print_table(&self) {
        println!("{}", self.render_table());
    }
}

/// Returns the first non-empty line of a `--version` output
pub fn first_version_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|line| !line.is_empty())
}

fn probe_version(runner: &dyn CommandRunner, command: &str) -> Option<String> {
    runner
        .output(&Invocation::new(command, ["--version"]))
        .ok()
        .filter(|output| output.success())
        .and_then(|output| first_version_line(&output.stdout).map(str::to_string))
}

/// Confirms `cc` resolves and returns its version line
pub fn verify_compiler(locator: &dyn ToolLocator, runner: &dyn CommandRunner) -> Result<String> {
    if !locator.is_available(COMPILER) {
        return Err(Error::CompilerMissing);
    }

    Ok(probe_version(runner, COMPILER).unwrap_or_else(|| format!("{} (version unknown)", COMPILER)))
}

/// Collects the status of the package manager and tracked tools
pub fn check_dependencies(
    locator: &dyn ToolLocator,
    runner: &dyn CommandRunner,
    privilege: Privilege,
) -> DependencyReport {
    let tools = TRACKED_TOOLS
        .iter()
        .map(|tool| {
            let path = locator.locate(tool.command);
            let version = path
                .as_ref()
                .and_then(|_| probe_version(runner, tool.command));
            ToolStatus {
                name: tool.command.to_string(),
                required: tool.required,
                description: tool.description.to_string(),
                path,
                version,
            }
        })
        .collect();

    DependencyReport {
        package_manager: PackageManager::detect(locator),
        privilege,
        tools,
    }
}
