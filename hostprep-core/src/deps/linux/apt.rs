//! APT package manager integration (Debian, Ubuntu, Kali)

use super::super::InstallStep;

/// Packages providing cc, make, pkg-config and OpenSSL headers
pub const APT_PACKAGES: &[&str] = &["build-essential", "pkg-config", "libssl-dev"];

/// Refreshes the package index, then installs the build packages
pub fn apt_steps() -> Vec<InstallStep> {
    let mut install = vec!["install", "-y"];
    install.extend_from_slice(APT_PACKAGES);

    vec![
        InstallStep::new("Refreshing apt package index", "apt-get", ["update"]),
        InstallStep::new("Installing build dependencies with apt-get", "apt-get", install),
    ]
}
