//! DNF package manager integration (Fedora, RHEL, CentOS Stream)

use super::super::InstallStep;

pub const DNF_PACKAGES: &[&str] = &["gcc", "gcc-c++", "make", "pkgconf-pkg-config", "openssl-devel"];

/// dnf refreshes metadata on its own, so a single install step suffices
pub fn dnf_steps() -> Vec<InstallStep> {
    let mut install = vec!["install", "-y"];
    install.extend_from_slice(DNF_PACKAGES);

    vec![InstallStep::new("Installing build dependencies with dnf", "dnf", install)]
}
