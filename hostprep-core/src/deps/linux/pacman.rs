//! Pacman package manager integration (Arch Linux, Manjaro)

use super::super::InstallStep;

pub const PACMAN_PACKAGES: &[&str] = &["base-devel", "pkgconf", "openssl"];

/// `-Sy --needed` syncs the database and skips packages already current
pub fn pacman_steps() -> Vec<InstallStep> {
    let mut install = vec!["-Sy", "--needed", "--noconfirm"];
    install.extend_from_slice(PACMAN_PACKAGES);

    vec![InstallStep::new("Installing build dependencies with pacman", "pacman", install)]
}
