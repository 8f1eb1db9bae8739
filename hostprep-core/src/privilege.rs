use serde::Serialize;

use crate::runner::Invocation;

/// Program used to escalate install commands for non-root users
pub const ESCALATION_PROGRAM: &str = "sudo";

/// Privilege level of the current process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Root,
    User,
}

impl Privilege {
    /// Reads the effective uid of this process
    #[cfg(unix)]
    pub fn current() -> Self {
        Self::from_euid(unsafe { libc::geteuid() })
    }

    #[cfg(not(unix))]
    pub fn current() -> Self {
        Privilege::User
    }

    pub fn from_euid(euid: u32) -> Self {
        if euid == 0 {
            Privilege::Root
        } else {
            Privilege::User
        }
    }

    /// Prefixes the command with `sudo` unless already root
    pub fn wrap(self, invocation: Invocation) -> Invocation {
        match self {
            Privilege::Root => invocation,
            Privilege::User => invocation.wrapped_in(ESCALATION_PROGRAM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_zero_is_root() {
        assert_eq!(Privilege::from_euid(0), Privilege::Root);
        assert_eq!(Privilege::from_euid(1000), Privilege::User);
    }

    #[test]
    fn test_root_runs_commands_directly() {
        let inv = Invocation::new("pacman", ["-Sy"]);
        assert_eq!(Privilege::Root.wrap(inv.clone()), inv);
    }

    #[test]
    fn test_user_escalates_with_sudo() {
        let inv = Invocation::new("dnf", ["install", "-y", "gcc"]);
        let wrapped = Privilege::User.wrap(inv);
        assert_eq!(wrapped.to_string(), "sudo dnf install -y gcc");
    }
}
