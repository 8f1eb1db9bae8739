//! Linux package manager install steps
//!
//! Each supported manager contributes a fixed command list that installs
//! a C toolchain, pkg-config, and the OpenSSL development headers:
//! - apt-get (Debian, Ubuntu, Kali)
//! - dnf (Fedora, RHEL 8+)
//! - pacman (Arch Linux, Manjaro)

mod apt;
mod dnf;
mod pacman;

pub use apt::apt_steps;
pub use dnf::dnf_steps;
pub use pacman::pacman_steps;
