//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdin, stdout};

const CI_VARS: [&str; 11] = [
    "CI",
    "CONTINUOUS_INTEGRATION",
    "JENKINS_URL",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "DRONE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Snapshot of what the attached terminal can do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub stdin_tty: bool,
    pub stdout_tty: bool,
    pub stderr_tty: bool,
    pub ci: bool,
    pub noninteractive: bool,
    pub term: String,
}

impl Capabilities {
    /// Probe the current process
    pub fn detect() -> Self {
        Self {
            stdin_tty: stdin().is_terminal(),
            stdout_tty: stdout().is_terminal(),
            stderr_tty: stderr().is_terminal(),
            ci: is_ci_environment(),
            noninteractive: env::var("DEBIAN_FRONTEND").unwrap_or_default() == "noninteractive",
            term: env::var("TERM").unwrap_or_default(),
        }
    }

    /// Stdout is a terminal a person is looking at
    pub fn is_interactive(&self) -> bool {
        self.stdout_tty && !self.ci && !self.noninteractive
    }

    /// The terminal understands ANSI colors and cursor movement
    pub fn supports_ansi(&self) -> bool {
        if !self.is_interactive() {
            return false;
        }
        if cfg!(windows) {
            return true;
        }
        !(self.term.is_empty() || self.term == "dumb")
    }

    /// Live progress goes to stderr, so both streams must be terminals
    pub fn shows_live_progress(&self) -> bool {
        self.is_interactive() && self.stderr_tty && self.supports_ansi()
    }

    /// Prompts need a person on stdin as well as stdout
    pub fn can_prompt(&self) -> bool {
        self.stdin_tty && self.is_interactive()
    }
}

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    Capabilities::detect().is_interactive()
}

/// Check if the terminal supports ANSI escape codes for colors and progress bars
pub fn supports_ansi() -> bool {
    Capabilities::detect().supports_ansi()
}

/// Determine if progress bars should be shown by default
pub fn should_show_progress_by_default() -> bool {
    Capabilities::detect().shows_live_progress()
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    CI_VARS.iter().any(|var| env::var(var).is_ok())
}
