//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdout};

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    // Check if stdout is a terminal
    if !stdout().is_terminal() {
        return false;
    }

    // Check for CI environments that might have TTY but shouldn't be interactive
    if is_ci_environment() {
        return false;
    }

    // Check for non-interactive shell indicators
    if env::var("DEBIAN_FRONTEND").unwrap_or_default() == "noninteractive" {
        return false;
    }

    true
}

/// Check if the terminal supports ANSI escape codes
pub fn supports_ansi() -> bool {
    // If not interactive, no ANSI support
    if !is_interactive() {
        return false;
    }

    // Check TERM environment variable
    let term = env::var("TERM").unwrap_or_default();
    if term == "dumb" || term.is_empty() {
        return false;
    }

    // Windows Terminal, ConEmu, and modern Windows consoles support ANSI
    #[cfg(windows)]
    {
        // Check for Windows Terminal
        if env::var("WT_SESSION").is_ok() {
            return true;
        }
        // Check for ConEmu
        if env::var("ConEmuANSI").unwrap_or_default() == "ON" {
            return true;
        }
        // Check Windows version for native ANSI support (Windows 10+)
        // For now, assume modern Windows supports it
        return true;
    }

    // Unix-like systems generally support ANSI unless TERM=dumb
    #[cfg(unix)]
    {
        true
    }
}

/// Check if stderr is connected to a terminal (for progress display)
pub fn stderr_is_terminal() -> bool {
    stderr().is_terminal()
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    // Check common CI environment variables
    let ci_vars = [
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
        "TF_BUILD", // Azure DevOps
    ];

    ci_vars.iter().any(|var| env::var(var).is_ok())
}

/// Determine if job progress should be shown by default
pub fn should_show_progress_by_default() -> bool {
    // Job progress is written to stderr
    is_interactive() && stderr_is_terminal() && supports_ansi()
}

/// Whether colored output should be used on stdout
pub fn color_enabled(configured: bool) -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    configured && supports_ansi()
}
