//! Terminal text styling utilities.
//!
//! Provides clean abstractions for ANSI terminal styling, keeping escape codes
//! isolated from application code.

use std::io::IsTerminal;
use std::sync::OnceLock;

/// ANSI escape code for bold text.
pub const BOLD: &str = "\x1b[1m";
/// ANSI escape code for dim text.
pub const DIM: &str = "\x1b[2m";
/// ANSI escape code for green text.
pub const GREEN: &str = "\x1b[32m";
/// ANSI escape code for yellow text.
pub const YELLOW: &str = "\x1b[33m";
/// ANSI escape code for red text.
pub const RED: &str = "\x1b[31m";
/// ANSI escape code to reset all styling.
pub const RESET: &str = "\x1b[0m";

static STDOUT_TTY: OnceLock<bool> = OnceLock::new();
static STDERR_TTY: OnceLock<bool> = OnceLock::new();

/// Whether ANSI styling should be used for stdout.
///
/// Respects `NO_COLOR` and falls back to a TTY check, same convention as
/// most git-adjacent CLIs.
pub fn colors_enabled() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    *STDOUT_TTY.get_or_init(|| std::io::stdout().is_terminal())
}

/// Same as [`colors_enabled`] but checks stderr, since warnings/errors are
/// written there and may be redirected independently of stdout.
pub fn colors_enabled_stderr() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    *STDERR_TTY.get_or_init(|| std::io::stderr().is_terminal())
}

/// Wraps text in bold styling.
pub fn bold(text: &str) -> String {
    format!("{BOLD}{text}{RESET}")
}
