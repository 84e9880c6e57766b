//! CLI output implementation.

use super::{Output, OutputConfig};
use crate::styles::{self, colors_enabled, colors_enabled_stderr};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

/// CLI output implementation that writes directly to stdout/stderr.
///
/// Git-like output format:
/// - `step()` -> verbose only, no prefix
/// - `result()` -> primary output, always shown (unless quiet)
/// - `warning()` -> `eprintln!("warning: {msg}")`
/// - `error()` -> `eprintln!("error: {msg}")`
pub struct CliOutput {
    config: OutputConfig,
    spinner: Option<ProgressBar>,
}

impl CliOutput {
    /// Create a new CLI output with the given configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            spinner: None,
        }
    }

    /// Create a CLI output with default (non-quiet, non-verbose) settings.
    pub fn default_output() -> Self {
        Self::new(OutputConfig::default())
    }

    /// Print a line to stdout, suspending any active spinner first.
    fn stdout_line(&self, line: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.suspend(|| println!("{line}"));
        } else {
            println!("{line}");
        }
    }

    /// Print a line to stderr, printing above any active spinner.
    fn stderr_line(&self, line: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.println(line);
        } else {
            eprintln!("{line}");
        }
    }

    /// Start a spinner carrying `msg`, used while a long fetch/index step
    /// has no finer-grained progress to report. No-op in quiet mode, tests,
    /// or when stderr isn't a TTY.
    pub fn start_spinner(&mut self, msg: &str) {
        if self.config.quiet {
            return;
        }
        if cfg!(test) || env::var("GITCLONE_TESTING").is_ok() {
            return;
        }
        if !colors_enabled_stderr() {
            return;
        }

        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars(
                "\u{2807}\u{2819}\u{2839}\u{2838}\u{283c}\u{2834}\u{2826}\u{2827}\u{2807}\u{280f}",
            );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(msg.to_string());
        spinner.tick();
        spinner.enable_steady_tick(Duration::from_millis(80));

        self.spinner = Some(spinner);
    }

    /// Stop and clear the active spinner, if any.
    pub fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
            use std::io::Write;
            let _ = std::io::stderr().write_all(b"\x1b[2K\r");
            let _ = std::io::stderr().flush();
        }
    }
}

impl Output for CliOutput {
    fn info(&mut self, msg: &str) {
        if !self.config.quiet {
            self.stdout_line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                self.stdout_line(&format!("{}{msg}{}", styles::GREEN, styles::RESET));
            } else {
                self.stdout_line(msg);
            }
        }
    }

    fn warning(&mut self, msg: &str) {
        if colors_enabled_stderr() {
            self.stderr_line(&format!(
                "{}warning:{} {msg}",
                styles::YELLOW,
                styles::RESET
            ));
        } else {
            self.stderr_line(&format!("warning: {msg}"));
        }
    }

    fn error(&mut self, msg: &str) {
        if colors_enabled_stderr() {
            self.stderr_line(&format!("{}error:{} {msg}", styles::RED, styles::RESET));
        } else {
            self.stderr_line(&format!("error: {msg}"));
        }
    }

    fn debug(&mut self, msg: &str) {
        if self.config.verbose {
            if colors_enabled() {
                self.stdout_line(&format!("{}debug: {msg}{}", styles::DIM, styles::RESET));
            } else {
                self.stdout_line(&format!("debug: {msg}"));
            }
        }
    }

    fn step(&mut self, msg: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(msg.to_string());
            return;
        }
        if self.config.verbose && !self.config.quiet {
            if colors_enabled() {
                self.stdout_line(&format!("{}{msg}{}", styles::DIM, styles::RESET));
            } else {
                self.stdout_line(msg);
            }
        }
    }

    fn result(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                self.stdout_line(&format!("{}{msg}{}", styles::BOLD, styles::RESET));
            } else {
                self.stdout_line(msg);
            }
        }
    }

    fn detail(&mut self, key: &str, value: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                self.stdout_line(&format!(
                    "  {}{key}:{} {value}",
                    styles::BOLD,
                    styles::RESET
                ));
            } else {
                self.stdout_line(&format!("  {key}: {value}"));
            }
        }
    }

    fn list_item(&mut self, item: &str) {
        if !self.config.quiet {
            self.stdout_line(&format!(" - {item}"));
        }
    }

    fn operation_start(&mut self, operation: &str) {
        self.step(operation);
    }

    fn operation_end(&mut self, operation: &str, success: bool) {
        if self.config.verbose && !self.config.quiet {
            if success {
                self.stdout_line(&format!("{operation} completed"));
            } else {
                self.stderr_line(&format!("{operation} failed"));
            }
        }
    }

    fn raw(&mut self, content: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.suspend(|| print!("{content}"));
        } else {
            print!("{content}");
        }
    }

    fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    fn is_verbose(&self) -> bool {
        self.config.verbose
    }
}

impl Drop for CliOutput {
    fn drop(&mut self) {
        self.finish_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_output_default() {
        let output = CliOutput::default_output();
        assert!(!output.is_quiet());
        assert!(!output.is_verbose());
    }

    #[test]
    fn test_cli_output_config() {
        let config = OutputConfig::new(true, true);
        let output = CliOutput::new(config);
        assert!(output.is_quiet());
        assert!(output.is_verbose());
    }
}
