//! Output abstraction layer for separating IO from business logic.
//!
//! This module provides the `Output` trait that abstracts all output operations.
//! Core orchestration code accepts `&mut dyn ProgressSink` (see
//! [`crate::core::ProgressSink`]); the command layer bridges that to a
//! concrete `Output` implementation via [`crate::core::OutputSink`].

mod cli;

pub use cli::CliOutput;
pub use test::{OutputEntry, TestOutput};

/// Configuration for output behavior.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suppress most output when true.
    pub quiet: bool,
    /// Enable debug/verbose output when true.
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            verbose: false,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

/// Trait for abstracting output operations.
///
/// This trait separates output concerns from business logic, enabling CLI
/// output (current behavior) and test implementations for verifying output.
/// Implementors should respect `quiet` and `verbose` modes where appropriate.
pub trait Output {
    /// Display an informational message. Respects quiet mode.
    fn info(&mut self, msg: &str);

    /// Display a success message. Respects quiet mode.
    fn success(&mut self, msg: &str);

    /// Display a warning message to stderr. Always shown.
    fn warning(&mut self, msg: &str);

    /// Display an error message to stderr. Always shown.
    fn error(&mut self, msg: &str);

    /// Display a debug message. Only shown in verbose mode.
    fn debug(&mut self, msg: &str);

    /// Display an intermediate step message. Only shown in verbose mode.
    fn step(&mut self, msg: &str);

    /// Display a final result message. The primary success output.
    fn result(&mut self, msg: &str);

    /// Display a key-value detail. Renders as "  Key: value" in CLI.
    fn detail(&mut self, key: &str, value: &str);

    /// Display a list item. Renders as " - item" in CLI.
    fn list_item(&mut self, item: &str);

    /// Signal the start of a long-running operation.
    fn operation_start(&mut self, operation: &str);

    /// Signal the end of a long-running operation.
    fn operation_end(&mut self, operation: &str, success: bool);

    /// Output raw, unformatted content.
    fn raw(&mut self, content: &str);

    /// Check if quiet mode is enabled.
    fn is_quiet(&self) -> bool;

    /// Check if verbose mode is enabled.
    fn is_verbose(&self) -> bool;
}
