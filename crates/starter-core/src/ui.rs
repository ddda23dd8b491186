//! Progress reporting and prompting capabilities
//!
//! The engine never writes to the console itself; it talks to these traits.
//! The `tui` feature provides cliclack-backed implementations.

/// Receives progress for long-running steps
pub trait Reporter {
    /// A step has begun
    fn start(&self, message: &str);

    /// The current step finished successfully
    fn succeed(&self, message: &str);

    /// The current step failed
    fn fail(&self, message: &str);
}

/// Supplies answers the caller did not provide up front
pub trait Prompter {
    /// Ask a question. `None` means no answer is available (cancelled or
    /// non-interactive). Optional questions may be answered with an empty
    /// string.
    fn ask(&self, message: &str, optional: bool) -> Option<String>;
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn start(&self, _message: &str) {}
    fn succeed(&self, _message: &str) {}
    fn fail(&self, _message: &str) {}
}

/// Prompter for non-interactive runs; never answers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&self, _message: &str, _optional: bool) -> Option<String> {
        None
    }
}
