//! Operator interaction seam.
//!
//! The pipeline never reads stdin or prints directly; frontends implement
//! [`Operator`] (the CLI uses dialoguer) and tests script it.

/// Severity of an operator-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Phase headings.
    Phase,
    Info,
    Success,
    Warning,
    Error,
}

pub trait Operator {
    /// Ask for a line of text. Empty input is allowed.
    fn input(&mut self, prompt: &str) -> anyhow::Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;

    /// Show a progress or diagnostic message.
    fn notice(&mut self, level: Notice, message: &str);
}
