//! Terminal frontend for the deployment pipeline.
//!
//! Prompts use dialoguer; progress lines are written to a writer so the
//! rendering can be checked in tests.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use sfdeploy_core::prompt::{Notice, Operator};

/// [`Operator`] backed by the controlling terminal.
pub struct TerminalOperator<W: Write = io::Stdout> {
    /// Output writer (for testing)
    writer: W,
    /// Theme for dialoguer prompts
    theme: ColorfulTheme,
}

impl TerminalOperator<io::Stdout> {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalOperator<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalOperator<W> {
    /// Create an operator with custom writer (for testing).
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            style("  SmartFoxServer Extension Deployer").bold().cyan()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn render(&mut self, level: Notice, message: &str) -> io::Result<()> {
        match level {
            Notice::Phase => {
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", style(message).bold())?;
                writeln!(self.writer, "  ───────────────────────────")
            }
            Notice::Info => writeln!(self.writer, "  {}", message),
            Notice::Success => writeln!(self.writer, "{} {}", style("✓").green(), message),
            Notice::Warning => writeln!(self.writer, "  {} {}", style("⚠").yellow(), message),
            Notice::Error => writeln!(self.writer, "{} {}", style("✗").red(), style(message).red()),
        }
    }
}

impl<W: Write> Operator for TerminalOperator<W> {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(confirmed)
    }

    fn notice(&mut self, level: Notice, message: &str) {
        if let Err(err) = self.render(level, message) {
            tracing::debug!(error = %err, "could not write to terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(level: Notice, message: &str) -> String {
        console::set_colors_enabled(false);
        let mut output = Vec::new();
        let mut operator = TerminalOperator::with_writer(&mut output);
        operator.notice(level, message);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_phase_heading_has_rule() {
        let text = rendered(Notice::Phase, "[2/5] Compiling extension");
        assert!(text.contains("[2/5] Compiling extension\n"));
        assert!(text.contains("───"));
    }

    #[test]
    fn test_notice_markers() {
        assert_eq!(rendered(Notice::Success, "Deployed"), "✓ Deployed\n");
        assert_eq!(rendered(Notice::Warning, "old.jar locked"), "  ⚠ old.jar locked\n");
        assert_eq!(rendered(Notice::Error, "bad name"), "✗ bad name\n");
        assert_eq!(rendered(Notice::Info, "Using Java"), "  Using Java\n");
    }

    #[test]
    fn test_header() {
        console::set_colors_enabled(false);
        let mut output = Vec::new();
        TerminalOperator::with_writer(&mut output).print_header().unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("SmartFoxServer Extension Deployer"));
    }
}
