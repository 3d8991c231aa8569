//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on flags and configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    pub fn use_color(&self) -> bool {
        !self.no_color && self.resolved_format == OutputFormat::Human
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Section header.
    pub fn header(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color() {
            format!("{}", msg.bold())
        } else {
            msg.to_string()
        };
        self.term.write_line(&line)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color() {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        } else {
            format!("\u{2713} {msg}")
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`. *Not* suppressed in quiet mode — errors
    /// must always be visible.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.use_color() {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        } else {
            format!("\u{2717} {msg}")
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color() {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        } else {
            format!("\u{26a0} {msg}")
        };
        self.term.write_line(&line)
    }

    /// Informational line: `• <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color() {
            format!("{} {}", "\u{2022}".blue(), msg)
        } else {
            format!("\u{2022} {msg}")
        };
        self.term.write_line(&line)
    }
}
