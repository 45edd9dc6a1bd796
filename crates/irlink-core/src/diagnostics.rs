//! Message logging.
//!
//! Passes report user-facing conditions through a [`MessageLogger`]: a severity,
//! a message and the best source [`Location`] that could be found. The sink
//! decides what to do with them; [`Diagnostics`] collects them for later
//! inspection and [`TracingMessageLogger`] forwards them to `tracing`.
//!
//! # Examples
//!
//! ```
//! use irlink_core::{Diagnostics, Location, MessageLogger, Severity};
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.report(
//!     Severity::Warning,
//!     "Function 'Foo.bar' uses unlinked symbols",
//!     Some(&Location::new("b @ main.kt", Some(3), Some(5))),
//! );
//!
//! assert_eq!(diagnostics.warning_count(), 1);
//! assert!(!diagnostics.has_errors());
//! assert_eq!(
//!     diagnostics.to_string(),
//!     "b @ main.kt:3:5: warning: Function 'Foo.bar' uses unlinked symbols\n"
//! );
//! ```

use std::collections::VecDeque;
use std::fmt;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Something that makes the output unusable.
    Error,
    /// Something the user should look at; the output is still produced.
    Warning,
    /// Informational.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Where a message points to.
///
/// Line and column are 1-based. They are `None` when the element has no
/// coordinates (synthesized declarations and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// `"<module> @ <file path>"`.
    pub path: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Location {
    /// Create a location.
    pub fn new(path: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// Receives messages from passes.
pub trait MessageLogger {
    /// Report one message.
    fn report(&mut self, severity: Severity, message: &str, location: Option<&Location>);
}

impl<L: MessageLogger + ?Sized> MessageLogger for &mut L {
    fn report(&mut self, severity: Severity, message: &str, location: Option<&Location>) {
        (**self).report(severity, message, location);
    }
}

impl<L: MessageLogger + ?Sized> MessageLogger for Box<L> {
    fn report(&mut self, severity: Severity, message: &str, location: Option<&Location>) {
        (**self).report(severity, message, location);
    }
}

/// A single reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}: {}", location, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collects every reported message in order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Creates a new, empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.has_errors = false;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Write every diagnostic, one per line.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl MessageLogger for Diagnostics {
    fn report(&mut self, severity: Severity, message: &str, location: Option<&Location>) {
        self.add_diagnostic(Diagnostic {
            severity,
            message: message.to_owned(),
            location: location.cloned(),
        });
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// Forwards every message to `tracing` under the `irlink` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMessageLogger;

impl MessageLogger for TracingMessageLogger {
    fn report(&mut self, severity: Severity, message: &str, location: Option<&Location>) {
        let location = location.map(ToString::to_string).unwrap_or_default();
        match severity {
            Severity::Error => tracing::error!(target: "irlink", %location, "{message}"),
            Severity::Warning => tracing::warn!(target: "irlink", %location, "{message}"),
            Severity::Info => tracing::info!(target: "irlink", %location, "{message}"),
        }
    }
}
