//! Build progress reporting through a single listener callback.
//!
//! Every scan and materialization step reports a severity, a short code tag
//! and a message. This channel is the only externally observable progress
//! signal; fatal errors emit a diagnostic before they propagate so operators
//! have context even when the process exits abnormally.

use std::fmt;
use std::sync::Arc;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	/// Informational progress message.
	Note,
	/// Suspicious but non-fatal condition.
	Warning,
	/// Fatal condition; the build is about to abort.
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Note => f.write_str("note"),
			Self::Warning => f.write_str("warning"),
			Self::Error => f.write_str("error"),
		}
	}
}

/// One reported build event.
#[derive(Debug, Clone)]
pub struct Diagnostic {
	/// Severity classification.
	pub severity: Severity,
	/// Short code tag identifying the reporting step, e.g. `api` or `site`.
	pub code: String,
	/// Human-readable message.
	pub message: String,
}

impl Diagnostic {
	/// Create a note-level diagnostic.
	pub fn note(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Note,
			code: code.into(),
			message: message.into(),
		}
	}

	/// Create a warning-level diagnostic.
	pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			code: code.into(),
			message: message.into(),
		}
	}

	/// Create an error-level diagnostic.
	pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Error,
			code: code.into(),
			message: message.into(),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}: {}", self.severity, self.code, self.message)
	}
}

/// Shared listener invoked for every reported diagnostic.
///
/// Listeners must be callable from both scan phases concurrently.
pub type DiagnosticListener = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// A listener that prints every diagnostic to standard output.
pub fn stdout_listener() -> DiagnosticListener {
	Arc::new(|diagnostic| println!("{diagnostic}"))
}

/// A listener that discards every diagnostic.
pub fn silent_listener() -> DiagnosticListener {
	Arc::new(|_| {})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_matches_kind_code_message_shape() {
		let diagnostic = Diagnostic::note("api", "Succeeded in scanning API sources.");
		assert_eq!(
			diagnostic.to_string(),
			"note:api: Succeeded in scanning API sources."
		);
	}

	#[test]
	fn severity_ordering_of_constructors() {
		assert_eq!(Diagnostic::warning("x", "y").severity, Severity::Warning);
		assert_eq!(Diagnostic::error("x", "y").severity, Severity::Error);
	}
}
