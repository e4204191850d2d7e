use std::fmt;

use serde_json::Error as SerdeError;

/// Aggregate errors produced by the letterpress build pipeline.
#[derive(Debug)]
pub enum LetterpressError {
	/// A scan phase reported non-success from the external analyzer.
	Scan {
		/// Short code tag identifying the failing phase.
		code: &'static str,
		/// Human-readable failure description.
		message: String,
	},
	/// A remote fetch failed or timed out after exhausting retries.
	Fetch(String),
	/// The configured repository URI could not be resolved to a hosting service.
	InvalidHost(String),
	/// Failed to encode or decode JSON.
	Serialization(SerdeError),
	/// Failed to perform IO operations.
	Io(std::io::Error),
}

impl fmt::Display for LetterpressError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scan { code, message } => write!(f, "[{code}] {message}"),
			Self::Fetch(message) => write!(f, "{message}"),
			Self::InvalidHost(message) => write!(f, "{message}"),
			Self::Serialization(err) => write!(f, "{err}"),
			Self::Io(err) => write!(f, "{err}"),
		}
	}
}

impl std::error::Error for LetterpressError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Serialization(err) => Some(err),
			Self::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<SerdeError> for LetterpressError {
	fn from(err: SerdeError) -> Self {
		Self::Serialization(err)
	}
}

impl From<std::io::Error> for LetterpressError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

/// Result type returned by the letterpress library.
pub type Result<T> = std::result::Result<T, LetterpressError>;
