//! Aggregates the output of an external source analyzer into one frozen
//! model and materializes it as a static documentation site.
//!
//! A build runs two concurrent scan phases (manual documents and API
//! elements), joins them into an immutable [`Letter`], then writes every
//! page under the output directory with the entry page strictly last. An
//! optional hosting authority enriches the site with repository metadata
//! fetched through a time-boxed cache.
//!
//! ```no_run
//! use letterpress::{Letterpress, scan::json::JsonAnalyzer};
//!
//! # fn main() -> letterpress::Result<()> {
//! let letter = Letterpress::new("Widget Works", "target/site")
//! 	.with_source("elements")
//! 	.with_document("elements/docs")
//! 	.with_host("https://github.com/example/widgets")
//! 	.write(&JsonAnalyzer::new())?;
//! println!("{} types documented", letter.types().len());
//! # Ok(())
//! # }
//! ```

/// Build configuration and the per-build snapshot.
pub mod config;
/// Error types.
pub mod error;
/// Repository hosting adapters.
pub mod host;
/// The aggregation model.
pub mod model;
/// Scan orchestration and the analyzer boundary.
pub mod scan;
/// Site materialization.
pub mod site;

pub use self::config::{BuildConfig, Letterpress};
pub use self::error::{LetterpressError, Result};
pub use self::model::{Doodle, Letter, TypeDescriptor};
pub use self::scan::diagnostics::{Diagnostic, DiagnosticListener, Severity};
