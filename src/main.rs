//! CLI entrypoint.

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use letterpress::scan::diagnostics::{Diagnostic, Severity};
use letterpress::scan::json::JsonAnalyzer;
use letterpress::site::StyleScheme;
use letterpress::Letterpress;
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the letterpress CLI.
struct Cli {
	/// Directory the generated site is written to
	#[arg(short = 'O', long, default_value = "site")]
	output: PathBuf,

	/// Site title shown on every page
	#[arg(short = 't', long)]
	title: String,

	/// Short site description
	#[arg(short = 'd', long, default_value = "")]
	description: String,

	/// Source root holding analyzer element dumps (repeatable)
	#[arg(short = 's', long = "source")]
	sources: Vec<PathBuf>,

	/// Document root holding manual and sample dumps (repeatable)
	#[arg(short = 'D', long = "document")]
	documents: Vec<PathBuf>,

	/// Classpath entry for symbol resolution (repeatable)
	#[arg(long = "classpath")]
	classpath: Vec<PathBuf>,

	/// Repository URI, e.g. https://github.com/owner/name
	#[arg(short = 'H', long)]
	host: Option<String>,

	/// External documentation site to link foreign symbols against (repeatable)
	#[arg(long = "external-doc")]
	external_docs: Vec<String>,

	/// Character encoding of sources and generated pages
	#[arg(long, default_value = "utf-8")]
	charset: String,

	/// Accent color for the generated stylesheet
	#[arg(long)]
	accent: Option<String>,

	/// Output path spared from the pre-write clean (repeatable)
	#[arg(long = "keep")]
	protected: Vec<String>,

	/// Suppress progress output
	#[arg(short = 'q', long, default_value_t = false)]
	quiet: bool,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

fn should_color_output(cli: &Cli) -> bool {
	if cli.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stderr().is_terminal()
}

/// Print one diagnostic with a colored severity tag.
fn print_diagnostic(diagnostic: &Diagnostic, color: bool) {
	if !color {
		eprintln!("{diagnostic}");
		return;
	}
	let severity = match diagnostic.severity {
		Severity::Note => diagnostic.severity.to_string().green().to_string(),
		Severity::Warning => diagnostic.severity.to_string().yellow().bold().to_string(),
		Severity::Error => diagnostic.severity.to_string().red().bold().to_string(),
	};
	eprintln!("{severity}:{}: {}", diagnostic.code, diagnostic.message);
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
	let color = should_color_output(&cli);

	let mut builder = Letterpress::new(&cli.title, &cli.output)
		.with_description(&cli.description)
		.with_charset(&cli.charset);

	for source in &cli.sources {
		builder = builder.with_source(source);
	}
	for document in &cli.documents {
		builder = builder.with_document(document);
	}
	for entry in &cli.classpath {
		builder = builder.with_classpath(entry);
	}
	for url in &cli.external_docs {
		builder = builder.use_external_doc(url);
	}
	for pattern in &cli.protected {
		builder = builder.with_protected(pattern);
	}
	if let Some(host) = &cli.host {
		builder = builder.with_host(host);
	}
	if let Some(accent) = &cli.accent {
		builder = builder.with_scheme(StyleScheme {
			accent: accent.clone(),
			..StyleScheme::default()
		});
	}

	builder = if cli.quiet {
		builder.mute()
	} else {
		builder.with_listener(Arc::new(move |diagnostic| {
			print_diagnostic(diagnostic, color);
		}))
	};

	let letter = builder.write(&JsonAnalyzer::new())?;

	if !cli.quiet {
		eprintln!(
			"Materialized {} types and {} documents under {}",
			letter.types().len(),
			letter.documents().len(),
			cli.output.display()
		);
	}
	Ok(())
}

fn main() {
	let cli = Cli::parse();
	if let Err(e) = run(cli) {
		eprintln!("{e}");
		process::exit(1);
	}
}
