//! Integration tests for the scan orchestrator and the frozen aggregate.

mod utils;

use std::path::PathBuf;

use letterpress::model::SymbolId;
use letterpress::scan::analyzer::ScanKind;
use letterpress::scan::diagnostics::{Severity, silent_listener};
use letterpress::scan::scan;
use letterpress::{BuildConfig, TypeDescriptor};
use pretty_assertions::assert_eq;
use utils::{StubAnalyzer, collecting_listener, descriptor};

fn config() -> BuildConfig {
	BuildConfig {
		title: "Sample".to_string(),
		address: PathBuf::from("target/test-site"),
		description: String::new(),
		charset: "utf-8".to_string(),
		sources: Vec::new(),
		documents: Vec::new(),
		classpath: Vec::new(),
		external_docs: Vec::new(),
		listener: silent_listener(),
		authority: None,
	}
}

fn with_ancestor(mut info: TypeDescriptor, ancestor: &str) -> TypeDescriptor {
	info.ancestors.superclasses.push(SymbolId::new(ancestor));
	info
}

#[test]
fn both_phases_merge_into_one_frozen_aggregate() {
	let analyzer = StubAnalyzer {
		files: vec![PathBuf::from("manuals/GuideManual.json")],
		document_types: vec![
			descriptor("SetupManual", "manual"),
			descriptor("GuideManual", "manual"),
		],
		api_modules: vec!["sample.core".to_string()],
		api_packages: vec!["sample".to_string()],
		api_types: vec![
			with_ancestor(descriptor("Widget", "sample"), "sample.Gadget"),
			descriptor("Gadget", "sample"),
		],
		fail: None,
	};

	let mut config = config();
	config.documents = vec![PathBuf::from("manuals")];
	let letter = scan(&config, &analyzer).unwrap();

	// Manual documents keep newest-discovery-first order.
	let ids: Vec<&str> = letter.documents().iter().map(|d| d.id.as_str()).collect();
	assert_eq!(ids, vec!["GuideManual", "SetupManual"]);

	// API collections are frozen sorted.
	assert_eq!(letter.modules(), ["sample.core"]);
	assert_eq!(letter.packages(), ["sample"]);
	let types: Vec<&str> = letter.types().iter().map(|t| t.id.as_str()).collect();
	assert_eq!(types, vec!["Gadget", "Widget"]);

	// Subtype back-edges point from ancestor to discovered descendant.
	let subtypes = letter.subtypes_of(&SymbolId::new("sample.Gadget"));
	assert_eq!(subtypes, [SymbolId::new("sample.Widget")]);

	// The outline mirrors the document order.
	assert_eq!(
		letter.doc().map(|node| node.path.as_str()),
		Some("doc/GuideManual.html")
	);
}

#[test]
fn document_phase_is_skipped_without_document_roots() {
	// A document-phase failure cannot surface when the phase never runs.
	let analyzer = StubAnalyzer {
		api_types: vec![descriptor("Widget", "sample")],
		fail: Some(ScanKind::Documents),
		..StubAnalyzer::default()
	};

	let (listener, collected) = collecting_listener();
	let mut config = config();
	config.listener = listener;
	let letter = scan(&config, &analyzer).unwrap();

	assert!(letter.documents().is_empty());
	assert!(letter.doc().is_none());
	let collected = collected.lock().unwrap();
	assert!(collected.iter().all(|d| d.code != "doc"));
}

#[test]
fn empty_document_phase_reports_a_note_and_continues() {
	let analyzer = StubAnalyzer {
		// No file survives the candidate filter: wrong root, wrong suffix.
		files: vec![PathBuf::from("src/Widget.json")],
		api_types: vec![descriptor("Widget", "sample")],
		..StubAnalyzer::default()
	};

	let (listener, collected) = collecting_listener();
	let mut config = config();
	config.documents = vec![PathBuf::from("manuals")];
	config.listener = listener;
	let letter = scan(&config, &analyzer).unwrap();

	assert!(letter.documents().is_empty());
	let collected = collected.lock().unwrap();
	assert!(collected
		.iter()
		.any(|d| d.code == "doc" && d.severity == Severity::Note));
}

#[test]
fn failing_api_phase_aborts_the_build() {
	let analyzer = StubAnalyzer {
		fail: Some(ScanKind::Api),
		..StubAnalyzer::default()
	};

	let (listener, collected) = collecting_listener();
	let mut config = config();
	config.listener = listener;
	let result = scan(&config, &analyzer);

	assert!(result.is_err());
	let collected = collected.lock().unwrap();
	assert!(collected
		.iter()
		.any(|d| d.code == "api" && d.severity == Severity::Error));
}

#[test]
fn sample_registrations_come_from_member_cross_references() {
	let mut test_type = descriptor("WidgetTest", "sample");
	test_type.members.push(letterpress::model::MemberDescriptor {
		name: "spins".to_string(),
		refs: vec!["Widget#spin".to_string()],
		source: Some("widget.spin();".to_string()),
		comment: Some("Demonstrates spinning.".to_string()),
		region: None,
	});

	let analyzer = StubAnalyzer {
		files: vec![PathBuf::from("manuals/WidgetTest.json")],
		document_types: vec![test_type],
		api_types: vec![descriptor("Widget", "sample")],
		..StubAnalyzer::default()
	};

	let mut config = config();
	config.documents = vec![PathBuf::from("manuals")];
	let letter = scan(&config, &analyzer).unwrap();

	let doodles = letter.doodle("Widget#spin");
	assert_eq!(doodles.len(), 1);
	assert_eq!(doodles[0].code, "widget.spin();");
	assert_eq!(doodles[0].comment.as_deref(), Some("Demonstrates spinning."));
}
