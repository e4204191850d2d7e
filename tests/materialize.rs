//! End-to-end tests: element dumps in, a complete site out.

mod utils;

use std::fs;

use letterpress::Letterpress;
use letterpress::model::SymbolId;
use letterpress::scan::diagnostics::Severity;
use letterpress::scan::json::JsonAnalyzer;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use utils::collecting_listener;

/// Write a project layout of analyzer element dumps: API elements under
/// `elements/`, manuals and samples under `manuals/`.
fn project() -> Result<TempDir, Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	fs::create_dir_all(dir.path().join("elements"))?;
	fs::create_dir_all(dir.path().join("manuals"))?;

	fs::write(
		dir.path().join("elements/widget.json"),
		r#"{
			"modules": ["sample.core"],
			"packages": ["sample"],
			"types": [
				{
					"id": "Widget",
					"package": "sample",
					"symbol": "sample.Widget",
					"ancestors": {"superclasses": ["sample.Gadget"]},
					"members": [{"name": "spin", "comment": "Spins the widget."}],
					"comment": "A spinning widget."
				},
				{"id": "Gadget", "package": "sample", "symbol": "sample.Gadget"}
			]
		}"#,
	)?;
	fs::write(
		dir.path().join("manuals/GuideManual.json"),
		r#"{
			"types": [
				{
					"id": "GuideManual",
					"package": "manual",
					"symbol": "manual.GuideManual",
					"title": "Guide",
					"sections": [{"id": "install", "title": "Install"}]
				}
			]
		}"#,
	)?;
	fs::write(
		dir.path().join("manuals/WidgetTest.json"),
		r#"{
			"types": [
				{
					"id": "WidgetTest",
					"package": "sample",
					"symbol": "sample.WidgetTest",
					"members": [
						{
							"name": "spins",
							"refs": ["Widget#spin"],
							"source": "widget.spin();",
							"comment": "Demonstrates spinning."
						}
					]
				}
			]
		}"#,
	)?;
	Ok(dir)
}

#[test]
fn build_materializes_every_page_with_the_entry_page_last(
) -> Result<(), Box<dyn std::error::Error>> {
	let dir = project()?;
	let out = dir.path().join("site");
	let (listener, collected) = collecting_listener();

	let letter = Letterpress::new("Widget Works", &out)
		.with_description("Widgets, documented.")
		.with_source(dir.path().join("elements"))
		.with_document(dir.path().join("manuals"))
		.with_listener(listener)
		.write(&JsonAnalyzer::new())?;

	// The aggregate saw both phases.
	assert_eq!(letter.documents()[0].id, "GuideManual");
	assert_eq!(letter.doodle("Widget#spin").len(), 1);
	assert_eq!(
		letter.subtypes_of(&SymbolId::new("sample.Gadget")),
		[SymbolId::new("sample.Widget")]
	);

	// Every page landed on disk.
	assert!(out.join("main.css").exists());
	assert!(out.join("api/Widget.html").exists());
	assert!(out.join("doc/GuideManual.html").exists());
	assert!(out.join("doc/onepager.html").exists());
	assert!(out.join("index.html").exists());
	// No hosting authority, so no changelog page.
	assert!(!out.join("doc/changelog.html").exists());

	// Type pages inline the registered sample snippets.
	let widget_page = fs::read_to_string(out.join("api/Widget.html"))?;
	assert!(widget_page.contains("widget.spin();"));
	assert!(widget_page.contains("sample.Widget") || widget_page.contains("Widget"));

	// Document pages carry their section anchors.
	let guide_page = fs::read_to_string(out.join("doc/GuideManual.html"))?;
	assert!(guide_page.contains("id=\"install\""));

	// The entry page is the very last artifact reported.
	let collected = collected.lock().unwrap();
	let site_notes: Vec<&str> = collected
		.iter()
		.filter(|d| d.code == "site" && d.severity == Severity::Note)
		.map(|d| d.message.as_str())
		.collect();
	assert_eq!(site_notes.last(), Some(&"Wrote index.html"));
	assert!(site_notes.contains(&"Wrote main.css"));
	assert!(site_notes.contains(&"Wrote api/Widget.html"));
	assert!(site_notes.contains(&"Wrote doc/onepager.html"));

	Ok(())
}

#[test]
fn rebuild_cleans_stale_output_but_spares_protected_paths(
) -> Result<(), Box<dyn std::error::Error>> {
	let dir = project()?;
	let out = dir.path().join("site");
	fs::create_dir_all(&out)?;
	fs::write(out.join("stale.html"), "old")?;
	fs::write(out.join("CNAME"), "docs.example.org")?;
	fs::write(out.join(".nojekyll"), "")?;

	Letterpress::new("Widget Works", &out)
		.with_source(dir.path().join("elements"))
		.with_protected("CNAME")
		.mute()
		.write(&JsonAnalyzer::new())?;

	assert!(!out.join("stale.html").exists());
	assert!(out.join("CNAME").exists());
	assert!(out.join(".nojekyll").exists());
	assert!(out.join("index.html").exists());

	Ok(())
}

#[test]
fn builds_without_manuals_still_produce_an_entry_page() -> Result<(), Box<dyn std::error::Error>> {
	let dir = project()?;
	let out = dir.path().join("site");

	let letter = Letterpress::new("Widget Works", &out)
		.with_source(dir.path().join("elements"))
		.mute()
		.write(&JsonAnalyzer::new())?;

	assert!(letter.documents().is_empty());
	assert!(out.join("index.html").exists());
	assert!(out.join("doc/onepager.html").exists());
	assert!(!out.join("doc/GuideManual.html").exists());

	Ok(())
}
