//! Static assets shipped with every generated site.
//!
//! Scripts and the icon are emitted verbatim; the stylesheet is compiled
//! from a template so a build can restyle the site without replacing files
//! after materialization.

/// Stylesheet template. `@accent@` and `@background@` are substituted at
/// materialization time.
pub const MAIN_CSS: &str = r#"
:root {
	--accent: @accent@;
	--background: @background@;
	--ink: #1c1c1c;
}

* {
	box-sizing: border-box;
}

body {
	margin: 0;
	color: var(--ink);
	background: var(--background);
	font-family: "Segoe UI", "Helvetica Neue", sans-serif;
	line-height: 1.6;
}

header {
	padding: 1rem 2rem;
	border-bottom: 2px solid var(--accent);
}

header h1 {
	margin: 0;
	font-size: 1.4rem;
}

nav ul {
	list-style: none;
	padding-left: 1rem;
}

nav a {
	color: var(--accent);
	text-decoration: none;
}

nav a:hover {
	text-decoration: underline;
}

main {
	max-width: 56rem;
	margin: 0 auto;
	padding: 1rem 2rem 4rem;
}

pre {
	padding: 0.8rem;
	overflow-x: auto;
	background: #f4f2ee;
	border-left: 3px solid var(--accent);
}

code {
	font-family: "JetBrains Mono", "Fira Code", monospace;
	font-size: 0.9em;
}

.signature {
	font-weight: 600;
}

.activity h2 {
	border-bottom: 1px solid var(--accent);
}
"#;

/// Page bootstrap script: wires navigation state and sample toggles.
pub const MAIN_JS: &str = r#"
"use strict";

document.addEventListener("DOMContentLoaded", () => {
	for (const anchor of document.querySelectorAll("nav a")) {
		if (anchor.getAttribute("href") === location.pathname.split("/").pop()) {
			anchor.classList.add("current");
		}
	}
	for (const toggle of document.querySelectorAll("[data-sample-toggle]")) {
		toggle.addEventListener("click", () => {
			const target = document.getElementById(toggle.dataset.sampleToggle);
			if (target) target.hidden = !target.hidden;
		});
	}
});
"#;

/// Live-reload shim: polls the entry page and reloads when it changes.
///
/// The entry page is written last during materialization, so observing a
/// changed entry page means the whole site is consistent again.
pub const MIMIC_JS: &str = r#"
"use strict";

(() => {
	let lastSeen = null;
	const poll = async () => {
		try {
			const response = await fetch("index.html", { method: "HEAD", cache: "no-store" });
			const stamp = response.headers.get("last-modified");
			if (lastSeen !== null && stamp !== lastSeen) {
				location.reload();
				return;
			}
			lastSeen = stamp;
		} catch (_) {
			// Server restarting between polls is routine.
		}
		setTimeout(poll, 1000);
	};
	poll();
})();
"#;

/// Minimal syntax highlighter for embedded sample code.
pub const HIGHLIGHT_JS: &str = r#"
"use strict";

document.addEventListener("DOMContentLoaded", () => {
	const keywords = /\b(fn|let|mut|pub|struct|enum|impl|trait|match|if|else|for|while|return|use|mod|class|void|new|static|final|public|private)\b/g;
	for (const block of document.querySelectorAll("pre code")) {
		block.innerHTML = block.innerHTML
			.replace(keywords, "<b>$1</b>")
			.replace(/(\/\/[^\n]*)/g, "<i>$1</i>");
	}
});
"#;

/// Site icon.
pub const MAIN_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32">
	<rect x="3" y="6" width="26" height="20" rx="2" fill="none" stroke="currentColor" stroke-width="2"/>
	<path d="M3 8 L16 18 L29 8" fill="none" stroke="currentColor" stroke-width="2"/>
</svg>
"#;

/// Colors substituted into the stylesheet template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleScheme {
	/// Accent color for links, rules and signatures.
	pub accent: String,
	/// Page background color.
	pub background: String,
}

impl Default for StyleScheme {
	fn default() -> Self {
		Self {
			accent: "#7a4f9e".to_string(),
			background: "#fffdf8".to_string(),
		}
	}
}

/// Substitute the scheme into the stylesheet template.
pub fn compile_stylesheet(scheme: &StyleScheme) -> String {
	MAIN_CSS
		.replace("@accent@", &scheme.accent)
		.replace("@background@", &scheme.background)
}
