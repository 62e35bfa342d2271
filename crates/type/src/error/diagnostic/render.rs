// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

use std::fmt::Write;

use super::Diagnostic;

pub trait DiagnosticRenderer {
	fn render(&self, diagnostic: &Diagnostic) -> String;
}

pub struct DefaultRenderer;

impl DiagnosticRenderer for DefaultRenderer {
	fn render(&self, d: &Diagnostic) -> String {
		let mut output = String::new();
		render_into(&mut output, d, 0);
		output
	}
}

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		DefaultRenderer.render(diagnostic)
	}
}

fn render_into(output: &mut String, d: &Diagnostic, depth: usize) {
	let indent = "  ".repeat(depth);

	if depth == 0 {
		let _ = writeln!(output, "error[{}]: {}", d.code, d.message);
	} else {
		let _ = writeln!(output, "{}caused by [{}]: {}", indent, d.code, d.message);
	}

	if let Some(path) = &d.path {
		let _ = writeln!(output, "{} --> field `{}`", indent, path);
	}

	if let Some(label) = &d.label {
		let _ = writeln!(output, "{}  = {}", indent, label);
	}

	if let Some(help) = &d.help {
		let _ = writeln!(output, "\n{}help: {}", indent, help);
	}

	for note in &d.notes {
		let _ = writeln!(output, "\n{}note: {}", indent, note);
	}

	if let Some(cause) = &d.cause {
		let _ = writeln!(output);
		render_into(output, cause, depth + 1);
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_render_full() {
		let mut inner = Diagnostic::new("INNER_001", "inner failure");
		inner.help = Some("try again".to_string());

		let mut outer = Diagnostic::new("OUTER_001", "outer failure");
		outer.path = Some(".a.b".to_string());
		outer.label = Some("while writing".to_string());
		outer.notes = vec!["first note".to_string()];
		outer.cause = Some(Box::new(inner));

		let rendered = DefaultRenderer::render_string(&outer);
		assert!(rendered.starts_with("error[OUTER_001]: outer failure\n"));
		assert!(rendered.contains("--> field `.a.b`"));
		assert!(rendered.contains("= while writing"));
		assert!(rendered.contains("note: first note"));
		assert!(rendered.contains("caused by [INNER_001]: inner failure"));
		assert!(rendered.contains("help: try again"));
	}
}
