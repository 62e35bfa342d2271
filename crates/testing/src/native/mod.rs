// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

//! Compiles and runs small C programs against a generated header, to check
//! layouts against an independent compiler.

use std::{
	env,
	fs,
	io::Error,
	process::Command,
};

use tracing::{debug, warn};

use crate::tempdir::temp_dir;

/// The C compiler to use: `$CC` if set, `cc` otherwise. `None` when it
/// cannot be executed.
pub fn compiler() -> Option<String> {
	let cc = env::var("CC").unwrap_or_else(|_| "cc".to_string());
	match Command::new(&cc).arg("--version").output() {
		Ok(output) if output.status.success() => Some(cc),
		_ => None,
	}
}

/// Writes `header` to `layout.h` and `main` to `main.c`, compiles them as
/// C11 and returns the program's standard output. Returns `Ok(None)` when no
/// C compiler is available.
pub fn run_c(header: &str, main: &str) -> std::io::Result<Option<String>> {
	let Some(cc) = compiler() else {
		warn!("no C compiler available, skipping native check");
		return Ok(None);
	};

	temp_dir(|dir| {
		fs::write(dir.join("layout.h"), header)?;
		fs::write(dir.join("main.c"), main)?;

		let binary = dir.join("check");
		let compiled = Command::new(&cc)
			.current_dir(dir)
			.args(["-std=c11", "-Wall", "-o"])
			.arg(&binary)
			.arg("main.c")
			.output()?;
		if !compiled.status.success() {
			return Err(Error::other(format!("{} failed:\n{}", cc, String::from_utf8_lossy(&compiled.stderr))));
		}

		let run = Command::new(&binary).output()?;
		if !run.status.success() {
			return Err(Error::other(format!("native check exited with {}", run.status)));
		}

		let stdout = String::from_utf8_lossy(&run.stdout).into_owned();
		debug!(output = %stdout.trim(), "native check finished");
		Ok(Some(stdout))
	})
}

/// A `main.c` that includes `layout.h`, runs `body` with a zeroed `value`
/// of `struct_name`, then prints `sizeof` and the struct bytes as hex.
pub fn dump_program(struct_name: &str, body: &str) -> String {
	format!(
		r#"#include <stdio.h>
#include <string.h>
#include "layout.h"

int main(void) {{
	{name} value;
	memset(&value, 0, sizeof(value));
{body}
	printf("%zu\n", sizeof(value));
	const unsigned char *bytes = (const unsigned char *)&value;
	for (size_t i = 0; i < sizeof(value); i++) {{
		printf("%02x", bytes[i]);
	}}
	printf("\n");
	return 0;
}}
"#,
		name = struct_name,
		body = body
	)
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_dump_program_shape() {
		let program = dump_program("sample", "\tvalue.a = 1;");
		assert!(program.contains("#include \"layout.h\""));
		assert!(program.contains("\tsample value;\n"));
		assert!(program.contains("\tvalue.a = 1;\n"));
	}

	#[test]
	fn test_run_trivial_program() {
		let header = "typedef struct pair { unsigned char a; unsigned char b; } pair;\n";
		let Some(output) = run_c(header, &dump_program("pair", "\tvalue.a = 1;\n\tvalue.b = 255;")).unwrap() else {
			return;
		};
		assert_eq!(output, "2\n01ff\n");
	}
}
