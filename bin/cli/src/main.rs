// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Rekord

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand, ValueEnum};
use rekord_core::{
	CompileOptions, CompiledLayout, Endianness, MachineParams, RecordBuffer, Value, WordWidth, compile, deserialize,
	descriptors_from_json, emit_native_header, encode,
};
use rekord_type::util::hex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rekord", version, about = "Compile record layouts and move values in and out of raw buffers")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the compiled field table.
	Layout {
		#[command(flatten)]
		layout: LayoutArgs,
	},
	/// Print an equivalent packed C struct.
	Header {
		#[command(flatten)]
		layout: LayoutArgs,
		#[arg(short, long, default_value = "record")]
		name: String,
	},
	/// Encode a JSON value and print the buffer as hex.
	Encode {
		#[command(flatten)]
		layout: LayoutArgs,
		/// JSON file holding the value.
		value: PathBuf,
	},
	/// Decode a hex buffer and print the value as JSON.
	Decode {
		#[command(flatten)]
		layout: LayoutArgs,
		hex: String,
	},
}

#[derive(Args, Debug)]
struct LayoutArgs {
	/// JSON file holding the field descriptors.
	descriptors: PathBuf,
	/// Pad fields to their natural alignment.
	#[arg(long)]
	align: bool,
	#[arg(long, value_enum)]
	word: Option<Word>,
	#[arg(long, value_enum)]
	endian: Option<Endian>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Word {
	#[value(name = "4")]
	Four,
	#[value(name = "8")]
	Eight,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Endian {
	Le,
	Be,
}

impl LayoutArgs {
	fn machine(&self) -> MachineParams {
		let native = MachineParams::native();
		let word_width = match self.word {
			Some(Word::Four) => WordWidth::Four,
			Some(Word::Eight) => WordWidth::Eight,
			None => native.word_width,
		};
		let endianness = match self.endian {
			Some(Endian::Le) => Endianness::Little,
			Some(Endian::Be) => Endianness::Big,
			None => native.endianness,
		};
		MachineParams::new(word_width, endianness)
	}

	fn compile(&self) -> Result<CompiledLayout, String> {
		let source = read(&self.descriptors)?;
		let descriptors = descriptors_from_json(&source).map_err(|err| err.to_string())?;
		let options = CompileOptions::default().with_align(self.align).with_machine(self.machine());
		debug!(fields = descriptors.len(), machine = %options.machine, "compiling");
		compile(&descriptors, options).map_err(|err| err.to_string())
	}
}

fn read(path: &PathBuf) -> Result<String, String> {
	fs::read_to_string(path).map_err(|err| format!("cannot read {}: {}", path.display(), err))
}

fn run(command: Command) -> Result<String, String> {
	match command {
		Command::Layout {
			layout,
		} => Ok(layout.compile()?.describe()),
		Command::Header {
			layout,
			name,
		} => Ok(emit_native_header(&layout.compile()?, &name)),
		Command::Encode {
			layout,
			value,
		} => {
			let compiled = layout.compile()?;
			let value = Value::from_json_str(&read(&value)?).map_err(|err| err.to_string())?;
			let buffer = encode(&compiled, &value).map_err(|err| err.to_string())?;
			Ok(format!("{}\n", buffer))
		}
		Command::Decode {
			layout,
			hex: input,
		} => {
			let compiled = layout.compile()?;
			let bytes = hex::decode(input.trim()).map_err(|err| err.to_string())?;
			let buffer = RecordBuffer::from_vec(bytes, compiled.total_fixed_size as usize);
			let value = deserialize(&compiled, &buffer).map_err(|err| err.to_string())?;
			Ok(format!("{}\n", value.to_json()))
		}
	}
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	match run(cli.command) {
		Ok(output) => {
			print!("{}", output);
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("error: {}", err);
			ExitCode::FAILURE
		}
	}
}
