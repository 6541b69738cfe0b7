// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

mod cli_commands;

use std::io::stdout;
use std::path::PathBuf;

use clap::builder::styling::Styles;
use clap::{Args, CommandFactory, Parser, crate_description, crate_version};
use clap_complete::{Shell, generate};
use color_eyre::config::HookBuilder;
use color_eyre::eyre::{EyreHandler, InstallError, Result};
use owo_colors::OwoColorize;

use crate::cli_commands::ToplevelCommmands;

#[derive(Parser)]
#[command(
	version,
	about = format!("{} v{}", crate_description!(), crate_version!()),
	styles(style()),
	disable_colored_help(false),
	arg_required_else_help(true)
)]
struct CliArguments
{
	#[arg(global = true, short = 'c', long = "config")]
	/// Read configuration from this file rather than the default location
	config: Option<PathBuf>,
	#[arg(global = true, short = 'p', long = "port", value_parser = clap::value_parser!(u16).range(1..))]
	/// Connect to the GDB server on this TCP port
	port: Option<u16>,
	#[arg(global = true, long = "host")]
	/// Connect to the GDB server on this host
	host: Option<String>,
	#[arg(global = true, long = "gdb")]
	/// Use this GDB client executable instead of the configured toolchain's
	gdb: Option<String>,

	#[command(subcommand)]
	pub subcommand: ToplevelCommmands,
}

#[derive(Args)]
struct CompletionArguments
{
	shell: Shell,
}

type EyreHookFunc = Box<dyn Fn(&(dyn std::error::Error + 'static)) -> Box<dyn EyreHandler> + Send + Sync + 'static>;
type PanicHookFunc = Box<dyn Fn(&std::panic::PanicHookInfo<'_>) + Send + Sync + 'static>;

struct GdbflashHook
{
	inner_hook: EyreHookFunc,
}

struct GdbflashPanic
{
	inner_hook: PanicHookFunc,
}

struct GdbflashHandler
{
	inner_handler: Box<dyn EyreHandler>,
}

impl GdbflashHook
{
	fn build_handler(&self, error: &(dyn std::error::Error + 'static)) -> GdbflashHandler
	{
		GdbflashHandler {
			inner_handler: (*self.inner_hook)(error),
		}
	}

	pub fn install(self) -> Result<(), InstallError>
	{
		color_eyre::eyre::set_hook(self.into_eyre_hook())
	}

	pub fn into_eyre_hook(self) -> EyreHookFunc
	{
		Box::new(move |err| Box::new(self.build_handler(err)))
	}
}

impl GdbflashPanic
{
	pub fn install(self)
	{
		std::panic::set_hook(self.into_panic_hook());
	}

	pub fn into_panic_hook(self) -> PanicHookFunc
	{
		Box::new(move |panic_info| {
			print_header();
			(*self.inner_hook)(panic_info);
			print_footer();
		})
	}
}

fn print_header()
{
	eprintln!("------------[ ✂ cut here ✂ ]------------");
	eprintln!("Unhandled crash in gdbflash-cli v{}", crate_version!());
	eprintln!();
}

fn print_footer()
{
	eprintln!();
	eprintln!("{}", "Please include all lines down to this one from the cut here".yellow());
	eprintln!("{}", "marker when reporting this issue.".yellow());
}

/// Bad configuration, unreadable images and GDB failing are all things for the user to fix,
/// so only anything else earns the crash banner.
fn is_crash(error: &(dyn std::error::Error + 'static)) -> bool
{
	error.downcast_ref::<gdbflash::Error>().is_none()
}

impl EyreHandler for GdbflashHandler
{
	fn debug(&self, error: &(dyn std::error::Error + 'static), fmt: &mut core::fmt::Formatter<'_>)
	-> core::fmt::Result
	{
		if !is_crash(error) {
			return self.inner_handler.debug(error, fmt);
		}

		writeln!(fmt, "------------[ ✂ cut here ✂ ]------------")?;
		write!(fmt, "Unhandled crash in gdbflash-cli v{}", crate_version!())?;
		self.inner_handler.debug(error, fmt)?;
		writeln!(fmt)?;
		writeln!(fmt)?;
		writeln!(
			fmt,
			"{}",
			"Please include all lines down to this one from the cut here".yellow()
		)?;
		write!(fmt, "{}", " marker when reporting this issue.".yellow())
	}

	fn track_caller(&mut self, location: &'static std::panic::Location<'static>)
	{
		self.inner_handler.track_caller(location);
	}
}

fn install_error_handler() -> Result<()>
{
	// Grab us a new default handler
	let default_handler = HookBuilder::default();
	// Turn that into a pair of hooks - one for panic, and the other for errors
	let (panic_hook, eyre_hook) = default_handler.try_into_hooks()?;

	// Wrap the panic hook so we only have to deal with our additions
	GdbflashPanic {
		inner_hook: panic_hook.into_panic_hook(),
	}
	.install();

	// Same again for the error hook
	GdbflashHook {
		inner_hook: eyre_hook.into_eyre_hook(),
	}
	.install()?;
	Ok(())
}

/// Clap v3 style (approximate)
/// See https://stackoverflow.com/a/75343828
fn style() -> clap::builder::Styles
{
	Styles::styled()
		.usage(
			anstyle::Style::new()
				.fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)))
				.bold(),
		)
		.header(
			anstyle::Style::new()
				.bold()
				.fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
		)
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
}

fn main() -> Result<()>
{
	install_error_handler()?;
	env_logger::Builder::new()
		.filter_level(log::LevelFilter::Info)
		.parse_default_env()
		.init();

	let cli_args = CliArguments::parse();

	match &cli_args.subcommand {
		ToplevelCommmands::Flash(flash_args) => flash_args.flash(&cli_args),
		ToplevelCommmands::Render(render_args) => render_args.render(&cli_args),
		ToplevelCommmands::Config => cli_commands::config::show_config(&cli_args),
		ToplevelCommmands::Complete(comp_args) => {
			let mut cmd = CliArguments::command();
			generate(comp_args.shell, &mut cmd, "gdbflash-cli", &mut stdout());
			Ok(())
		},
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn cli_is_well_formed()
	{
		CliArguments::command().debug_assert();
	}

	#[test]
	fn user_errors_are_not_crashes()
	{
		let missing = gdbflash::Error::ImageIo {
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
			path: PathBuf::from("app.elf"),
		};
		let config = gdbflash::Error::ConfigParse {
			source: serde_json::from_str::<gdbflash::ClientConfig>("{").unwrap_err(),
			path: PathBuf::from("config.json"),
		};
		let failed = gdbflash::Error::flash_io(std::io::Error::new(std::io::ErrorKind::NotFound, "no gdb"));

		assert!(!is_crash(&missing));
		assert!(!is_crash(&config));
		assert!(!is_crash(&gdbflash::Error::InvalidPort));
		assert!(!is_crash(&failed));
		assert!(is_crash(&std::fmt::Error));
	}

	#[test]
	fn port_zero_rejected()
	{
		let result = CliArguments::try_parse_from(["gdbflash-cli", "--port", "0", "render", "a.elf"]);

		assert!(result.is_err());
	}
}
