// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::path::{Path, PathBuf};

use clap::Subcommand;
use color_eyre::eyre::{OptionExt, Result};
use directories::ProjectDirs;
use gdbflash::{ClientConfig, FlashParams};

use crate::cli_commands::flash::{FlashArguments, RenderArguments};
use crate::{CliArguments, CompletionArguments};

pub mod config;
pub mod flash;

#[derive(Subcommand)]
pub enum ToplevelCommmands
{
	/// Flash firmware images onto the target through GDB
	Flash(FlashArguments),
	/// Print the GDB command file a flash would use, without running anything
	Render(RenderArguments),
	/// Show the configuration in effect and where it is read from
	Config,
	/// Generate completions data for the shell
	Complete(CompletionArguments),
}

impl FlashParams for CliArguments
{
	fn config_file(&self) -> Option<&Path>
	{
		self.config.as_deref()
	}

	fn port(&self) -> Option<u16>
	{
		self.port
	}

	fn host(&self) -> Option<&str>
	{
		self.host.as_deref()
	}

	fn executable(&self) -> Option<&str>
	{
		self.gdb.as_deref()
	}
}

fn paths() -> Result<ProjectDirs>
{
	ProjectDirs::from("org", "gdbflash", "gdbflash").ok_or_eyre("Failed to get program working paths")
}

fn default_config_path() -> Result<PathBuf>
{
	Ok(paths()?.config_dir().join("config.json"))
}

/// Resolve the configuration for this invocation, file plus command line overrides.
pub fn load_config(cli_args: &CliArguments) -> Result<ClientConfig>
{
	Ok(ClientConfig::resolve(cli_args, &default_config_path()?)?)
}
