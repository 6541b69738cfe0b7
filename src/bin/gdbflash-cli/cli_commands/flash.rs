// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::Result;
use gdbflash::{Error, FlashRequest, Flasher};
use log::{error, info};

use crate::CliArguments;
use crate::cli_commands::load_config;

#[derive(Args)]
pub struct FlashArguments
{
	#[arg(required = true)]
	/// Firmware images to load, in order
	images: Vec<PathBuf>,
	#[arg(short = 'd', long = "debug", default_value_t = false)]
	/// Leave the target running under GDB instead of resetting it and quitting
	debug: bool,
}

#[derive(Args)]
pub struct RenderArguments
{
	#[arg(required = true)]
	/// Firmware images to load, in order
	images: Vec<PathBuf>,
	#[arg(short = 'd', long = "debug", default_value_t = false)]
	/// Render the script for a debug session rather than a reset-and-quit flash
	debug: bool,
}

impl FlashArguments
{
	pub fn flash(&self, cli_args: &CliArguments) -> Result<()>
	{
		let config = load_config(cli_args)?;
		let request = FlashRequest::from_config(&config, &self.images).debug(self.debug);
		let flasher = Flasher::from_config(&config);
		info!("Using GDB client {}", flasher.executable().display());

		match flasher.flash(&request) {
			Ok(report) => {
				// GDB reports load progress and target chatter on stderr, so pass that on
				eprint!("{}", report.stderr);
				Ok(())
			},
			Err(err) => {
				if let Error::FlashFailed { source, stderr, .. } = &err {
					eprint!("{stderr}");
					if let Some(source) = source {
						error!("Could not run {}: {source}", flasher.executable().display());
					}
				}
				Err(err.into())
			},
		}
	}
}

impl RenderArguments
{
	pub fn render(&self, cli_args: &CliArguments) -> Result<()>
	{
		let config = load_config(cli_args)?;
		let request = FlashRequest::from_config(&config, &self.images).debug(self.debug);
		print!("{}", request.render());
		Ok(())
	}
}
