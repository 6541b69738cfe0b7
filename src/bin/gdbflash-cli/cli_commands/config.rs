// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use color_eyre::eyre::{Context, Result};
use gdbflash::FlashParams;
use log::info;

use crate::CliArguments;
use crate::cli_commands::{default_config_path, load_config};

pub fn show_config(cli_args: &CliArguments) -> Result<()>
{
	let path = match cli_args.config_file() {
		Some(path) => path.to_path_buf(),
		None => default_config_path()?,
	};
	info!("Configuration file: {}", path.display());

	let config = load_config(cli_args)?;
	info!("GDB client: {}", config.executable().display());
	info!("GDB server: {}:{}", config.server.host, config.server.port);

	// Print the effective configuration in a form that can be saved straight back as the file
	let json = serde_json::to_string_pretty(&config).wrap_err("serialising configuration")?;
	println!("{json}");
	Ok(())
}
