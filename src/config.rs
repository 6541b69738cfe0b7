// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::FlashParams;
use crate::error::Error;

/// Default values for everything the configuration file may leave out
pub struct Defaults;

impl Defaults
{
	pub const PLATFORM: &'static str = "powerpc-eabivle-4_9";
	pub const EXECUTABLE: &'static str = "powerpc-eabivle-gdb";
	pub const HOST: &'static str = "127.0.0.1";
	pub const PORT: u16 = 7224;
}

/// Where the cross GDB lives inside a vendor toolchain install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig
{
	/// Root of the toolchain install. When absent the executable is looked up on `PATH`.
	#[serde(default)]
	pub root: Option<PathBuf>,
	#[serde(default = "default_platform")]
	pub platform: String,
	#[serde(default = "default_executable")]
	pub executable: String,
}

/// The GDB server the client connects to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig
{
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig
{
	#[serde(default)]
	pub toolchain: ToolchainConfig,
	#[serde(default)]
	pub server: ServerConfig,
}

fn default_platform() -> String
{
	Defaults::PLATFORM.to_string()
}

fn default_executable() -> String
{
	Defaults::EXECUTABLE.to_string()
}

fn default_host() -> String
{
	Defaults::HOST.to_string()
}

fn default_port() -> u16
{
	Defaults::PORT
}

impl Default for ToolchainConfig
{
	fn default() -> Self
	{
		Self {
			root: None,
			platform: default_platform(),
			executable: default_executable(),
		}
	}
}

impl Default for ServerConfig
{
	fn default() -> Self
	{
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

impl ClientConfig
{
	/// Load the configuration from a JSON file.
	pub fn from_file(path: &Path) -> Result<Self, Error>
	{
		let file = File::open(path).map_err(|source| Error::ConfigIo {
			source,
			path: path.to_path_buf(),
		})?;
		serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::ConfigParse {
			source,
			path: path.to_path_buf(),
		})
	}

	/// Load the configuration from the default location, falling back to the built-in
	/// defaults if nothing has been written there yet.
	pub fn from_default_file(path: &Path) -> Result<Self, Error>
	{
		match Self::from_file(path) {
			Err(Error::ConfigIo { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
				debug!("No configuration at {}, using defaults", path.display());
				Ok(Self::default())
			},
			result => result,
		}
	}

	/// Resolve the configuration for an invocation: an explicitly requested file must exist, the
	/// default one may not. Command line overrides are then applied on top.
	pub fn resolve<Params>(params: &Params, default_path: &Path) -> Result<Self, Error>
	where
		Params: FlashParams,
	{
		let config = match params.config_file() {
			Some(path) => {
				info!("Using configuration from {}", path.display());
				Self::from_file(path)?
			},
			None => Self::from_default_file(default_path)?,
		};
		Ok(config.with_overrides(params))
	}

	/// Apply any values given on the command line over those from the file.
	#[must_use]
	pub fn with_overrides<Params>(mut self, params: &Params) -> Self
	where
		Params: FlashParams,
	{
		if let Some(port) = params.port() {
			self.server.port = port;
		}
		if let Some(host) = params.host() {
			self.server.host = host.to_string();
		}
		if let Some(executable) = params.executable() {
			// A full path on the command line stands on its own
			self.toolchain.executable = executable.to_string();
			if Path::new(executable).is_absolute() {
				self.toolchain.root = None;
			}
		}
		self
	}

	/// Path to the GDB client executable this configuration describes.
	pub fn executable(&self) -> PathBuf
	{
		let toolchain = &self.toolchain;
		match &toolchain.root {
			Some(root) => root
				.join("Cross_Tools")
				.join(&toolchain.platform)
				.join("bin")
				.join(&toolchain.executable),
			None => PathBuf::from(&toolchain.executable),
		}
	}
}
