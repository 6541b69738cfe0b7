// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::config::{ClientConfig, Defaults};
use crate::error::Error;
use crate::image::FirmwareImage;
use crate::log_and_return;
use crate::script::CommandScript;

/// One flash run: where the GDB server is, which images to load, and what to do afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashRequest
{
	pub host: String,
	pub port: u16,
	/// Leave the target running under GDB rather than resetting it and quitting
	pub debug: bool,
	/// Loaded in this order
	pub images: Vec<PathBuf>,
}

impl FlashRequest
{
	pub fn new<I, P>(port: u16, images: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			host: Defaults::HOST.to_string(),
			port,
			debug: false,
			images: images.into_iter().map(Into::into).collect(),
		}
	}

	/// Build a request against the server a configuration points at.
	pub fn from_config<I, P>(config: &ClientConfig, images: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self::new(config.server.port, images).host(&config.server.host)
	}

	#[must_use]
	pub fn host(mut self, host: &str) -> Self
	{
		self.host = host.to_string();
		self
	}

	#[must_use]
	pub fn debug(mut self, debug: bool) -> Self
	{
		self.debug = debug;
		self
	}

	/// Render the GDB command file for this request.
	pub fn render(&self) -> String
	{
		let images: Vec<&Path> = self.images.iter().map(PathBuf::as_path).collect();
		CommandScript::new(&self.host, self.port, self.debug, &images).to_string()
	}

	/// Check the request is something GDB stands a chance of flashing.
	pub fn validate(&self) -> Result<Vec<FirmwareImage>, Error>
	{
		if self.port == 0 {
			return Err(Error::InvalidPort);
		}
		if self.images.is_empty() {
			return Err(Error::NoImages);
		}
		self.images
			.iter()
			.map(|path| FirmwareImage::from_path(path))
			.collect()
	}
}

/// What GDB had to say for itself on a successful run
#[derive(Debug, Clone)]
pub struct FlashReport
{
	pub status: ExitStatus,
	pub stdout: String,
	pub stderr: String,
}

/// Drives a GDB client executable through a flash run
#[derive(Debug, Clone)]
pub struct Flasher
{
	executable: PathBuf,
	/// Where the command file is written; the system temp directory when unset
	scratch_dir: Option<PathBuf>,
}

impl Flasher
{
	pub fn new(executable: impl Into<PathBuf>) -> Self
	{
		Self {
			executable: executable.into(),
			scratch_dir: None,
		}
	}

	/// Write the command file somewhere other than the system temp directory.
	#[must_use]
	pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self
	{
		self.scratch_dir = Some(dir.into());
		self
	}

	pub fn from_config(config: &ClientConfig) -> Self
	{
		Self::new(config.executable())
	}

	pub fn executable(&self) -> &Path
	{
		&self.executable
	}

	/// Arguments that point GDB at a command file, skipping any `.gdbinit`.
	pub fn arguments(script: &Path) -> Vec<OsString>
	{
		let mut command_arg = OsString::from("--command=");
		command_arg.push(script);
		vec![OsString::from("--nx"), command_arg]
	}

	/// The full command that will be run for a given command file.
	pub fn command(&self, script: &Path) -> Command
	{
		let mut command = Command::new(&self.executable);
		command.args(Self::arguments(script));
		command
	}

	/// Render the request into a scratch command file and run GDB against it to completion.
	/// The command file is removed again however this returns.
	pub fn flash(&self, request: &FlashRequest) -> Result<FlashReport, Error>
	{
		let images = match request.validate() {
			Ok(images) => images,
			Err(err) => {
				log_and_return!(err);
			},
		};
		info!(
			"Flashing {} image(s) through the GDB server at {}:{}",
			images.len(),
			request.host,
			request.port
		);

		let mut builder = tempfile::Builder::new();
		builder.prefix("gdb_").suffix(".txt");
		let script = match &self.scratch_dir {
			Some(dir) => builder.tempfile_in(dir),
			None => builder.tempfile(),
		};
		let mut script = match script {
			Ok(script) => script,
			Err(source) => {
				log_and_return!(Error::flash_io(source));
			},
		};
		if let Err(source) = script
			.write_all(request.render().as_bytes())
			.and_then(|()| script.flush())
		{
			log_and_return!(Error::flash_io(source));
		}
		debug!("GDB command file: {}", script.path().display());

		let mut command = self.command(script.path());
		command
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped());
		debug!("Spawning {command:?}");

		let child = match command.spawn() {
			Ok(child) => child,
			Err(source) => {
				log_and_return!(Error::flash_io(source));
			},
		};

		let style = ProgressStyle::default_spinner()
			.template("{spinner} {msg} [{elapsed}]")
			.unwrap_or_else(|_| ProgressStyle::default_spinner());
		let spinner = ProgressBar::new_spinner()
			.with_style(style)
			.with_message("Waiting for GDB client to flash...");
		spinner.enable_steady_tick(Duration::from_millis(100));
		let output = child.wait_with_output();
		spinner.finish_and_clear();

		let output = match output {
			Ok(output) => output,
			Err(source) => {
				log_and_return!(Error::flash_io(source));
			},
		};
		let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
		let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

		if !output.status.success() {
			log_and_return!(Error::FlashFailed {
				source: None,
				status: Some(output.status),
				stderr,
			});
		}

		info!("GDB client finished flashing");
		Ok(FlashReport {
			status: output.status,
			stdout,
			stderr,
		})
	}
}
