// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors
//! Module for error handling code.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error
{
	#[error("Failed to read configuration file {}", .path.display())]
	ConfigIo
	{
		#[source]
		source: io::Error,
		path: PathBuf,
	},

	#[error("Configuration file {} is malformed", .path.display())]
	ConfigParse
	{
		#[source]
		source: serde_json::Error,
		path: PathBuf,
	},

	#[error("Port 0 is not a usable GDB server port")]
	InvalidPort,

	#[error("No firmware images were given to flash")]
	NoImages,

	#[error("Failed to read firmware image {}", .path.display())]
	ImageIo
	{
		#[source]
		source: io::Error,
		path: PathBuf,
	},

	#[error("Firmware image {} is not loadable: {reason}", .path.display())]
	InvalidImage
	{
		path: PathBuf,
		reason: String,
	},

	/// Anything that goes wrong once the script is being handed to GDB: the command file could not
	/// be written, GDB could not be run, or it exited unsuccessfully. GDB's stderr is the diagnostic.
	#[error("Flash failed{}", describe_status(.status))]
	FlashFailed
	{
		#[source]
		source: Option<io::Error>,

		/// The child's exit status, if it got as far as running.
		status: Option<ExitStatus>,

		/// Everything the child wrote to its error stream (empty if it never ran).
		stderr: String,
	},
}

impl Error
{
	/// Build a flash failure for something that stopped GDB from running at all.
	pub fn flash_io(source: io::Error) -> Self
	{
		Error::FlashFailed {
			source: Some(source),
			status: None,
			stderr: String::new(),
		}
	}
}

fn describe_status(status: &Option<ExitStatus>) -> String
{
	match status {
		Some(status) => format!(" (GDB {status})"),
		None => String::new(),
	}
}

#[macro_export]
macro_rules! log_and_return
{
	($err:expr) => {
		let err = $err;
		log::error!("{}", err);
		return Err(err);
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn flash_io_carries_no_status()
	{
		let err = Error::flash_io(io::Error::new(io::ErrorKind::NotFound, "no such file"));

		assert_eq!(err.to_string(), "Flash failed");
		match err {
			Error::FlashFailed { source, status, stderr } => {
				assert!(source.is_some());
				assert!(status.is_none());
				assert!(stderr.is_empty());
			},
			_ => panic!("expected a flash failure"),
		}
	}
}
