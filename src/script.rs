// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors
//! The GDB command file that drives a flash run.
//!
//! The script connects to the probe's GDB server, relaxes GDB's memory and connection
//! handling enough to talk to a PowerPC VLE part, `load`s every image in the order given,
//! and then either resets the target and quits or lets it run under the debugger.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Everything between the `target remote` line and the image loads.
const PREAMBLE: &str = "\
set mem inaccessible-by-default off
set tcp auto-retry on
set tcp connect-timeout 240
set remotetimeout 60

monitor preserve1 0
monitor selectcore 0

set architecture powerpc:vle";

/// A rendered view over the values substituted into the command file
pub struct CommandScript<'a>
{
	host: &'a str,
	port: u16,
	debug: bool,
	images: &'a [&'a Path],
	escape_separators: bool,
}

impl<'a> CommandScript<'a>
{
	/// Construct a script for the host this is running on.
	pub fn new(host: &'a str, port: u16, debug: bool, images: &'a [&'a Path]) -> Self
	{
		Self {
			host,
			port,
			debug,
			images,
			escape_separators: cfg!(windows),
		}
	}

	/// Override whether path separators get escaped, irrespective of host OS.
	#[must_use]
	pub fn escape_separators(mut self, escape: bool) -> Self
	{
		self.escape_separators = escape;
		self
	}
}

impl Display for CommandScript<'_>
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
	{
		writeln!(f, "target remote {}:{}", remote_host(self.host), self.port)?;
		writeln!(f)?;
		writeln!(f, "{PREAMBLE}")?;

		for image in self.images {
			writeln!(f, "load \"{}\"", quote_path(image, self.escape_separators))?;
		}

		if self.debug {
			writeln!(f, "continue")
		} else {
			writeln!(f, "monitor _reset")?;
			writeln!(f, "quit")
		}
	}
}

/// IPv6 literals need brackets or GDB reads the last group as the port.
pub fn remote_host(host: &str) -> Cow<'_, str>
{
	if host.contains(':') && !host.starts_with('[') {
		Cow::Owned(format!("[{host}]"))
	} else {
		Cow::Borrowed(host)
	}
}

/// GDB treats `\` inside a quoted argument as an escape, so Windows paths need theirs doubled.
pub fn quote_path(path: &Path, escape_separators: bool) -> Cow<'_, str>
{
	let path = path.to_string_lossy();
	if escape_separators && path.contains('\\') {
		Cow::Owned(path.replace('\\', "\\\\"))
	} else {
		path
	}
}
