// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::path::Path;

pub mod config;
pub mod error;
pub mod flasher;
pub mod image;
pub mod script;

pub use crate::config::ClientConfig;
pub use crate::error::Error;
pub use crate::flasher::{FlashReport, FlashRequest, Flasher};

/// Values an invocation may supply to override what the configuration file says
pub trait FlashParams
{
	/// An explicitly requested configuration file
	fn config_file(&self) -> Option<&Path>;
	fn port(&self) -> Option<u16>;
	fn host(&self) -> Option<&str>;
	/// GDB executable to use instead of the toolchain's
	fn executable(&self) -> Option<&str>;
}
