// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;

mod elf;

/// The container formats GDB's `load` is able to consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat
{
	Elf,
	IntelHex,
	SRecord,
	Unknown,
}

impl ImageFormat
{
	/// Work out the format from the first few bytes of a file
	pub fn detect(signature: &[u8]) -> Self
	{
		if signature.starts_with(b"\x7fELF") {
			ImageFormat::Elf
		} else if signature.starts_with(b":") {
			ImageFormat::IntelHex
		} else if signature.len() >= 2 && signature[0] == b'S' && signature[1].is_ascii_digit() {
			ImageFormat::SRecord
		} else {
			ImageFormat::Unknown
		}
	}
}

impl Display for ImageFormat
{
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
	{
		let name = match self {
			ImageFormat::Elf => "ELF",
			ImageFormat::IntelHex => "Intel HEX",
			ImageFormat::SRecord => "Motorola S-record",
			ImageFormat::Unknown => "unknown",
		};
		write!(f, "{name}")
	}
}

/// A firmware image that has been checked over before being handed to GDB
#[derive(Debug, Clone)]
pub struct FirmwareImage
{
	path: PathBuf,
	format: ImageFormat,
	loadable_segments: Option<usize>,
}

impl FirmwareImage
{
	/// Inspect the image at the given path
	pub fn from_path(path: &Path) -> Result<Self, Error>
	{
		// The path ends up quoted in a text command file, so it has to survive as text
		if path.to_str().is_none() {
			return Err(Error::InvalidImage {
				path: path.to_path_buf(),
				reason: "path is not valid UTF-8".into(),
			});
		}

		let io_error = |source| Error::ImageIo {
			source,
			path: path.to_path_buf(),
		};

		let mut file = File::open(path).map_err(io_error)?;
		let mut contents = Vec::new();
		file.read_to_end(&mut contents).map_err(io_error)?;

		let format = ImageFormat::detect(&contents);
		let loadable_segments = match format {
			ImageFormat::Elf => Some(elf::loadable_segments(path, &contents)?),
			ImageFormat::Unknown => {
				warn!("Could not identify the format of {}, leaving it to GDB", path.display());
				None
			},
			_ => None,
		};
		debug!("{} is a(n) {} image", path.display(), format);

		Ok(Self {
			path: path.to_path_buf(),
			format,
			loadable_segments,
		})
	}

	pub fn path(&self) -> &Path
	{
		&self.path
	}

	pub fn format(&self) -> ImageFormat
	{
		self.format
	}

	/// How many non-empty `PT_LOAD` segments the image has, if it is an ELF
	pub fn loadable_segments(&self) -> Option<usize>
	{
		self.loadable_segments
	}
}

#[cfg(test)]
mod tests
{
	use std::io::Write;

	use color_eyre::eyre::Result;
	use tempfile::NamedTempFile;

	use super::*;

	#[test]
	fn detect_formats()
	{
		assert_eq!(ImageFormat::detect(b"\x7fELF\x01\x02"), ImageFormat::Elf);
		assert_eq!(ImageFormat::detect(b":020000040001F9"), ImageFormat::IntelHex);
		assert_eq!(ImageFormat::detect(b"S00F000068656C6C6F"), ImageFormat::SRecord);
		assert_eq!(ImageFormat::detect(b"Something"), ImageFormat::Unknown);
		assert_eq!(ImageFormat::detect(b""), ImageFormat::Unknown);
	}

	#[test]
	fn missing_image()
	{
		let result = FirmwareImage::from_path(Path::new("definitely/not/here.elf"));

		assert!(matches!(result, Err(Error::ImageIo { .. })));
	}

	#[cfg(unix)]
	#[test]
	fn non_utf8_path_rejected()
	{
		use std::ffi::OsStr;
		use std::os::unix::ffi::OsStrExt;

		let result = FirmwareImage::from_path(Path::new(OsStr::from_bytes(b"fw\xff.elf")));

		match result {
			Err(Error::InvalidImage { reason, .. }) => assert_eq!(reason, "path is not valid UTF-8"),
			other => panic!("expected the path to be refused, got {other:?}"),
		}
	}

	#[test]
	fn hex_image_is_accepted() -> Result<()>
	{
		let mut file = NamedTempFile::new()?;
		file.write_all(b":0400000001020304F2\n:00000001FF\n")?;

		let image = FirmwareImage::from_path(file.path())?;
		assert_eq!(image.format(), ImageFormat::IntelHex);
		assert_eq!(image.loadable_segments(), None);
		assert_eq!(image.path(), file.path());
		Ok(())
	}

	#[test]
	fn truncated_elf_is_rejected() -> Result<()>
	{
		let mut file = NamedTempFile::new()?;
		file.write_all(b"\x7fELF\x01\x02\x01")?;

		let result = FirmwareImage::from_path(file.path());
		assert!(matches!(result, Err(Error::InvalidImage { .. })));
		Ok(())
	}
}
