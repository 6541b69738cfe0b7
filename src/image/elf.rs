// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

use std::path::Path;

use goblin::elf::Elf;
use goblin::elf::program_header::PT_LOAD;
use log::debug;

use crate::error::Error;

/// Count the segments GDB will actually write to the target, refusing images that have none.
pub fn loadable_segments(path: &Path, contents: &[u8]) -> Result<usize, Error>
{
	let invalid = |reason: String| Error::InvalidImage {
		path: path.to_path_buf(),
		reason,
	};

	let elf = Elf::parse(contents).map_err(|err| invalid(format!("not a valid ELF ({err})")))?;
	debug!(
		"{}: machine {}, {}-bit, entry point {:#010x}",
		path.display(),
		elf.header.e_machine,
		if elf.is_64 { 64 } else { 32 },
		elf.entry
	);

	// Segments with no file-backed data (.bss and friends) have nothing for `load` to write
	let segments = elf
		.program_headers
		.iter()
		.filter(|header| header.p_type == PT_LOAD && header.p_filesz != 0)
		.count();

	if segments == 0 {
		return Err(invalid("no loadable segments".into()));
	}
	Ok(segments)
}
