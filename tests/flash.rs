// SPDX-License-Identifier: MIT OR Apache-2.0
// SPDX-FileCopyrightText: 2026 gdbflash contributors

#[cfg(all(test, unix))]
mod tests
{
	use std::fs;
	use std::os::unix::fs::PermissionsExt;
	use std::path::{Path, PathBuf};

	use color_eyre::eyre::{OptionExt, Result};
	use gdbflash::{Error, FlashRequest, Flasher};
	use tempfile::TempDir;

	/// Writes a stand-in for GDB that echoes its command file to stderr and exits with `code`.
	fn fake_gdb(dir: &Path, code: i32) -> Result<PathBuf>
	{
		let path = dir.join(format!("fake-gdb-{code}"));
		let contents = format!(
			"#!/bin/sh\n\
			for arg in \"$@\"; do\n\
			\tcase \"$arg\" in\n\
			\t\t--command=*) script=\"${{arg#--command=}}\" ;;\n\
			\tesac\n\
			done\n\
			echo \"args=$*\" >&2\n\
			echo \"script=$script\" >&2\n\
			cat \"$script\" >&2\n\
			exit {code}\n"
		);
		fs::write(&path, contents)?;
		fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
		Ok(path)
	}

	fn image(dir: &Path, name: &str) -> Result<PathBuf>
	{
		let path = dir.join(name);
		fs::write(&path, ":0400000001020304F2\n:00000001FF\n")?;
		Ok(path)
	}

	fn command_files(dir: &Path) -> Result<Vec<PathBuf>>
	{
		let mut files = Vec::new();
		for entry in fs::read_dir(dir)? {
			files.push(entry?.path());
		}
		Ok(files)
	}

	fn script_path(stderr: &str) -> Result<PathBuf>
	{
		let line = stderr
			.lines()
			.find_map(|line| line.strip_prefix("script="))
			.ok_or_eyre("stand-in GDB did not report its command file")?;
		Ok(PathBuf::from(line))
	}

	// Everything that spawns lives in one test so that no other thread is forking while a
	// freshly written stand-in is still open for writing (which would make exec fail ETXTBSY).
	#[test]
	fn flash_through_stand_in_gdb() -> Result<()>
	{
		let dir = TempDir::new()?;
		let scratch = TempDir::new()?;
		let first = image(dir.path(), "first.hex")?;
		let second = image(dir.path(), "second.hex")?;
		let request = FlashRequest::new(1234, [&first, &second]);

		// A clean run hands back whatever GDB wrote, and cleans up the command file
		let report = Flasher::new(fake_gdb(dir.path(), 0)?)
			.scratch_dir(scratch.path())
			.flash(&request)?;
		assert!(report.status.success());
		assert!(report.stderr.contains("args=--nx --command="));
		assert!(report.stderr.contains("target remote 127.0.0.1:1234"));
		assert!(report.stderr.contains(&format!("load \"{}\"", first.display())));
		assert!(report.stderr.contains(&format!("load \"{}\"", second.display())));
		let script = script_path(&report.stderr)?;
		assert!(script.file_name().and_then(|name| name.to_str()).is_some_and(|name| {
			name.starts_with("gdb_") && name.ends_with(".txt")
		}));
		assert!(!script.exists());
		assert_eq!(script.parent(), Some(scratch.path()));
		assert!(command_files(scratch.path())?.is_empty());

		// A nonzero exit is a failed flash, still carrying GDB's output, and still cleans up
		match Flasher::new(fake_gdb(dir.path(), 3)?).scratch_dir(scratch.path()).flash(&request) {
			Err(Error::FlashFailed { source, status, stderr }) => {
				assert!(source.is_none());
				assert_eq!(status.and_then(|status| status.code()), Some(3));
				assert!(stderr.contains("monitor _reset"));
				assert!(!script_path(&stderr)?.exists());
			},
			other => panic!("expected a failed flash, got {other:?}"),
		}

		// As is not being able to run GDB at all
		match Flasher::new(dir.path().join("no-such-gdb")).scratch_dir(scratch.path()).flash(&request) {
			Err(Error::FlashFailed { source, status, stderr }) => {
				assert!(source.is_some());
				assert!(status.is_none());
				assert!(stderr.is_empty());
			},
			other => panic!("expected a failed flash, got {other:?}"),
		}
		assert!(command_files(scratch.path())?.is_empty());

		Ok(())
	}

	#[test]
	fn missing_image_stops_before_gdb()
	{
		let request = FlashRequest::new(1234, ["this/image/does/not/exist.elf"]);

		let result = Flasher::new("/bin/false").flash(&request);
		assert!(matches!(result, Err(Error::ImageIo { .. })));
	}
}
