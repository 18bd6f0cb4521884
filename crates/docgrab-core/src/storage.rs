//! Disk side of a download.
//!
//! Bytes go to a hidden `.part` file in the destination directory and are
//! moved to their final name only once the transfer completed. An existing
//! file is never overwritten; a free `name (n).ext` is picked instead.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used until the transfer completes.
pub const TEMP_SUFFIX: &str = ".part";
const TEMP_PREFIX: &str = ".docgrab-";

/// Give up looking for a free name after this many numbered variants.
const MAX_NAME_VARIANTS: u32 = 1000;

/// In-progress download file. Removed from disk when dropped unfinished.
pub struct PartFile {
    file: tempfile::NamedTempFile,
    written: u64,
}

impl PartFile {
    /// Creates a new part file inside `dir` (which must exist).
    pub fn create_in(dir: &Path) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(Self { file, written: 0 })
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Flushes and moves the part file to `dir/filename`, or to the first
    /// free numbered variant of it. Returns the final path.
    pub fn finalize(mut self, dir: &Path, filename: &str) -> io::Result<PathBuf> {
        self.file.as_file_mut().sync_all()?;
        let mut file = self.file;
        for _ in 0..MAX_NAME_VARIANTS {
            let target = unique_path(dir, filename)?;
            match file.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                // Lost a race for the name; pick again.
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => file = e.file,
                Err(e) => return Err(e.error),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {filename} in {}", dir.display()),
        ))
    }
}

/// First path in `dir` that does not exist yet: `name`, then `name (1)`,
/// `name (2)`, ... with the counter placed before the extension.
pub fn unique_path(dir: &Path, filename: &str) -> io::Result<PathBuf> {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return Ok(candidate);
    }
    let (stem, ext) = split_extension(filename);
    for n in 1..=MAX_NAME_VARIANTS {
        let candidate = dir.join(format!("{stem} ({n}){ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {filename} in {}", dir.display()),
    ))
}

/// `"a.tar.gz"` → `("a.tar", ".gz")`; a leading dot is not an extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(i) if i > 0 => filename.split_at(i),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }

    #[test]
    fn unique_path_numbers_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_path(dir.path(), "doc.pdf").unwrap(),
            dir.path().join("doc.pdf")
        );
        fs::write(dir.path().join("doc.pdf"), b"x").unwrap();
        assert_eq!(
            unique_path(dir.path(), "doc.pdf").unwrap(),
            dir.path().join("doc (1).pdf")
        );
        fs::write(dir.path().join("doc (1).pdf"), b"x").unwrap();
        assert_eq!(
            unique_path(dir.path(), "doc.pdf").unwrap(),
            dir.path().join("doc (2).pdf")
        );
    }

    #[test]
    fn write_and_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let mut part = PartFile::create_in(dir.path()).unwrap();
        let temp = part.path().to_path_buf();
        assert!(temp.file_name().unwrap().to_string_lossy().ends_with(TEMP_SUFFIX));

        part.write_chunk(b"%PDF-").unwrap();
        part.write_chunk(b"1.7").unwrap();
        assert_eq!(part.written(), 8);

        let out = part.finalize(dir.path(), "doc.pdf").unwrap();
        assert_eq!(out, dir.path().join("doc.pdf"));
        assert_eq!(fs::read(&out).unwrap(), b"%PDF-1.7");
        assert!(!temp.exists());
    }

    #[test]
    fn finalize_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"old").unwrap();

        let mut part = PartFile::create_in(dir.path()).unwrap();
        part.write_chunk(b"new").unwrap();
        let out = part.finalize(dir.path(), "doc.pdf").unwrap();

        assert_eq!(out, dir.path().join("doc (1).pdf"));
        assert_eq!(fs::read(dir.path().join("doc.pdf")).unwrap(), b"old");
        assert_eq!(fs::read(&out).unwrap(), b"new");
    }

    #[test]
    fn dropped_part_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let part = PartFile::create_in(dir.path()).unwrap();
        let temp = part.path().to_path_buf();
        assert!(temp.exists());
        drop(part);
        assert!(!temp.exists());
    }
}
