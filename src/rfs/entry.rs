use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::rfs::error::Result;

/// A read-only snapshot of one filesystem object, taken when a tree is walked.
///
/// Rank functions only ever look at these snapshots; the content comparator is the
/// one exception and reopens `path` to read bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: OsString,
    is_dir: bool,
    is_regular: bool,
    size: u64,
    modified: SystemTime,
    mode: u32,
}

impl FileEntry {
    /// Reads the entry at `path` without following a trailing symlink.
    pub fn from_path(path: impl AsRef<Path>) -> Result<FileEntry> {
        let path = path.as_ref();
        let metadata = std::fs::symlink_metadata(path)?;
        Self::from_metadata(path, &metadata)
    }

    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Result<FileEntry> {
        let path = path.into();
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string());
        let file_type = metadata.file_type();

        Ok(FileEntry {
            name,
            is_dir: file_type.is_dir(),
            is_regular: file_type.is_file(),
            size: metadata.len(),
            modified: metadata.modified()?,
            mode: metadata.mode(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name, or the whole path when it has no final component (e.g. `/`).
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// True for plain files only: not directories, symlinks, devices, sockets or fifos.
    pub fn is_regular(&self) -> bool {
        self.is_regular
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Full `st_mode`, including file type bits.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// The rwxrwxrwx bits only.
    pub fn permissions(&self) -> u32 {
        self.mode & 0o777
    }
}

#[cfg(test)]
impl FileEntry {
    /// Descriptor that does not exist on disk, for exercising rank functions.
    pub(crate) fn synthetic(
        name: &str,
        is_dir: bool,
        size: u64,
        modified: SystemTime,
        mode: u32,
    ) -> FileEntry {
        FileEntry {
            path: PathBuf::from(name),
            name: OsString::from(name),
            is_dir,
            is_regular: !is_dir,
            size,
            modified,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn from_path_reads_file_attributes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("data.txt");
        fs::write(&file, "hello")?;
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640))?;

        let entry = FileEntry::from_path(&file)?;
        assert_eq!(entry.name(), "data.txt");
        assert!(entry.is_regular());
        assert!(!entry.is_dir());
        assert_eq!(entry.size(), 5);
        assert_eq!(entry.permissions(), 0o640);
        assert_eq!(entry.mode() & 0o170000, 0o100000);
        Ok(())
    }

    #[test]
    fn from_path_reads_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let entry = FileEntry::from_path(dir.path())?;
        assert!(entry.is_dir());
        assert!(!entry.is_regular());
        Ok(())
    }

    #[test]
    fn from_path_fails_on_missing_entry() {
        let err = FileEntry::from_path("/definitely/not/here").unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
