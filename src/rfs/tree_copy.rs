use std::fs::Permissions;
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::rfs::error::{FsTreeError, Result};
use crate::rfs::runtime;

/// Copies the content of `src` into the existing directory `dst`.
///
/// Only directories and regular files are copied; symlinks, devices, fifos and
/// sockets are skipped. Each copied entry keeps its rwxrwxrwx bits, while `dst`
/// keeps its own mode. Unreadable files, and directories without read and
/// execute permission, fail the copy and leave `dst` partially filled. A `dst`
/// inside `src`, or `src` itself, is refused before anything is copied.
pub fn copy_tree(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    runtime::block_on(copy_tree_async(src.as_ref(), dst.as_ref()))?
}

pub(crate) async fn copy_tree_async(src: &Path, dst: &Path) -> Result<()> {
    if !fs::metadata(src).await?.is_dir() {
        return Err(FsTreeError::NotADirectory(src.to_path_buf()));
    }
    // the walk would pick up the copies it creates
    let (src_real, dst_real) = (fs::canonicalize(src).await?, fs::canonicalize(dst).await?);
    if dst_real.starts_with(&src_real) {
        return Err(FsTreeError::DestinationInsideSource {
            src: src_real,
            dst: dst_real,
        });
    }
    debug!("copying {} into {}", src.display(), dst.display());

    // modes are applied last so read-only directories can still be filled
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let dst_path = dst.join(relative);
        let mode = entry.metadata()?.mode() & 0o777;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&dst_path).await?;
            dir_modes.push((dst_path, mode));
        } else if file_type.is_file() {
            fs::copy(entry.path(), &dst_path).await?;
            fs::set_permissions(&dst_path, Permissions::from_mode(mode)).await?;
        } else {
            warn!("skipping {}: not a regular file", entry.path().display());
        }
    }

    for (dir, mode) in dir_modes.into_iter().rev() {
        fs::set_permissions(&dir, Permissions::from_mode(mode)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn mode_of(path: &Path) -> u32 {
        std_fs::metadata(path).unwrap().mode() & 0o777
    }

    #[test]
    fn copies_nested_files_with_permissions() -> Result<()> {
        let src = tempfile::tempdir()?;
        let dst = tempfile::tempdir()?;
        std_fs::create_dir_all(src.path().join("a/b"))?;
        std_fs::write(src.path().join("top.txt"), "top")?;
        std_fs::write(src.path().join("a/b/deep.txt"), "deep")?;
        std_fs::set_permissions(src.path().join("top.txt"), Permissions::from_mode(0o640))?;
        std_fs::set_permissions(src.path().join("a"), Permissions::from_mode(0o750))?;

        copy_tree(src.path(), dst.path())?;

        assert_eq!(std_fs::read_to_string(dst.path().join("top.txt"))?, "top");
        assert_eq!(std_fs::read_to_string(dst.path().join("a/b/deep.txt"))?, "deep");
        assert_eq!(mode_of(&dst.path().join("top.txt")), 0o640);
        assert_eq!(mode_of(&dst.path().join("a")), 0o750);
        Ok(())
    }

    #[test]
    fn fills_read_only_directories() -> Result<()> {
        let src = tempfile::tempdir()?;
        let dst = tempfile::tempdir()?;
        let locked = src.path().join("locked");
        std_fs::create_dir(&locked)?;
        std_fs::write(locked.join("inner.txt"), "inner")?;
        std_fs::set_permissions(&locked, Permissions::from_mode(0o555))?;

        copy_tree(src.path(), dst.path())?;

        let copied = dst.path().join("locked");
        assert_eq!(mode_of(&copied), 0o555);
        assert_eq!(std_fs::read_to_string(copied.join("inner.txt"))?, "inner");

        // let the fixtures clean up after themselves
        std_fs::set_permissions(&locked, Permissions::from_mode(0o755))?;
        std_fs::set_permissions(&copied, Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[test]
    fn skips_symlinks() -> Result<()> {
        let src = tempfile::tempdir()?;
        let dst = tempfile::tempdir()?;
        std_fs::write(src.path().join("real.txt"), "real")?;
        std::os::unix::fs::symlink("real.txt", src.path().join("alias.txt"))?;

        copy_tree(src.path(), dst.path())?;

        assert!(dst.path().join("real.txt").is_file());
        assert!(std_fs::symlink_metadata(dst.path().join("alias.txt")).is_err());
        Ok(())
    }

    #[test]
    fn rejects_file_source() -> Result<()> {
        let src = tempfile::tempdir()?;
        let dst = tempfile::tempdir()?;
        let file = src.path().join("plain.txt");
        std_fs::write(&file, "x")?;

        let err = copy_tree(&file, dst.path()).unwrap_err();
        assert!(matches!(err, FsTreeError::NotADirectory(ref p) if p == &file));
        Ok(())
    }

    #[test]
    fn fails_on_missing_source() -> Result<()> {
        let dst = tempfile::tempdir()?;
        let err = copy_tree("/definitely/not/here", dst.path()).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        Ok(())
    }

    #[test]
    fn refuses_destination_inside_source() -> Result<()> {
        let src = tempfile::tempdir()?;
        std_fs::write(src.path().join("a.txt"), "a")?;
        std_fs::create_dir(src.path().join("nested"))?;

        let err = copy_tree(src.path(), src.path().join("nested")).unwrap_err();
        assert!(matches!(err, FsTreeError::DestinationInsideSource { .. }));
        assert!(matches!(
            copy_tree(src.path(), src.path()),
            Err(FsTreeError::DestinationInsideSource { .. })
        ));
        assert!(is_empty_dir(&src.path().join("nested")));
        Ok(())
    }

    fn is_empty_dir(path: &Path) -> bool {
        std_fs::read_dir(path).unwrap().next().is_none()
    }
}
