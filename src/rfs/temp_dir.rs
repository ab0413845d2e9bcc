//! Temporary directories with guaranteed teardown.
//!
//! Every constructor returns a path and a [`Teardown`]. Running the teardown
//! (or dropping it) removes the directory and everything below it, and, for
//! the `*_chdir` variants, first switches back to the previous working directory.
//! Any failure part way through a constructor removes what it already created.
//!
//! ```rust
//! # fn main() -> rfs_tree::Result<()> {
//! let (root, teardown) = rfs_tree::temp_init_dir()?;
//! std::fs::write(root.join("scratch.txt"), "data")?;
//!
//! teardown.run();
//! assert!(!root.exists());
//! # Ok(())
//! # }
//! ```
//!
//! The working directory belongs to the whole process. The `*_chdir` variants
//! take a process-wide lock that is held until their teardown finishes, so
//! concurrently running tests wait for each other instead of interfering.
use std::cell::Cell;
use std::env;
use std::fs::{self, DirBuilder, Permissions};
use std::io::{self, Read};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use rand::Rng;
use tracing::{debug, error, warn};

use crate::rfs::error::{FsTreeError, Result};
use crate::rfs::tree_builder::build_tree;
use crate::rfs::tree_copy::copy_tree;

const TEMP_PREFIX: &str = "rfs_tree_";
const MAX_NAME_ATTEMPTS: usize = 16;
const OWNER_ALL: u32 = 0o700;

static CHDIR_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static HOLDS_CHDIR: Cell<bool> = const { Cell::new(false) };
}

/// Exclusive right to move the process working directory.
#[derive(Debug)]
struct ChdirGuard {
    _lock: MutexGuard<'static, ()>,
}

impl ChdirGuard {
    fn acquire() -> Result<ChdirGuard> {
        // a second acquire on the same thread would deadlock
        if HOLDS_CHDIR.with(Cell::get) {
            return Err(FsTreeError::ChdirBusy);
        }
        let lock = CHDIR_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        HOLDS_CHDIR.with(|holds| holds.set(true));
        Ok(ChdirGuard { _lock: lock })
    }
}

impl Drop for ChdirGuard {
    fn drop(&mut self) {
        HOLDS_CHDIR.with(|holds| holds.set(false));
    }
}

/// Removes a temporary directory, restoring the working directory first if needed.
///
/// `run` consumes the teardown so it can only happen once. Dropping a teardown
/// that was never run performs it as well.
///
/// Failing to restore the working directory or to remove the tree panics: the
/// remaining tests could no longer trust their environment. While the thread is
/// already panicking those failures are only logged.
#[derive(Debug)]
#[must_use = "the directory is removed as soon as the teardown is dropped"]
pub struct Teardown {
    root: PathBuf,
    restore_dir: Option<PathBuf>,
    chdir_guard: Option<ChdirGuard>,
    armed: bool,
}

impl Teardown {
    fn new(root: PathBuf) -> Teardown {
        Teardown {
            root,
            restore_dir: None,
            chdir_guard: None,
            armed: true,
        }
    }

    /// The directory this teardown removes.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Performs the teardown now.
    pub fn run(mut self) {
        self.execute();
    }

    fn execute(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;

        if let Some(old_dir) = self.restore_dir.take() {
            if let Err(e) = env::set_current_dir(&old_dir) {
                fatal(format!(
                    "failed to return to {}: {}",
                    old_dir.display(),
                    e
                ));
            }
        }

        debug!("removing temporary directory {}", self.root.display());
        if let Err(e) = remove_tree(&self.root) {
            fatal(format!("failed to remove {}: {}", self.root.display(), e));
        }

        self.chdir_guard.take();
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        if self.armed {
            warn!("teardown of {} dropped without run", self.root.display());
            self.execute();
        }
    }
}

fn fatal(message: String) {
    error!("{}", message);
    if !thread::panicking() {
        panic!("{}", message);
    }
}

/// Removes `root` and everything below it, whatever the permissions inside.
///
/// The first pass walks top-down, gives every directory back `0700` before reading
/// it and deletes everything that is not a directory. The second pass removes the
/// directories in reverse visiting order, so each one is already empty.
pub fn remove_tree(root: impl AsRef<Path>) -> Result<()> {
    let mut visited = Vec::new();
    let mut pending = vec![root.as_ref().to_path_buf()];

    while let Some(dir) = pending.pop() {
        fs::set_permissions(&dir, Permissions::from_mode(OWNER_ALL))?;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                pending.push(entry.path());
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        visited.push(dir);
    }

    for dir in visited.iter().rev() {
        fs::remove_dir(dir)?;
    }
    Ok(())
}

fn make_unique_dir(parent: &Path) -> io::Result<PathBuf> {
    let mut builder = DirBuilder::new();
    builder.mode(OWNER_ALL);

    for _ in 0..MAX_NAME_ATTEMPTS {
        let code = rand::rng().random::<u64>();
        let path = parent.join(format!("{TEMP_PREFIX}{code:016x}"));
        match builder.create(&path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no unused temporary directory name found",
    ))
}

/// Switches into `root`, arranging for `teardown` to switch back first.
fn enter(root: &Path, mut teardown: Teardown, guard: ChdirGuard) -> Result<(PathBuf, Teardown)> {
    teardown.chdir_guard = Some(guard);

    // on error the dropped teardown removes `root` and releases the guard
    let old_dir = env::current_dir()?;
    env::set_current_dir(root)?;
    debug!("working directory moved from {} to {}", old_dir.display(), root.display());

    teardown.restore_dir = Some(old_dir.clone());
    Ok((old_dir, teardown))
}

fn init_dir_in(parent: &Path) -> Result<(PathBuf, Teardown)> {
    let root = make_unique_dir(parent)?;
    debug!("created temporary directory {}", root.display());

    Ok((root.clone(), Teardown::new(root)))
}

fn clone_dir_in(parent: &Path, src: &Path) -> Result<(PathBuf, Teardown)> {
    let (root, teardown) = init_dir_in(parent)?;

    if let Err(e) = copy_tree(src, &root) {
        teardown.run();
        return Err(e);
    }
    Ok((root, teardown))
}

fn create_dir_in(parent: &Path, config: impl Read) -> Result<(PathBuf, Teardown)> {
    let (root, teardown) = init_dir_in(parent)?;

    if let Err(e) = build_tree(config, &root) {
        teardown.run();
        return Err(e);
    }
    Ok((root, teardown))
}

/// Creates an empty directory in [`std::env::temp_dir`].
///
/// Returns the new directory and its teardown. On error nothing is left behind.
pub fn temp_init_dir() -> Result<(PathBuf, Teardown)> {
    init_dir_in(&env::temp_dir())
}

/// Like [`temp_init_dir`], and also switches into the new directory.
///
/// Returns the previous working directory, which the teardown switches back to
/// before removing anything.
pub fn temp_init_chdir() -> Result<(PathBuf, Teardown)> {
    let guard = ChdirGuard::acquire()?;
    let (root, teardown) = temp_init_dir()?;

    enter(&root, teardown, guard)
}

/// Creates a temporary directory holding a copy of `src`.
///
/// See [`copy_tree`] for what is copied. If the copy fails the new directory is
/// removed before the error is returned.
pub fn temp_clone_dir(src: impl AsRef<Path>) -> Result<(PathBuf, Teardown)> {
    clone_dir_in(&env::temp_dir(), src.as_ref())
}

/// Like [`temp_clone_dir`], and also switches into the clone.
///
/// Returns the previous working directory. A relative `src` is resolved before
/// the switch.
pub fn temp_clone_chdir(src: impl AsRef<Path>) -> Result<(PathBuf, Teardown)> {
    let guard = ChdirGuard::acquire()?;
    let (root, teardown) = temp_clone_dir(src)?;

    enter(&root, teardown, guard)
}

/// Creates a temporary directory populated from a YAML or JSON description.
///
/// See [`build_tree`](crate::build_tree) for the format. Population failures remove
/// the directory before the error is returned.
pub fn temp_create_dir(config: impl Read) -> Result<(PathBuf, Teardown)> {
    create_dir_in(&env::temp_dir(), config)
}

/// Like [`temp_create_dir`], and also switches into the populated directory.
///
/// Returns the previous working directory. Relative paths inside the description
/// are resolved before the switch.
pub fn temp_create_chdir(config: impl Read) -> Result<(PathBuf, Teardown)> {
    let guard = ChdirGuard::acquire()?;
    let (root, teardown) = temp_create_dir(config)?;

    enter(&root, teardown, guard)
}
