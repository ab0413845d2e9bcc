//! Ranking rules for pairs of [`FileEntry`] values.
//!
//! Every rule answers a single question: is `left` strictly less than `right`
//! under this criterion? Equal entries, and entries the criterion cannot order,
//! both answer `false`. Rules are chained with [`less`], which stops at the first
//! rule that answers `true`.
//!
//! ```rust
//! use rfs_tree::rank::{by_dir, by_name, less, Rank};
//! use rfs_tree::FileEntry;
//! # fn main() -> rfs_tree::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! # std::fs::create_dir(dir.path().join("zeta"))?;
//! # std::fs::write(dir.path().join("alpha.txt"), "")?;
//! let zeta = FileEntry::from_path(dir.path().join("zeta"))?;
//! let alpha = FileEntry::from_path(dir.path().join("alpha.txt"))?;
//!
//! // directories first, then by name
//! let chain: [&dyn Rank; 2] = [&by_dir, &by_name];
//! assert!(less(&zeta, &alpha, &chain));
//! assert!(!less(&alpha, &zeta, &chain));
//! # Ok(())
//! # }
//! ```
use std::fs::File;
use std::io::{BufReader, Bytes, Read};
use std::time::Duration;

use tracing::error;

use crate::rfs::entry::FileEntry;
use crate::rfs::error::FsTreeError;

/// Modification times closer together than this never rank as less in either direction.
pub const TIME_TOLERANCE: Duration = Duration::from_micros(10);

/// A strict less-than criterion over two entries.
///
/// Plain functions and closures with the signature
/// `Fn(&FileEntry, &FileEntry) -> bool` are rank functions already.
pub trait Rank {
    fn less(&self, left: &FileEntry, right: &FileEntry) -> bool;
}

impl<F> Rank for F
where
    F: Fn(&FileEntry, &FileEntry) -> bool,
{
    fn less(&self, left: &FileEntry, right: &FileEntry) -> bool {
        self(left, right)
    }
}

/// Applies `chain` in order and reports whether any rule ranks `left` before `right`.
///
/// An empty chain never orders anything. Order matters: `[by_dir, by_name]` puts
/// directories first and sorts by name within each kind.
pub fn less(left: &FileEntry, right: &FileEntry, chain: &[&dyn Rank]) -> bool {
    chain.iter().any(|rank| rank.less(left, right))
}

/// Byte-wise comparison of base names. Usually the first rule of a chain.
pub fn by_name(left: &FileEntry, right: &FileEntry) -> bool {
    left.name() < right.name()
}

/// Directories sort before everything else.
pub fn by_dir(left: &FileEntry, right: &FileEntry) -> bool {
    left.is_dir() && !right.is_dir()
}

/// Size order, defined only when both sides are regular files.
pub fn by_size(left: &FileEntry, right: &FileEntry) -> bool {
    left.is_regular() && right.is_regular() && left.size() < right.size()
}

/// Modification time order with [`TIME_TOLERANCE`] of slack.
pub fn by_time(left: &FileEntry, right: &FileEntry) -> bool {
    right
        .modified()
        .checked_sub(TIME_TOLERANCE)
        .is_some_and(|limit| left.modified() < limit)
}

/// Compares the rwxrwxrwx bits; type, setuid, setgid and sticky bits are ignored.
pub fn by_perm(left: &FileEntry, right: &FileEntry) -> bool {
    left.permissions() < right.permissions()
}

/// Receives failures that make a comparison meaningless.
///
/// Implementations must not return: the comparison that hit the failure has no
/// sensible boolean answer.
pub trait FailureReporter {
    fn fatal(&self, error: FsTreeError) -> !;
}

/// Fails the current test by panicking with the error message.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicOnFailure;

impl FailureReporter for PanicOnFailure {
    fn fatal(&self, error: FsTreeError) -> ! {
        error!("content comparison failed: {}", error);
        panic!("content comparison failed: {}", error)
    }
}

/// Compares file contents byte by byte, without looking at sizes first.
///
/// A file containing `aaa` ranks below one containing `ab`, though it is longer.
/// Put [`by_size`] earlier in the chain to order by size first. A file that is a
/// strict prefix of the other ranks lower.
///
/// Files that cannot be opened are handed to the [`FailureReporter`]; no retries.
#[derive(Debug, Clone)]
pub struct ByContent<R = PanicOnFailure> {
    reporter: R,
}

impl Default for ByContent<PanicOnFailure> {
    fn default() -> Self {
        ByContent::new(PanicOnFailure)
    }
}

impl<R: FailureReporter> ByContent<R> {
    pub fn new(reporter: R) -> Self {
        ByContent { reporter }
    }

    fn open(&self, entry: &FileEntry) -> Bytes<BufReader<File>> {
        match File::open(entry.path()) {
            Ok(file) => BufReader::new(file).bytes(),
            Err(e) => self.reporter.fatal(e.into()),
        }
    }
}

impl<R: FailureReporter> Rank for ByContent<R> {
    fn less(&self, left: &FileEntry, right: &FileEntry) -> bool {
        let mut left_bytes = self.open(left);
        let mut right_bytes = self.open(right);

        loop {
            // a read error on either side ends the comparison like EOF
            let Some(Ok(r_byte)) = right_bytes.next() else {
                return false;
            };
            let Some(Ok(l_byte)) = left_bytes.next() else {
                return true;
            };

            if l_byte != r_byte {
                return l_byte < r_byte;
            }
        }
    }
}
