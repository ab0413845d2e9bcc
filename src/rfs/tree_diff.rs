use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::rfs::entry::FileEntry;
use crate::rfs::error::Result;
use crate::rfs::rank::{less, Rank};

/// One way two trees disagree, named by the path relative to both roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    OnlyLeft(PathBuf),
    OnlyRight(PathBuf),
    /// Present on both sides, but the chain ranks one before the other.
    Mismatch(PathBuf),
}

impl Difference {
    pub fn path(&self) -> &Path {
        match self {
            Difference::OnlyLeft(path)
            | Difference::OnlyRight(path)
            | Difference::Mismatch(path) => path,
        }
    }
}

/// Every entry below `root` (not `root` itself), keyed by its path relative to `root`.
pub fn collect_entries(root: impl AsRef<Path>) -> Result<BTreeMap<PathBuf, FileEntry>> {
    let root = root.as_ref();
    let mut entries = BTreeMap::new();

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?
            .to_path_buf();
        let metadata = entry.metadata()?;
        entries.insert(relative, FileEntry::from_metadata(entry.path(), &metadata)?);
    }
    Ok(entries)
}

/// Compares two trees entry by entry.
///
/// Entries are paired by relative path. A pair differs when `chain` ranks either
/// side strictly before the other, so an empty chain only reports entries missing
/// from one side. The result is ordered by path.
///
/// ```rust
/// use rfs_tree::rank::{by_dir, by_perm, by_size, ByContent, Rank};
/// # fn main() -> rfs_tree::Result<()> {
/// # let left = tempfile::tempdir()?;
/// # let right = tempfile::tempdir()?;
/// # std::fs::write(left.path().join("a.txt"), "same")?;
/// # std::fs::write(right.path().join("a.txt"), "same")?;
/// let content: ByContent = ByContent::default();
/// let chain: [&dyn Rank; 4] = [&by_dir, &by_perm, &by_size, &content];
///
/// assert!(rfs_tree::tree_diff(left.path(), right.path(), &chain)?.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn tree_diff(
    left: impl AsRef<Path>,
    right: impl AsRef<Path>,
    chain: &[&dyn Rank],
) -> Result<Vec<Difference>> {
    let left_entries = collect_entries(left)?;
    let mut right_entries = collect_entries(right)?;
    let mut differences = Vec::new();

    for (path, left_entry) in left_entries {
        match right_entries.remove(&path) {
            None => differences.push(Difference::OnlyLeft(path)),
            Some(right_entry) => {
                if less(&left_entry, &right_entry, chain) || less(&right_entry, &left_entry, chain)
                {
                    differences.push(Difference::Mismatch(path));
                }
            }
        }
    }
    differences.extend(right_entries.into_keys().map(Difference::OnlyRight));
    differences.sort_by(|a, b| a.path().cmp(b.path()));

    Ok(differences)
}
