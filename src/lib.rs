//! This library provides scratch filesystem trees for tests.
//! A test gets a temporary directory, empty, cloned from an existing tree, or built
//! from a YAML/JSON description, optionally switches into it, and gets back a teardown
//! that removes it even when the test locked down permissions inside.
//!
//! The [`rank`] module compares filesystem entries by name, kind, size, modification
//! time, permissions or content, and [`tree_diff`] applies such a chain to whole trees.

pub mod rfs;

pub use rfs::config;
pub use rfs::rank;

pub use rfs::{
    build_tree, build_tree_with, collect_entries, copy_tree, remove_tree, temp_clone_chdir,
    temp_clone_dir, temp_create_chdir, temp_create_dir, temp_init_chdir, temp_init_dir,
    tree_diff, BuildOptions, Difference, FileEntry, FsTreeError, Result, Teardown,
};
