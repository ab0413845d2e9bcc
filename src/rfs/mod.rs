//! The `rfs` module holds everything: tree descriptions, building and copying trees,
//! temporary directory lifecycles, and the ranking rules used to compare entries.

pub mod config;
pub mod entry;
pub mod error;
pub mod rank;
pub mod temp_dir;
pub mod tree_builder;
pub mod tree_copy;
pub mod tree_diff;

mod runtime;

// reexport
pub use entry::FileEntry;
pub use error::{FsTreeError, Result};
pub use temp_dir::{
    remove_tree, temp_clone_chdir, temp_clone_dir, temp_create_chdir, temp_create_dir,
    temp_init_chdir, temp_init_dir, Teardown,
};
pub use tree_builder::{build_tree, build_tree_with, BuildOptions};
pub use tree_copy::copy_tree;
pub use tree_diff::{collect_entries, tree_diff, Difference};
