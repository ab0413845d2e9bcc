//! The `config` module describes a tree declaratively.
//! Entries can be directories, files, hard links, and cloned directories.

pub mod clone_directory_conf;
pub mod config_entry;
pub mod configuration;
pub mod directory_conf;
pub mod file_conf;
pub mod file_content;
pub mod link_conf;

pub use clone_directory_conf::CloneDirectoryConf;
pub use config_entry::ConfigEntry;
pub use configuration::Configuration;
pub use directory_conf::DirectoryConf;
pub use file_conf::FileConf;
pub use file_content::FileContent;
pub use link_conf::LinkConf;

use crate::rfs::error::{FsTreeError, Result};

/// Reads an octal permission string such as `"0644"` or `"755"`.
fn parse_mode(mode: Option<&str>) -> Result<Option<u32>> {
    let Some(text) = mode else {
        return Ok(None);
    };
    let digits = text.strip_prefix("0o").unwrap_or(text);

    match u32::from_str_radix(digits, 8) {
        Ok(bits) if !digits.is_empty() && bits <= 0o777 => Ok(Some(bits)),
        _ => Err(FsTreeError::InvalidMode(text.to_string())),
    }
}
