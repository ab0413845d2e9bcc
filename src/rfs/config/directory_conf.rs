use serde::{Deserialize, Serialize};

use super::config_entry::ConfigEntry;
use super::parse_mode;
use crate::rfs::error::Result;

/// Structure for directory record in configuration
/// for example:
///
/// ## yaml:
///
/// ```yaml
/// ---
///   - !directory
///       name: test
///       mode: "0555"
///       content:
///         - !file
///             name: test.txt
///             content: !empty
/// ```
///
/// ## json:
///
/// ```json
/// [
///     {
///         "directory": {
///             "name": "test",
///             "mode": "0555",
///             "content": [
///                 { "file": { "name": "test.txt", "content": "empty" } }
///             ]
///         }
///     }
/// ]
/// ```
///
/// The mode is applied once all of the content exists, so a read-only
/// directory can still be described with files inside it.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct DirectoryConf {
    /// A directory will be created with the given name.
    pub name: String,

    /// Optional octal permission bits, e.g. `"0750"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// The directory content can contain a list of various entries.
    pub content: Vec<ConfigEntry>,
}

impl DirectoryConf {
    pub fn permissions(&self) -> Result<Option<u32>> {
        parse_mode(self.mode.as_deref())
    }
}
