use serde::{Deserialize, Serialize};

use super::file_content::FileContent;
use super::parse_mode;
use crate::rfs::error::Result;

/// The structure for file records in the configuration.
/// The file can be configured in four ways: as an empty file,
/// using a bytes array, using text, or by referencing a real file whose contents
/// will be used for the test file.
///
/// ## Empty file
///
/// ### yaml:
///
/// ```yaml
/// - !file
///     name: test.txt
///     content: !empty
/// ```
///
/// ### json:
///
/// ```json
/// { "file": { "name": "test.txt", "content": "empty" } }
/// ```
///
/// ## InlineBytes
///
/// Only useful for small test files. The content "test":
///
/// ```yaml
/// - !file
///     name: test.txt
///     content:
///       !inline_bytes [116, 101, 115, 116]
/// ```
///
/// ## Original file
///
/// For a larger file, point at a real one and its contents are copied:
///
/// ```yaml
/// - !file
///     name: test.mp3
///     mode: "0444"
///     content:
///       !original_file "./music.mp3"
/// ```
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct FileConf {
    pub name: String,

    /// Optional octal permission bits, e.g. `"0644"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    pub content: FileContent,
}

impl FileConf {
    pub fn permissions(&self) -> Result<Option<u32>> {
        parse_mode(self.mode.as_deref())
    }
}
