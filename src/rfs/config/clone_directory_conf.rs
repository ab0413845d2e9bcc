use serde::{Deserialize, Serialize};

/// A directory filled with a copy of an existing one, for example:
///
/// ## yaml:
///
/// ```yaml
/// ---
///   - !clone_directory
///       name: test_dir
///       source: tests/data
/// ```
///
/// ## json:
///
/// ```json
/// [
///     {
///         "clone_directory": {
///             "name": "test_dir",
///             "source": "tests/data"
///         }
///     }
/// ]
/// ```
///
/// Only regular files and directories are copied, with their rwxrwxrwx bits.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct CloneDirectoryConf {
    /// A directory will be created with the given name.
    pub name: String,

    /// The directory to copy from, relative to the working directory of the process.
    pub source: String,
}
