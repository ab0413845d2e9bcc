use serde::{Deserialize, Serialize};

use super::config_entry::ConfigEntry;
use crate::rfs::error::{FsTreeError, Result};

/// Declarative description of a tree: the entries placed directly under its root.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Configuration(pub Vec<ConfigEntry>);

impl Configuration {
    /// The configuration can be in the form of a string in YAML or JSON format.
    /// Input starting with `{` or `[` is JSON, anything else is YAML.
    ///
    /// # YAML Example
    ///
    /// ```rust
    /// # use rfs_tree::config::{Configuration, ConfigEntry, DirectoryConf, FileConf, FileContent};
    /// let simple_conf_str = "---
    ///   - !directory
    ///       name: test
    ///       content:
    ///         - !file
    ///             name: test.txt
    ///             content:
    ///               !inline_bytes
    ///                 - 116
    ///                 - 101
    ///                 - 115
    ///                 - 116
    /// ";
    /// let test_conf = Configuration(vec!(ConfigEntry::Directory(
    /// #   DirectoryConf {
    /// #     name: String::from("test"),
    /// #     mode: None,
    /// #     content: vec!(
    /// #       ConfigEntry::File(
    /// #         FileConf {
    /// #           name: String::from("test.txt"),
    /// #           mode: None,
    /// #           content: FileContent::InlineBytes(String::from("test").into_bytes()),
    /// #         }
    /// #       )
    /// #     ),
    /// #   }
    /// # )));
    /// # assert_eq!(test_conf, Configuration::parse(simple_conf_str).unwrap());
    /// ```
    ///
    /// ## JSON Example
    ///
    /// ```rust
    /// # use rfs_tree::config::{Configuration, ConfigEntry, DirectoryConf};
    /// let conf = Configuration::parse("[{\"directory\":{\"name\":\"test\",\"content\":[]}}]").unwrap();
    /// assert_eq!(
    ///     conf,
    ///     Configuration(vec![ConfigEntry::Directory(DirectoryConf {
    ///         name: String::from("test"),
    ///         mode: None,
    ///         content: Vec::new(),
    ///     })])
    /// );
    /// ```
    pub fn parse(config_str: &str) -> Result<Configuration> {
        let config_str = config_str.trim_start();
        match config_str.chars().next() {
            Some('{') | Some('[') => Ok(serde_json::from_str(config_str)?),
            Some(_) => Ok(serde_yaml::from_str(config_str)?),
            None => Err(FsTreeError::EmptyConfig),
        }
    }
}
