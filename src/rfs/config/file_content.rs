use serde::{Deserialize, Serialize};

/// What goes into a described file.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FileContent {
    /// A byte vector:
    ///
    /// ```yaml
    /// - !file
    ///     name: test.txt
    ///     content:
    ///         !inline_bytes
    ///             - 116
    ///             - 101
    ///             - 115
    ///             - 116
    /// ```
    InlineBytes(Vec<u8>),
    /// A plain string, written as UTF-8:
    ///
    /// ```yaml
    /// - !file
    ///     name: test.txt
    ///     content:
    ///         !inline_text test
    /// ```
    InlineText(String),
    /// The contents of a real file, relative to the working directory of the process:
    ///
    /// ```yaml
    /// - !file
    ///     name: test.txt
    ///     content:
    ///         !original_file "fixtures/test.txt"
    /// ```
    OriginalFile(String),
    /// Nothing at all:
    ///
    /// ```yaml
    /// - !file
    ///     name: test.txt
    ///     content: !empty
    /// ```
    Empty,
}
