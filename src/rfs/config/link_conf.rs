use serde::{Deserialize, Serialize};

/// The structure of the configuration link
///
/// The entry is a hard link to another file. Links are only created when the
/// `LINKS_ALLOWED` environment variable is set to anything but `N`.
///
/// ### yaml
///
/// ```yaml
/// - !link
///     name: test_link
///     target: Cargo.toml
/// ```
///
/// ### json
/// ```json
/// {
///   "link": {
///     "name": "test_link",
///     "target": "Cargo.toml"
///   }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
pub struct LinkConf {
    pub name: String,
    pub target: String,
}
