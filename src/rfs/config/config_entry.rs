use serde::{Deserialize, Serialize};

use super::{
    clone_directory_conf::CloneDirectoryConf, directory_conf::DirectoryConf, file_conf::FileConf,
    link_conf::LinkConf,
};

/// FS Config entry enum
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ConfigEntry {
    Directory(DirectoryConf),
    CloneDirectory(CloneDirectoryConf),
    File(FileConf),
    Link(LinkConf),
}

impl ConfigEntry {
    pub fn name(&self) -> &str {
        match self {
            ConfigEntry::Directory(conf) => &conf.name,
            ConfigEntry::CloneDirectory(conf) => &conf.name,
            ConfigEntry::File(conf) => &conf.name,
            ConfigEntry::Link(conf) => &conf.name,
        }
    }
}
