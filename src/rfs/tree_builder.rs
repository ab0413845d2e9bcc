use std::env;
use std::fs::Permissions;
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::fs::{self, hard_link, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::rfs::config::{
    CloneDirectoryConf, ConfigEntry, Configuration, DirectoryConf, FileConf, FileContent,
    LinkConf,
};
use crate::rfs::error::{FsTreeError, Result};
use crate::rfs::runtime;
use crate::rfs::tree_copy::copy_tree_async;

const LINKS_ALLOWED_VAR_NAME: &str = "LINKS_ALLOWED";

/// Switches that change what a description is allowed to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Hard links can modify the file they point to, so they are opt-in.
    pub links_allowed: bool,
}

impl BuildOptions {
    /// Links are allowed when `LINKS_ALLOWED` is set to anything but `N`.
    pub fn from_env() -> BuildOptions {
        let links_allowed =
            env::var(LINKS_ALLOWED_VAR_NAME).unwrap_or_else(|_| "N".to_string()) != "N";
        BuildOptions { links_allowed }
    }
}

/// Populates the existing directory `root` from a YAML or JSON description.
///
/// ```rust
/// # use std::fs;
/// # fn main() -> rfs_tree::Result<()> {
/// let root = tempfile::tempdir()?;
/// let config = r#"
/// - !directory
///     name: docs
///     content:
///       - !file
///           name: readme.txt
///           mode: "0444"
///           content: !inline_text "read me"
/// "#;
///
/// rfs_tree::build_tree(config.as_bytes(), root.path())?;
/// assert_eq!(fs::read_to_string(root.path().join("docs/readme.txt"))?, "read me");
/// # Ok(())
/// # }
/// ```
///
/// Relative `original_file`, `link` and `clone_directory` sources resolve against
/// the working directory of the process. Entries created before a failure are
/// left in place.
pub fn build_tree(config: impl Read, root: impl AsRef<Path>) -> Result<()> {
    build_tree_with(config, root, BuildOptions::from_env())
}

pub fn build_tree_with(
    mut config: impl Read,
    root: impl AsRef<Path>,
    options: BuildOptions,
) -> Result<()> {
    let mut config_str = String::new();
    config.read_to_string(&mut config_str)?;
    let config = Configuration::parse(&config_str)?;

    let root = root.as_ref();
    debug!("building {} entries in {}", config.0.len(), root.display());
    runtime::block_on(build_entries(&config.0, root, &options))?
}

/// Names must stay inside their parent directory.
fn entry_path(dir_path: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir_path.join(name)),
        _ => Err(FsTreeError::InvalidName(name.to_string())),
    }
}

async fn build_entries(
    entries: &[ConfigEntry],
    dir_path: &Path,
    options: &BuildOptions,
) -> Result<()> {
    for entry in entries {
        let path = entry_path(dir_path, entry.name())?;
        match entry {
            ConfigEntry::Directory(conf) => {
                build_directory_with_content(conf, &path, options).await?
            }
            ConfigEntry::CloneDirectory(conf) => clone_directory(conf, &path).await?,
            ConfigEntry::File(conf) => create_file(conf, &path).await?,
            ConfigEntry::Link(conf) => create_link(conf, &path, options).await?,
        }
    }
    Ok(())
}

fn build_entries_boxed<'a>(
    entries: &'a [ConfigEntry],
    dir_path: &'a Path,
    options: &'a BuildOptions,
) -> BoxFuture<'a, Result<()>> {
    async move { build_entries(entries, dir_path, options).await }.boxed()
}

async fn build_directory_with_content(
    conf: &DirectoryConf,
    path: &Path,
    options: &BuildOptions,
) -> Result<()> {
    let mode = conf.permissions()?;
    fs::create_dir(path).await?;

    build_entries_boxed(&conf.content, path, options).await?;

    if let Some(mode) = mode {
        fs::set_permissions(path, Permissions::from_mode(mode)).await?;
    }
    Ok(())
}

async fn clone_directory(conf: &CloneDirectoryConf, path: &Path) -> Result<()> {
    fs::create_dir(path).await?;
    copy_tree_async(Path::new(&conf.source), path).await
}

async fn create_file(conf: &FileConf, path: &Path) -> Result<()> {
    let mode = conf.permissions()?;
    let mut dst_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    match &conf.content {
        FileContent::InlineBytes(data) => dst_file.write_all(data).await?,
        FileContent::InlineText(text) => dst_file.write_all(text.as_bytes()).await?,
        FileContent::OriginalFile(file_path) => {
            let mut src_file = File::open(file_path).await?;
            tokio::io::copy(&mut src_file, &mut dst_file).await?;
        }
        FileContent::Empty => {}
    }
    dst_file.flush().await?;
    drop(dst_file);

    if let Some(mode) = mode {
        fs::set_permissions(path, Permissions::from_mode(mode)).await?;
    }
    Ok(())
}

/// WARNING!!! Changing the content through a link changes the original file.
async fn create_link(conf: &LinkConf, path: &Path, options: &BuildOptions) -> Result<()> {
    if !options.links_allowed {
        return Err(FsTreeError::NotAllowedSettings);
    }
    hard_link(&conf.target, path).await?;
    Ok(())
}
