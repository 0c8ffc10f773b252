//! Desktop-shell aliases.
//!
//! Finder aliases are not symlinks: they can only be inspected and created
//! through Finder's scripting interface. [`AliasShell`] is that capability;
//! [`OsaScript`] drives the real one through `osascript`.

mod osascript;

use anyhow::Result;
use log::debug;
use std::path::Path;

pub use osascript::{DEFAULT_INTERPRETER, OsaScript};

/// Finder's class for an alias file.
pub const ALIAS_FILE_CLASS: &str = "alias file";

#[cfg_attr(test, mockall::automock)]
pub trait AliasShell {
    /// Finder's class for the item at `path` (e.g. "alias file", "folder").
    fn classify(&self, path: &Path) -> Result<String>;

    /// Create an alias in `target_dir` to the item `app_name` of `links_dir`.
    fn create_alias(&self, app_name: &str, links_dir: &Path, target_dir: &Path) -> Result<()>;
}

/// Whether `path` is a Finder alias. Failing inspection counts as "no".
pub fn is_alias<S: AliasShell + ?Sized>(shell: &S, path: &Path) -> bool {
    match shell.classify(path) {
        Ok(class) => class == ALIAS_FILE_CLASS,
        Err(e) => {
            debug!("Could not inspect {:?}: {:#}", path, e);
            false
        }
    }
}
