use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Install prefix used when neither `--prefix` nor `LINKAPPS_PREFIX` is given
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// System-wide applications directory
pub const SYSTEM_APPLICATIONS_DIR: &str = "/Applications";

/// Directory holding one symlink per published bundle
pub fn applinks_dir(prefix: &Path) -> PathBuf {
    prefix.join("Applinks")
}

/// Directory the aliases are created in: `/Applications`, or
/// `~/Applications` with `--local`.
#[tracing::instrument(skip(runtime))]
pub fn target_dir<R: Runtime>(runtime: &R, local: bool) -> Result<PathBuf> {
    let dir = if local {
        runtime
            .home_dir()
            .context("Could not find home directory")?
            .join("Applications")
    } else {
        PathBuf::from(SYSTEM_APPLICATIONS_DIR)
    };
    info!("Using target directory: {}", dir.display());
    Ok(dir)
}
