use anyhow::Result;
use std::path::PathBuf;

use crate::runtime::Runtime;
use crate::shell::OsaScript;

pub mod config;
mod link;
mod paths;

pub use link::link;

use config::Config;

/// Entry point of the `link` subcommand.
#[tracing::instrument(skip(runtime))]
pub fn link_apps<R: Runtime>(
    runtime: R,
    kegs: &[String],
    prefix: Option<PathBuf>,
    local: bool,
) -> Result<()> {
    let config = Config::load(&runtime, prefix, local)?;
    let shell = OsaScript::new(config.interpreter.clone());
    link(&runtime, &shell, kegs, &config)?;
    Ok(())
}
