use anyhow::Result;
use log::debug;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::keg::CellarLayout;
use crate::runtime::Runtime;
use crate::shell::DEFAULT_INTERPRETER;

use super::paths::{DEFAULT_PREFIX, applinks_dir, target_dir};

/// Environment variable overriding the AppleScript interpreter
pub const INTERPRETER_ENV: &str = "OSASCRIPT";

/// Everything a run needs to know about where things live.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prefix: PathBuf,
    pub layout: CellarLayout,
    pub applinks: PathBuf,
    pub target_dir: PathBuf,
    pub interpreter: OsString,
}

impl Config {
    /// Resolve the configuration from command line values and the environment.
    pub fn load<R: Runtime>(runtime: &R, prefix: Option<PathBuf>, local: bool) -> Result<Self> {
        let prefix = prefix.unwrap_or_else(|| PathBuf::from(DEFAULT_PREFIX));
        let interpreter = runtime
            .env_var(INTERPRETER_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

        let config = Self {
            layout: CellarLayout::from_prefix(&prefix),
            applinks: applinks_dir(&prefix),
            target_dir: target_dir(runtime, local)?,
            interpreter: OsString::from(interpreter),
            prefix,
        };
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    #[cfg(test)]
    pub fn for_test(prefix: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        Self {
            layout: CellarLayout::from_prefix(&prefix),
            applinks: applinks_dir(&prefix),
            target_dir: target_dir.into(),
            interpreter: OsString::from(DEFAULT_INTERPRETER),
            prefix,
        }
    }
}
