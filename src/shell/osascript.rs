use anyhow::{Context, Result, bail};
use log::debug;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use super::AliasShell;

pub const DEFAULT_INTERPRETER: &str = "osascript";

/// Talks to Finder by running AppleScript through `osascript`.
///
/// Each script is written to a temporary file which is removed once the
/// interpreter returns.
#[derive(Debug, Clone)]
pub struct OsaScript {
    program: OsString,
}

impl OsaScript {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[tracing::instrument(skip(self, script))]
    fn run(&self, name: &str, script: &str) -> Result<String> {
        let mut script_file = tempfile::Builder::new()
            .prefix(name)
            .suffix(".applescript")
            .tempfile()
            .context("Failed to create script file")?;
        script_file.write_all(script.as_bytes())?;
        script_file.flush()?;

        debug!("Running {:?} {:?}", self.program, script_file.path());
        let output = Command::new(&self.program)
            .arg(script_file.path())
            .output()
            .with_context(|| format!("Failed to run {:?}", self.program))?;

        if !output.status.success() {
            bail!(
                "{:?} {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl AliasShell for OsaScript {
    fn classify(&self, path: &Path) -> Result<String> {
        self.run("check_alias", &check_alias_script(path))
    }

    fn create_alias(&self, app_name: &str, links_dir: &Path, target_dir: &Path) -> Result<()> {
        self.run(
            "create_alias",
            &create_alias_script(app_name, links_dir, target_dir),
        )?;
        Ok(())
    }
}

/// Quote a value as an AppleScript string literal.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn check_alias_script(path: &Path) -> String {
    format!(
        "tell application \"Finder\"\n\
         \x20 set posix_shortcut to POSIX file {}\n\
         \x20 set shortcut to item (posix_shortcut as text)\n\
         \x20 class of shortcut\n\
         end tell\n",
        quote(&path.to_string_lossy())
    )
}

fn create_alias_script(app_name: &str, links_dir: &Path, target_dir: &Path) -> String {
    format!(
        "tell application \"Finder\"\n\
         \x20 set posix_applinks to POSIX file {}\n\
         \x20 set applinks to item (posix_applinks as text)\n\
         \x20 set target_app to item {} of applinks\n\
         \x20 set posix_apps to POSIX file {}\n\
         \x20 set apps to item (posix_apps as text)\n\
         \x20 make new alias at apps to target_app\n\
         end tell\n",
        quote(&links_dir.to_string_lossy()),
        quote(app_name),
        quote(&target_dir.to_string_lossy())
    )
}
