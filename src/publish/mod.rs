//! Publication of application bundles.
//!
//! Every bundle goes through two stages: a symlink named after the bundle is
//! (re)created in the applinks directory, then a Finder alias to that symlink
//! is made in the target directory. Existing entries that are not ours are
//! never replaced. Per-bundle failures are printed and recorded in the
//! [`PublishReport`]; only failing to create the applinks directory stops the
//! run.

mod outcome;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::keg::Keg;
use crate::runtime::Runtime;
use crate::shell::{AliasShell, is_alias};

pub use outcome::{BundleOutcome, PublishReport};

pub struct Publisher<'a, R: Runtime, S: AliasShell> {
    runtime: &'a R,
    shell: &'a S,
    applinks: PathBuf,
    target_dir: PathBuf,
}

impl<'a, R: Runtime, S: AliasShell> Publisher<'a, R, S> {
    pub fn new(runtime: &'a R, shell: &'a S, applinks: PathBuf, target_dir: PathBuf) -> Self {
        Self {
            runtime,
            shell,
            applinks,
            target_dir,
        }
    }

    /// Publish every bundle of every keg, in order.
    #[tracing::instrument(skip(self, kegs))]
    pub fn publish_all(&self, kegs: &[&Keg]) -> Result<PublishReport> {
        let mut report = PublishReport::default();
        for keg in kegs {
            debug!("Publishing {} ({} app(s))", keg.display_name(), keg.apps.len());
            for app in &keg.apps {
                report.outcomes.push(self.publish_app(app)?);
            }
        }
        Ok(report)
    }

    /// Publish one bundle.
    ///
    /// Returns `Err` only when the applinks directory cannot be created, which
    /// must abort the whole run. Everything else is an outcome.
    #[tracing::instrument(skip(self))]
    pub fn publish_app(&self, app: &Path) -> Result<BundleOutcome> {
        self.ensure_applinks()?;

        let Some(name) = app.file_name() else {
            let reason = "bundle path has no file name".to_string();
            eprintln!("Error: Could not link {:?}: {}, skipping.", app, reason);
            return Ok(BundleOutcome::LinkFailed {
                app: app.to_path_buf(),
                link: self.applinks.clone(),
                reason,
            });
        };

        // --- Link stage ---
        let link = self.applinks.join(name);
        println!("Linking {} to {}.", app.display(), self.applinks.display());

        if self.entry_exists(&link) && !self.runtime.is_symlink(&link) {
            debug!("{:?} exists and is not a symlink", link);
            eprintln!("Warning: {} already exists, skipping.", link.display());
            return Ok(BundleOutcome::LinkCollision {
                app: app.to_path_buf(),
                link,
            });
        }

        if let Err(e) = self.replace_symlink(app, &link) {
            warn!("Failed to link {:?} -> {:?}: {:#}", link, app, e);
            eprintln!(
                "Error: Could not create symlink {}, skipping.",
                link.display()
            );
            return Ok(BundleOutcome::LinkFailed {
                app: app.to_path_buf(),
                link,
                reason: format!("{:#}", e),
            });
        }

        // --- Alias stage ---
        let alias = self.target_dir.join(name);
        println!(
            "Creating alias for {} in {}.",
            app.display(),
            self.target_dir.display()
        );

        if self.entry_exists(&alias) {
            if is_alias(self.shell, &alias) {
                debug!("{:?} is already an alias", alias);
                return Ok(BundleOutcome::AlreadyAliased {
                    app: app.to_path_buf(),
                    alias,
                });
            }
            eprintln!("Warning: {} already exists, skipping.", alias.display());
            return Ok(BundleOutcome::AliasCollision {
                app: app.to_path_buf(),
                alias,
            });
        }

        let app_name = name.to_string_lossy();
        if let Err(e) = self
            .shell
            .create_alias(&app_name, &self.applinks, &self.target_dir)
        {
            eprintln!(
                "Error: Could not create alias {}: {:#}",
                alias.display(),
                e
            );
            return Ok(BundleOutcome::AliasFailed {
                app: app.to_path_buf(),
                alias,
                reason: format!("{:#}", e),
            });
        }

        info!("Published {:?} as {:?}", app, alias);
        Ok(BundleOutcome::Published {
            app: app.to_path_buf(),
            link,
            alias,
        })
    }

    /// Create the applinks directory if it is missing.
    pub fn ensure_applinks(&self) -> Result<()> {
        if self.runtime.exists(&self.applinks) {
            return Ok(());
        }
        debug!("Creating applinks directory {:?}", self.applinks);
        let parent = self.applinks.parent().unwrap_or_else(|| Path::new("/"));
        self.runtime
            .create_dir_all(&self.applinks)
            .with_context(|| {
                format!(
                    "Could not create {}\nCheck you have permission to write to {}",
                    self.applinks.display(),
                    parent.display()
                )
            })
    }

    fn entry_exists(&self, path: &Path) -> bool {
        self.runtime.exists(path) || self.runtime.is_symlink(path)
    }

    /// Point `link` at `app`, swapping an existing symlink in a single rename.
    fn replace_symlink(&self, app: &Path, link: &Path) -> Result<()> {
        if !self.runtime.is_symlink(link) {
            return self.runtime.symlink(app, link);
        }

        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(link.file_name().unwrap_or_default());
        tmp_name.push(".tmp");
        let tmp = link.with_file_name(tmp_name);

        if self.runtime.is_symlink(&tmp) {
            self.runtime.remove_symlink(&tmp)?;
        }
        self.runtime.symlink(app, &tmp)?;
        self.runtime
            .rename(&tmp, link)
            .with_context(|| format!("Failed to replace symlink {:?}", link))
            .inspect_err(|_| {
                let _ = self.runtime.remove_symlink(&tmp);
            })
    }
}
