use anyhow::{Result, bail};
use log::debug;

use crate::keg::{KegSpec, VersionSelector, scan};
use crate::publish::{PublishReport, Publisher};
use crate::runtime::Runtime;
use crate::shell::AliasShell;

use super::config::Config;

/// Publish the `.app` bundles of the requested kegs, or of the current keg of
/// every installed package when none are named.
#[tracing::instrument(skip(runtime, shell, config))]
pub fn link<R: Runtime, S: AliasShell>(
    runtime: &R,
    shell: &S,
    kegs: &[String],
    config: &Config,
) -> Result<PublishReport> {
    let specs = kegs
        .iter()
        .map(|s| s.parse::<KegSpec>())
        .collect::<Result<Vec<_>>>()?;

    if !runtime.exists(&config.target_dir) {
        bail!(
            "{} does not exist, stopping.\nRun `mkdir {}` first.",
            config.target_dir.display(),
            config.target_dir.display()
        );
    }

    let snapshot = scan(runtime, &config.layout)?;
    let explicit = specs
        .iter()
        .map(|spec| spec.resolve(&snapshot))
        .collect::<Result<Vec<_>>>()?;
    let selected = VersionSelector::select(&snapshot, explicit);
    debug!("Selected {} keg(s)", selected.len());

    let publisher = Publisher::new(
        runtime,
        shell,
        config.applinks.clone(),
        config.target_dir.clone(),
    );
    let report = publisher.publish_all(&selected)?;

    debug!(
        "Published {} app(s), {} warning(s)",
        report.published(),
        report.warnings()
    );
    Ok(report)
}
