use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::{Keg, PkgVersion, Rack, Snapshot};
use crate::runtime::{Runtime, normalize_path};

const APP_EXTENSION: &str = "app";

/// Where installed kegs and their linked-keg records live.
#[derive(Debug, Clone, PartialEq)]
pub struct CellarLayout {
    /// `<prefix>/Cellar`
    pub cellar: PathBuf,
    /// `<prefix>/var/homebrew/linked`, one symlink per linked rack
    pub linked_dir: PathBuf,
}

impl CellarLayout {
    pub fn from_prefix(prefix: &Path) -> Self {
        Self {
            cellar: prefix.join("Cellar"),
            linked_dir: prefix.join("var").join("homebrew").join("linked"),
        }
    }
}

/// Scan the Cellar into a [`Snapshot`].
///
/// Directory structure: `<cellar>/<name>/<version>/{,libexec/}*.app`
#[tracing::instrument(skip(runtime))]
pub fn scan<R: Runtime>(runtime: &R, layout: &CellarLayout) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();

    if !runtime.exists(&layout.cellar) {
        debug!("Cellar {:?} does not exist, nothing installed", layout.cellar);
        return Ok(snapshot);
    }

    let entries = runtime
        .read_dir(&layout.cellar)
        .with_context(|| format!("Could not read {:?}", layout.cellar))?;

    for rack_path in entries {
        if !runtime.is_dir(&rack_path) {
            continue;
        }
        let Some(name) = file_name(&rack_path) else {
            continue;
        };

        match scan_rack(runtime, layout, &rack_path, &name) {
            Ok(rack) => snapshot.racks.push(rack),
            Err(e) => warn!("Skipping rack {:?}: {:#}", rack_path, e),
        }
    }

    debug!("Found {} rack(s) in {:?}", snapshot.racks.len(), layout.cellar);
    Ok(snapshot)
}

fn scan_rack<R: Runtime>(
    runtime: &R,
    layout: &CellarLayout,
    rack_path: &Path,
    name: &str,
) -> Result<Rack> {
    let linked_target = linked_keg(runtime, layout, name);
    let mut kegs = Vec::new();

    for keg_path in runtime.read_dir(rack_path)? {
        if !runtime.is_dir(&keg_path) {
            continue;
        }
        let Some(version) = file_name(&keg_path) else {
            continue;
        };

        let linked = linked_target
            .as_ref()
            .is_some_and(|target| same_keg(runtime, target, &keg_path));

        kegs.push(Keg {
            name: name.to_string(),
            version: PkgVersion::new(&version),
            apps: find_apps(runtime, &keg_path),
            path: keg_path,
            linked,
        });
    }

    Ok(Rack {
        name: name.to_string(),
        kegs,
    })
}

/// Target of the linked-keg record for a rack, if there is one.
fn linked_keg<R: Runtime>(runtime: &R, layout: &CellarLayout, name: &str) -> Option<PathBuf> {
    let record = layout.linked_dir.join(name);
    if !runtime.is_symlink(&record) {
        return None;
    }
    match runtime.resolve_link(&record) {
        Ok(target) => Some(target),
        Err(e) => {
            debug!("Unreadable linked keg record {:?}: {:#}", record, e);
            None
        }
    }
}

fn same_keg<R: Runtime>(runtime: &R, target: &Path, keg_path: &Path) -> bool {
    if normalize_path(target) == normalize_path(keg_path) {
        return true;
    }
    match (runtime.canonicalize(target), runtime.canonicalize(keg_path)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Application bundles directly under the keg or its `libexec`.
fn find_apps<R: Runtime>(runtime: &R, keg_path: &Path) -> Vec<PathBuf> {
    let mut apps = Vec::new();

    for dir in [keg_path.to_path_buf(), keg_path.join("libexec")] {
        if !runtime.is_dir(&dir) {
            continue;
        }
        let entries = match runtime.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not read {:?}: {:#}", dir, e);
                continue;
            }
        };
        apps.extend(entries.into_iter().filter(|p| {
            p.extension().is_some_and(|ext| ext == APP_EXTENSION) && runtime.is_dir(p)
        }));
    }

    apps
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn layout() -> CellarLayout {
        CellarLayout::from_prefix(Path::new("/usr/local"))
    }

    #[test]
    fn test_layout_from_prefix() {
        let layout = layout();
        assert_eq!(layout.cellar, PathBuf::from("/usr/local/Cellar"));
        assert_eq!(
            layout.linked_dir,
            PathBuf::from("/usr/local/var/homebrew/linked")
        );
    }

    #[test]
    fn test_scan_no_cellar() {
        let mut runtime = MockRuntime::new();

        // Cellar missing: /usr/local/Cellar -> false
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/usr/local/Cellar")))
            .returning(|_| false);

        let snapshot = scan(&runtime, &layout()).unwrap();
        assert!(snapshot.racks.is_empty());
    }

    #[test]
    fn test_scan_single_linked_keg() {
        let mut runtime = MockRuntime::new();

        let cellar = PathBuf::from("/usr/local/Cellar");
        let rack = cellar.join("foo");
        let keg = rack.join("1.2.0");
        let libexec = keg.join("libexec");
        let record = PathBuf::from("/usr/local/var/homebrew/linked/foo");

        runtime.expect_exists().with(eq(cellar.clone())).returning(|_| true);

        // --- Cellar and rack listing ---
        runtime
            .expect_read_dir()
            .with(eq(cellar.clone()))
            .returning(|p| Ok(vec![p.join("foo"), p.join(".DS_Store")]));
        runtime
            .expect_read_dir()
            .with(eq(rack.clone()))
            .returning(|p| Ok(vec![p.join("1.2.0")]));

        // --- Linked keg record -> ../../../Cellar/foo/1.2.0 ---
        runtime
            .expect_is_symlink()
            .with(eq(record.clone()))
            .returning(|_| true);
        runtime
            .expect_resolve_link()
            .with(eq(record))
            .returning(|_| Ok(PathBuf::from("/usr/local/Cellar/foo/1.2.0")));

        // --- Bundles: Foo.app at the keg root, no libexec ---
        runtime
            .expect_read_dir()
            .with(eq(keg.clone()))
            .returning(|p| Ok(vec![p.join("Foo.app"), p.join("bin"), p.join("README")]));
        runtime
            .expect_is_dir()
            .with(eq(cellar.join(".DS_Store")))
            .returning(|_| false);
        runtime
            .expect_is_dir()
            .with(eq(libexec))
            .returning(|_| false);
        runtime.expect_is_dir().returning(|_| true);

        let snapshot = scan(&runtime, &layout()).unwrap();

        assert_eq!(snapshot.racks.len(), 1);
        let rack = snapshot.rack("foo").unwrap();
        assert_eq!(rack.kegs.len(), 1);
        let keg = &rack.kegs[0];
        assert_eq!(keg.version.as_str(), "1.2.0");
        assert!(keg.linked);
        assert_eq!(keg.apps, vec![keg.path.join("Foo.app")]);
    }

    #[test]
    fn test_scan_unlinked_rack() {
        let mut runtime = MockRuntime::new();

        let cellar = PathBuf::from("/usr/local/Cellar");
        let rack = cellar.join("bar");

        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(cellar.clone()))
            .returning(|p| Ok(vec![p.join("bar")]));
        runtime
            .expect_read_dir()
            .with(eq(rack.clone()))
            .returning(|p| Ok(vec![p.join("0.1"), p.join("0.2")]));
        runtime.expect_read_dir().returning(|_| Ok(vec![]));
        runtime.expect_is_symlink().returning(|_| false);
        runtime.expect_is_dir().returning(|_| true);

        let snapshot = scan(&runtime, &layout()).unwrap();
        let rack = snapshot.rack("bar").unwrap();
        assert_eq!(rack.kegs.len(), 2);
        assert!(rack.kegs.iter().all(|k| !k.linked));
        assert!(rack.kegs.iter().all(|k| k.apps.is_empty()));
    }

    #[test_log::test]
    fn test_scan_unreadable_rack_is_skipped() {
        let mut runtime = MockRuntime::new();

        let cellar = PathBuf::from("/usr/local/Cellar");

        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(cellar.clone()))
            .returning(|p| Ok(vec![p.join("locked")]));
        runtime
            .expect_read_dir()
            .with(eq(cellar.join("locked")))
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));
        runtime.expect_is_symlink().returning(|_| false);
        runtime.expect_is_dir().returning(|_| true);

        let snapshot = scan(&runtime, &layout()).unwrap();
        assert!(snapshot.racks.is_empty());
    }

    #[test]
    fn test_scan_unreadable_cellar_fails() {
        let mut runtime = MockRuntime::new();

        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));

        let result = scan(&runtime, &layout());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Could not read"));
    }
}
