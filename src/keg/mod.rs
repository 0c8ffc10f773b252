//! Installed packages.
//!
//! A rack is the directory grouping all installed versions of one package
//! (`<cellar>/<name>`), a keg is one installed version of it
//! (`<cellar>/<name>/<version>`). The Cellar is read once per run into an
//! immutable [`Snapshot`]; version selection and keg spec resolution are pure
//! functions over it.

mod cellar;
mod spec;
mod version;

use std::path::PathBuf;

pub use cellar::{CellarLayout, scan};
pub use spec::KegSpec;
pub use version::{PkgVersion, VersionSelector};

/// One installed version of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct Keg {
    pub name: String,
    pub version: PkgVersion,
    pub path: PathBuf,
    /// Whether this keg is the one linked into the prefix
    pub linked: bool,
    /// Application bundles (`*.app`) shipped by this keg
    pub apps: Vec<PathBuf>,
}

impl Keg {
    /// `name@version`, the form accepted on the command line.
    pub fn display_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// All installed versions of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct Rack {
    pub name: String,
    pub kegs: Vec<Keg>,
}

/// Read-only view of the Cellar taken at the start of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub racks: Vec<Rack>,
}

impl Snapshot {
    pub fn rack(&self, name: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.name == name)
    }
}
