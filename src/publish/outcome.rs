use std::path::{Path, PathBuf};

/// What happened to one application bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleOutcome {
    /// Link (re)created and a new alias made
    Published {
        app: PathBuf,
        link: PathBuf,
        alias: PathBuf,
    },
    /// Link (re)created; the alias was already there
    AlreadyAliased { app: PathBuf, alias: PathBuf },
    /// Something other than a symlink occupies the link path
    LinkCollision { app: PathBuf, link: PathBuf },
    LinkFailed {
        app: PathBuf,
        link: PathBuf,
        reason: String,
    },
    /// Something other than an alias occupies the alias path
    AliasCollision { app: PathBuf, alias: PathBuf },
    AliasFailed {
        app: PathBuf,
        alias: PathBuf,
        reason: String,
    },
}

impl BundleOutcome {
    pub fn app(&self) -> &Path {
        match self {
            BundleOutcome::Published { app, .. }
            | BundleOutcome::AlreadyAliased { app, .. }
            | BundleOutcome::LinkCollision { app, .. }
            | BundleOutcome::LinkFailed { app, .. }
            | BundleOutcome::AliasCollision { app, .. }
            | BundleOutcome::AliasFailed { app, .. } => app,
        }
    }

    /// Whether a warning or error line was printed for this bundle.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            BundleOutcome::Published { .. } | BundleOutcome::AlreadyAliased { .. }
        )
    }
}

/// Per-bundle outcomes of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishReport {
    pub outcomes: Vec<BundleOutcome>,
}

impl PublishReport {
    pub fn published(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BundleOutcome::Published { .. }))
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_warning()).count()
    }
}
