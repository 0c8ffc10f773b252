//! Keg specification parsing and resolution for explicit arguments.

use anyhow::{Result, anyhow, bail};
use std::fmt;
use std::str::FromStr;

use super::{Keg, PkgVersion, Snapshot};

/// A keg named on the command line.
/// Format: "name" or "name@version"
#[derive(Debug, PartialEq, Clone)]
pub struct KegSpec {
    pub name: String,
    pub version: Option<String>,
}

impl fmt::Display for KegSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for KegSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = match s.split_once('@') {
            Some((name, version)) => {
                if version.is_empty() {
                    return Err(anyhow!(
                        "Invalid keg '{}': version after @ cannot be empty. Expected 'name@version'.",
                        s
                    ));
                }
                if version.contains('@') {
                    return Err(anyhow!(
                        "Invalid keg '{}': expected 'name' or 'name@version'.",
                        s
                    ));
                }
                (name, Some(version.to_string()))
            }
            None => (s, None),
        };

        if name.is_empty() {
            return Err(anyhow!("Invalid keg '{}': name cannot be empty.", s));
        }
        if name.contains('/') {
            return Err(anyhow!("Invalid keg '{}': name cannot contain '/'.", s));
        }

        Ok(KegSpec {
            name: name.to_string(),
            version,
        })
    }
}

impl KegSpec {
    /// Find the keg this spec names in the snapshot.
    ///
    /// `name@version` must match an installed keg exactly. A bare `name`
    /// means the linked keg, or the only installed keg.
    pub fn resolve<'a>(&self, snapshot: &'a Snapshot) -> Result<&'a Keg> {
        let Some(rack) = snapshot.rack(&self.name) else {
            bail!("No such keg: {}", self.name);
        };

        if let Some(version) = &self.version {
            let wanted = PkgVersion::new(version);
            return rack
                .kegs
                .iter()
                .find(|k| k.version.as_str() == version)
                .or_else(|| rack.kegs.iter().find(|k| k.version == wanted))
                .ok_or_else(|| anyhow!("{} is not installed", self));
        }

        if let Some(linked) = rack.kegs.iter().find(|k| k.linked) {
            return Ok(linked);
        }

        match rack.kegs.as_slice() {
            [] => bail!("No such keg: {}", self.name),
            [only] => Ok(only),
            kegs => bail!(
                "Multiple kegs installed for {}, none linked. Specify one of: {}",
                self.name,
                kegs.iter()
                    .map(|k| k.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
