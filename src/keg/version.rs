//! Keg version ordering and current-version selection.
//!
//! [`PkgVersion`] gives installed version directory names a total order, and
//! [`VersionSelector`] picks the one keg per rack that gets published.

use std::cmp::Ordering;
use std::fmt;

use super::{Keg, Rack, Snapshot};

/// One run of a version string.
#[derive(Debug, Clone)]
enum Token {
    /// Digits with leading zeros stripped, compared by length then lexically
    Numeric(String),
    Alpha(String),
}

impl Token {
    fn cmp_token(&self, other: &Token) -> Ordering {
        match (self, other) {
            (Token::Numeric(a), Token::Numeric(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Token::Alpha(a), Token::Alpha(b)) => a.cmp(b),
            (Token::Numeric(_), Token::Alpha(_)) => Ordering::Greater,
            (Token::Alpha(_), Token::Numeric(_)) => Ordering::Less,
        }
    }

    /// Compare against the run a shorter version lacks: zero, above any alphabetic run.
    fn cmp_missing(&self) -> Ordering {
        match self {
            Token::Numeric(n) if n.is_empty() => Ordering::Equal,
            Token::Numeric(_) => Ordering::Greater,
            Token::Alpha(_) => Ordering::Less,
        }
    }
}

/// Version identifier of an installed keg, e.g. `1.2.0` or `2.0-beta1`.
///
/// Runs of digits compare numerically, other runs lexically, and a numeric run
/// sorts above an alphabetic one at the same position. A missing trailing run
/// counts as zero, so `1.0 == 1.0.0`, `1.0 < 1.0.1` and `2.0 > 2.0-rc1`.
#[derive(Debug, Clone)]
pub struct PkgVersion {
    raw: String,
    tokens: Vec<Token>,
}

impl PkgVersion {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: tokenize(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut numeric = false;

    let mut flush = |current: &mut String, numeric: bool| {
        if current.is_empty() {
            return;
        }
        let run = std::mem::take(current);
        if numeric {
            let trimmed = run.trim_start_matches('0');
            tokens.push(Token::Numeric(trimmed.to_string()));
        } else {
            tokens.push(Token::Alpha(run));
        }
    };

    for c in raw.chars() {
        if matches!(c, '.' | '-' | '_' | '+') {
            flush(&mut current, numeric);
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != numeric {
            flush(&mut current, numeric);
        }
        numeric = is_digit;
        current.push(c);
    }
    flush(&mut current, numeric);

    tokens
}

impl Ord for PkgVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let ord = match (self.tokens.get(i), other.tokens.get(i)) {
                (Some(a), Some(b)) => a.cmp_token(b),
                (Some(a), None) => a.cmp_missing(),
                (None, Some(b)) => b.cmp_missing().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for PkgVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PkgVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PkgVersion {}

impl fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Version selector - pure functions over a [`Snapshot`].
pub struct VersionSelector;

impl VersionSelector {
    /// Pick the kegs to publish.
    ///
    /// Explicitly requested kegs are returned verbatim. Otherwise every rack
    /// contributes its current keg; racks without kegs contribute nothing.
    pub fn select<'a>(snapshot: &'a Snapshot, explicit: Vec<&'a Keg>) -> Vec<&'a Keg> {
        if !explicit.is_empty() {
            return explicit;
        }
        snapshot.racks.iter().filter_map(Self::current).collect()
    }

    /// The keg of a rack that is currently exposed: the linked keg if there is
    /// one, else the keg with the greatest version.
    pub fn current(rack: &Rack) -> Option<&Keg> {
        rack.kegs
            .iter()
            .find(|k| k.linked)
            .or_else(|| rack.kegs.iter().max_by(|a, b| a.version.cmp(&b.version)))
    }
}
