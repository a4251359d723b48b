//! Named straits and canals, restriction sets and passage classification.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::path::Path;

/// A named navigable restriction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passage {
    Babalmandab,
    Bosporus,
    Gibraltar,
    Suez,
    Panama,
    Ormuz,
    Northwest,
    Malacca,
    Sunda,
    Chili,
    SouthAfrica,
}

impl Passage {
    pub const ALL: [Passage; 11] = [
        Passage::Babalmandab,
        Passage::Bosporus,
        Passage::Gibraltar,
        Passage::Suez,
        Passage::Panama,
        Passage::Ormuz,
        Passage::Northwest,
        Passage::Malacca,
        Passage::Sunda,
        Passage::Chili,
        Passage::SouthAfrica,
    ];

    /// Identifier used in data files and output.
    pub fn as_str(self) -> &'static str {
        match self {
            Passage::Babalmandab => "babalmandab",
            Passage::Bosporus => "bosporus",
            Passage::Gibraltar => "gibraltar",
            Passage::Suez => "suez",
            Passage::Panama => "panama",
            Passage::Ormuz => "ormuz",
            Passage::Northwest => "northwest",
            Passage::Malacca => "malacca",
            Passage::Sunda => "sunda",
            Passage::Chili => "chili",
            Passage::SouthAfrica => "south_africa",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Passage::Babalmandab => "Bab-el-Mandeb Strait",
            Passage::Bosporus => "Bosporus Strait",
            Passage::Gibraltar => "Strait of Gibraltar",
            Passage::Suez => "Suez Canal",
            Passage::Panama => "Panama Canal",
            Passage::Ormuz => "Strait of Hormuz",
            Passage::Northwest => "Northwest Passage",
            Passage::Malacca => "Strait of Malacca",
            Passage::Sunda => "Sunda Strait",
            Passage::Chili => "Strait of Magellan",
            Passage::SouthAfrica => "Cape of Good Hope",
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Passage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Passage::ALL
            .into_iter()
            .find(|passage| passage.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown passage '{}' (expected one of: {})",
                    s.trim(),
                    Passage::ALL.map(Passage::as_str).join(", ")
                )
            })
    }
}

/// Immutable set of passages a route must not use.
///
/// The default restricts the Northwest Passage only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Restrictions(BTreeSet<Passage>);

impl Restrictions {
    /// No passage is restricted.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, passage: Passage) -> bool {
        self.0.contains(&passage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Passage> + '_ {
        self.0.iter().copied()
    }

    /// Copy of this set with `passage` added.
    pub fn with(&self, passage: Passage) -> Self {
        let mut set = self.0.clone();
        set.insert(passage);
        Self(set)
    }

    /// Copy of this set with `passage` removed.
    pub fn without(&self, passage: Passage) -> Self {
        let mut set = self.0.clone();
        set.remove(&passage);
        Self(set)
    }
}

impl Default for Restrictions {
    fn default() -> Self {
        Self(BTreeSet::from([Passage::Northwest]))
    }
}

impl FromIterator<Passage> for Restrictions {
    fn from_iter<I: IntoIterator<Item = Passage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Passages whose edges `path` traverses, in order of first traversal.
pub fn classify(path: &Path, network: &Network) -> Vec<Passage> {
    let tags = path
        .nodes()
        .windows(2)
        .filter_map(|pair| network.edge_between(pair[0], pair[1]))
        .filter_map(|edge| edge.passage);
    filter_valid_passages(tags)
}

/// Drop duplicates while keeping the first occurrence of each passage.
pub fn filter_valid_passages<I>(passages: I) -> Vec<Passage>
where
    I: IntoIterator<Item = Passage>,
{
    let mut seen = BTreeSet::new();
    passages
        .into_iter()
        .filter(|passage| seen.insert(*passage))
        .collect()
}
