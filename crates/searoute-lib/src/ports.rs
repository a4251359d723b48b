//! Port lookup by name, code, substring and position.

use std::collections::HashMap;

use serde::Serialize;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::network::{Network, NodeId};
use crate::spatial::SpatialIndex;

/// Minimum Jaro-Winkler similarity for a name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Number of suggestions attached to [`Error::PortNotFound`].
const MAX_SUGGESTIONS: usize = 3;

/// A named port from the port network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub name: String,
    /// UN/LOCODE-style identifier.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub coordinate: Coordinate,
}

/// Lookup table over the ports of a port network.
#[derive(Debug)]
pub struct PortResolver {
    ports: Vec<Port>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    index: SpatialIndex,
}

impl PortResolver {
    /// Collect every node of `network` as a port. Nodes without a name are
    /// named by their key.
    pub fn from_network(network: &Network) -> Self {
        let ports: Vec<Port> = network
            .nodes()
            .iter()
            .map(|node| Port {
                name: node.name.clone().unwrap_or_else(|| node.key.clone()),
                code: node.key.clone(),
                country: node.country.clone(),
                coordinate: node.coordinate,
            })
            .collect();

        let mut by_name = HashMap::with_capacity(ports.len());
        let mut by_code = HashMap::with_capacity(ports.len());
        for (idx, port) in ports.iter().enumerate() {
            // First occurrence wins for duplicate names.
            let name = normalize_port_name(&port.name);
            by_name.entry(name).or_insert(idx);
            let code = normalize_port_name(&port.code);
            by_code.entry(code).or_insert(idx);
        }

        let index = SpatialIndex::build(
            ports
                .iter()
                .enumerate()
                .map(|(idx, port)| (idx as NodeId, port.coordinate)),
        );

        Self {
            ports,
            by_name,
            by_code,
            index,
        }
    }

    /// Resolve a port by name or code, ignoring whitespace and case.
    pub fn resolve(&self, name: &str) -> Result<&Port> {
        self.find(name).ok_or_else(|| Error::PortNotFound {
            name: name.trim().to_string(),
            suggestions: self.fuzzy_matches(name, MAX_SUGGESTIONS),
        })
    }

    /// Like [`resolve`](Self::resolve) without building suggestions.
    pub fn find(&self, name: &str) -> Option<&Port> {
        let key = normalize_port_name(name);
        self.by_name
            .get(&key)
            .or_else(|| self.by_code.get(&key))
            .map(|idx| &self.ports[*idx])
    }

    /// Ports whose normalised name contains the normalised query, sorted by
    /// name. An empty query returns every port.
    pub fn search(&self, query: &str) -> Vec<&Port> {
        let needle = normalize_port_name(query);
        let mut matches: Vec<&Port> = self
            .ports
            .iter()
            .filter(|port| normalize_port_name(&port.name).contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// Port names similar to `name`, best match first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let query = normalize_port_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .ports
            .iter()
            .map(|port| {
                let score = strsim::jaro_winkler(&query, &normalize_port_name(&port.name));
                (score, port.name.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.dedup_by(|a, b| a.1 == b.1);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Closest port to `coordinate` and its distance in kilometres.
    pub fn nearest(&self, coordinate: &Coordinate) -> Option<(&Port, f64)> {
        self.index
            .nearest(coordinate)
            .map(|(idx, km)| (&self.ports[idx as usize], km))
    }

    /// Ports in data order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Lowercase and drop all whitespace.
pub fn normalize_port_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
