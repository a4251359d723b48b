use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coord::{self, Coordinate};
use crate::dataset::NetworkData;
use crate::error::{Error, Result};
use crate::passage::{Passage, Restrictions};
use crate::spatial::SpatialIndex;

/// Dense node identifier, an index into [`Network::nodes`].
pub type NodeId = u32;

/// The maritime graphs a store can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    /// Global shipping lane network used for routing.
    Marnet,
    /// Port-to-port network; its nodes are the known ports.
    Ports,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 2] = [NetworkKind::Marnet, NetworkKind::Ports];

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkKind::Marnet => "marnet",
            NetworkKind::Ports => "ports",
        }
    }

    pub(crate) fn nodes_file(self) -> &'static str {
        match self {
            NetworkKind::Marnet => "marnet_nodes.csv",
            NetworkKind::Ports => "ports_nodes.csv",
        }
    }

    pub(crate) fn edges_file(self) -> &'static str {
        match self {
            NetworkKind::Marnet => "marnet_edges.csv",
            NetworkKind::Ports => "ports_edges.csv",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marnet" | "transport" => Ok(NetworkKind::Marnet),
            "ports" | "port" => Ok(NetworkKind::Ports),
            other => Err(format!("unknown network '{other}': use marnet or ports")),
        }
    }
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Key used by the edge list to reference this node.
    pub key: String,
    pub coordinate: Coordinate,
    /// Display name (ports only).
    pub name: Option<String>,
    /// ISO country code (ports only).
    pub country: Option<String>,
}

/// Undirected edge stored once per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    /// Great-circle length of the edge in kilometres.
    pub weight_km: f64,
    pub passage: Option<Passage>,
}

/// Immutable maritime graph with a spatial index for snapping.
#[derive(Debug)]
pub struct Network {
    kind: NetworkKind,
    nodes: Vec<Node>,
    adjacency: Vec<Vec<Edge>>,
    by_coordinate: HashMap<(u64, u64), NodeId>,
    by_key: HashMap<String, NodeId>,
    index: SpatialIndex,
    edge_count: usize,
}

impl Network {
    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of nodes with at least one edge.
    pub fn connected_node_count(&self) -> usize {
        self.index.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.node(id).map(|node| node.coordinate)
    }

    /// Return the edges leaving `id`.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Node whose coordinate equals `coordinate` exactly.
    pub fn node_at(&self, coordinate: &Coordinate) -> Option<NodeId> {
        self.by_coordinate.get(&coordinate.key()).copied()
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Snap `coordinate` to a node that has at least one edge. Returns the
    /// node and the snapping distance in kilometres.
    pub fn nearest(&self, coordinate: &Coordinate) -> Option<(NodeId, f64)> {
        if let Some(id) = self.node_at(coordinate) {
            if !self.neighbours(id).is_empty() {
                return Some((id, 0.0));
            }
        }
        self.index.nearest(coordinate)
    }

    /// The edge joining `a` and `b`. Each node pair has at most one edge.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.neighbours(a).iter().find(|edge| edge.target == b)
    }

    /// Passages tagged on at least one edge.
    pub fn passages(&self) -> BTreeSet<Passage> {
        self.adjacency
            .iter()
            .flatten()
            .filter_map(|edge| edge.passage)
            .collect()
    }

    /// Copy of this network without the edges of any restricted passage.
    pub fn restricted(&self, restrictions: &Restrictions) -> Network {
        let mut edge_count = 0;
        let adjacency: Vec<Vec<Edge>> = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(source, edges)| {
                let kept: Vec<Edge> = edges
                    .iter()
                    .filter(|edge| match edge.passage {
                        Some(passage) => !restrictions.contains(passage),
                        None => true,
                    })
                    .cloned()
                    .collect();
                edge_count += kept.iter().filter(|e| e.target as usize > source).count();
                kept
            })
            .collect();

        let index = build_index(&self.nodes, &adjacency);
        debug!(
            kind = %self.kind,
            edge_count,
            removed = self.edge_count - edge_count,
            "derived restricted network"
        );

        Network {
            kind: self.kind,
            nodes: self.nodes.clone(),
            adjacency,
            by_coordinate: self.by_coordinate.clone(),
            by_key: self.by_key.clone(),
            index,
            edge_count,
        }
    }
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.nodes == other.nodes && self.adjacency == other.adjacency
    }
}

/// Build a network from raw node and edge records.
///
/// Edges are undirected and weighted by the great-circle distance between
/// their endpoints. Self-loops and unknown passage tags are logged and
/// skipped.
pub fn build_network(kind: NetworkKind, data: &NetworkData) -> Result<Network> {
    let build_error = |message: String| Error::NetworkBuild { kind, message };

    let mut nodes: Vec<Node> = Vec::with_capacity(data.nodes.len());
    let mut by_coordinate = HashMap::with_capacity(data.nodes.len());
    let mut by_key = HashMap::with_capacity(data.nodes.len());

    for record in &data.nodes {
        let coordinate = Coordinate::new(record.lon, record.lat);
        coord::validate(&coordinate)
            .map_err(|err| build_error(format!("node '{}': {err}", record.key)))?;

        let id = NodeId::try_from(nodes.len())
            .map_err(|_| build_error("too many nodes".to_string()))?;
        if by_key.insert(record.key.clone(), id).is_some() {
            return Err(build_error(format!("duplicate node key '{}'", record.key)));
        }
        if let Some(existing) = by_coordinate.insert(coordinate.key(), id) {
            let (other, key) = (&nodes[existing as usize].key, &record.key);
            let message = format!("nodes '{other}' and '{key}' share coordinate {coordinate}");
            return Err(build_error(message));
        }

        nodes.push(Node {
            key: record.key.clone(),
            coordinate,
            name: record.name.clone(),
            country: record.country.clone(),
        });
    }

    let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); nodes.len()];
    let mut pairs: HashMap<(NodeId, NodeId), Option<Passage>> = HashMap::new();
    let mut edge_count = 0;

    for (line, record) in data.edges.iter().enumerate() {
        let lookup = |key: &str| {
            let Some(id) = by_key.get(key) else {
                let message = format!("edge {line} references unknown node '{key}'");
                return Err(build_error(message));
            };
            Ok(*id)
        };
        let from = lookup(&record.from)?;
        let to = lookup(&record.to)?;

        if from == to {
            warn!(%kind, node = %record.from, "skipping self-loop edge");
            continue;
        }

        let passage = match record.passage.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(tag) => match tag.parse::<Passage>() {
                Ok(passage) => Some(passage),
                Err(_) => {
                    warn!(
                        %kind,
                        tag,
                        from = %record.from,
                        to = %record.to,
                        "ignoring unknown passage tag"
                    );
                    None
                }
            },
        };

        let pair = (from.min(to), from.max(to));
        match pairs.get(&pair) {
            Some(existing) if *existing == passage => {
                warn!(%kind, from = %record.from, to = %record.to, "skipping duplicate edge");
                continue;
            }
            Some(_) => {
                let (a, b) = (&record.from, &record.to);
                let message = format!("edge {line}: '{a}'-'{b}' has a different passage tag");
                return Err(build_error(message));
            }
            None => {
                pairs.insert(pair, passage);
            }
        }

        let weight_km = nodes[from as usize]
            .coordinate
            .distance_km(&nodes[to as usize].coordinate);

        adjacency[from as usize].push(Edge {
            target: to,
            weight_km,
            passage,
        });
        adjacency[to as usize].push(Edge {
            target: from,
            weight_km,
            passage,
        });
        edge_count += 1;
    }

    let index = build_index(&nodes, &adjacency);

    Ok(Network {
        kind,
        nodes,
        adjacency,
        by_coordinate,
        by_key,
        index,
        edge_count,
    })
}

/// Only nodes with edges are snapping targets.
fn build_index(nodes: &[Node], adjacency: &[Vec<Edge>]) -> SpatialIndex {
    SpatialIndex::build(
        nodes
            .iter()
            .zip(adjacency)
            .enumerate()
            .filter(|(_, (_, edges))| !edges.is_empty())
            .map(|(id, (node, _))| (id as NodeId, node.coordinate)),
    )
}
