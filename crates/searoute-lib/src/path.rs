use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::coord::Coordinate;
use crate::network::{Network, NodeId};

/// Heap pops between two checks of the cancellation flag and clock.
/// 1024 - 1 = 1023 = 0x3FF
const LIMIT_CHECK_MASK: u64 = 0x3FF;

/// Ordered nodes of a route through a network, with their coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    coordinates: Vec<Coordinate>,
}

impl Path {
    fn from_nodes(network: &Network, nodes: Vec<NodeId>) -> Self {
        let coordinates = nodes
            .iter()
            .filter_map(|id| network.coordinate(*id))
            .collect();
        Self { nodes, coordinates }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coordinates
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of a shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    Found(Path),
    /// No sequence of edges joins the snapped endpoints.
    Unreachable,
}

impl PathOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }

    /// Path view where an unreachable outcome is an empty path.
    pub fn into_path(self) -> Path {
        match self {
            PathOutcome::Found(path) => path,
            PathOutcome::Unreachable => Path::default(),
        }
    }
}

/// Optional bounds on a single search.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub time_limit: Option<Duration>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_unbounded(&self) -> bool {
        self.time_limit.is_none() && self.cancel.is_none()
    }
}

/// Why a bounded search stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAbort {
    Cancelled,
    TimeLimit(Duration),
}

/// Find the shortest path between two coordinates.
///
/// Both endpoints are snapped to the nearest connected node first. Endpoints
/// that snap to the same node give a single-node path.
pub fn shortest_path(network: &Network, from: &Coordinate, to: &Coordinate) -> PathOutcome {
    match shortest_path_with_limits(network, from, to, &SearchLimits::default()) {
        Ok(outcome) => outcome,
        // Unbounded searches cannot abort.
        Err(_) => PathOutcome::Unreachable,
    }
}

/// [`shortest_path`] that gives up when the cancellation flag is raised or
/// the time limit elapses.
pub fn shortest_path_with_limits(
    network: &Network,
    from: &Coordinate,
    to: &Coordinate,
    limits: &SearchLimits,
) -> Result<PathOutcome, SearchAbort> {
    let Some((start, start_snap_km)) = network.nearest(from) else {
        return Ok(PathOutcome::Unreachable);
    };
    let Some((goal, goal_snap_km)) = network.nearest(to) else {
        return Ok(PathOutcome::Unreachable);
    };
    trace!(
        start,
        goal,
        start_snap_km,
        goal_snap_km,
        "snapped endpoints"
    );

    if start == goal {
        return Ok(PathOutcome::Found(Path::from_nodes(network, vec![start])));
    }

    match dijkstra(network, start, goal, limits)? {
        Some(nodes) => Ok(PathOutcome::Found(Path::from_nodes(network, nodes))),
        None => Ok(PathOutcome::Unreachable),
    }
}

fn dijkstra(
    network: &Network,
    start: NodeId,
    goal: NodeId,
    limits: &SearchLimits,
) -> Result<Option<Vec<NodeId>>, SearchAbort> {
    let node_count = network.node_count();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<NodeId>> = vec![None; node_count];
    let mut queue = BinaryHeap::new();

    let started = Instant::now();
    let check_limits = !limits.is_unbounded();
    let mut steps: u64 = 0;

    distances[start as usize] = 0.0;
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if check_limits && (steps & LIMIT_CHECK_MASK) == 0 {
            check(limits, started)?;
        }
        steps += 1;

        let current_distance = distances[entry.node as usize];
        if entry.cost.0 > current_distance {
            continue;
        }

        if entry.node == goal {
            return Ok(Some(reconstruct_path(&parents, start, goal)));
        }

        for edge in network.neighbours(entry.node) {
            let next = edge.target;
            let next_cost = current_distance + edge.weight_km;
            if next_cost < distances[next as usize] {
                distances[next as usize] = next_cost;
                parents[next as usize] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    Ok(None)
}

fn check(limits: &SearchLimits, started: Instant) -> Result<(), SearchAbort> {
    if let Some(flag) = &limits.cancel {
        if flag.load(AtomicOrdering::Relaxed) {
            return Err(SearchAbort::Cancelled);
        }
    }
    if let Some(limit) = limits.time_limit {
        if started.elapsed() >= limit {
            return Err(SearchAbort::TimeLimit(limit));
        }
    }
    Ok(())
}

fn reconstruct_path(parents: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node as usize];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
