//! Sea route library entry points.
//!
//! This crate loads the maritime networks, snaps coordinates onto them, runs
//! shortest-path searches and aggregates multi-waypoint routes with their
//! length, duration and traversed passages. Higher-level consumers (the CLI)
//! should only depend on the items exported here.

#![deny(warnings)]

pub mod coord;
pub mod dataset;
pub mod error;
pub mod network;
pub mod output;
pub mod passage;
pub mod path;
pub mod ports;
pub mod routing;
mod spatial;
pub mod store;
pub mod units;

pub use coord::{validate, Coordinate};
pub use dataset::{DataSource, NetworkData, ENV_DATA_DIR};
pub use error::{Error, Result};
pub use network::{build_network, Network, NetworkKind, NodeId};
pub use output::{feature_collection, port_features};
pub use passage::{classify, filter_valid_passages, Passage, Restrictions};
pub use path::{
    shortest_path, shortest_path_with_limits, Path, PathOutcome, SearchAbort, SearchLimits,
};
pub use ports::{Port, PortResolver};
pub use routing::{
    compute_route, compute_routes, AggregatedRoute, PortEndpoints, RouteOptions, RouteRequest,
    SegmentResult, UnreachablePolicy, DEFAULT_SPEED_KNOTS,
};
pub use store::NetworkStore;
pub use units::{duration_hours, path_length, DistanceUnit};
