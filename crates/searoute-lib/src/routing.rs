//! Multi-waypoint route aggregation.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::coord::{self, Coordinate};
use crate::error::{Error, Result};
use crate::network::{Network, NetworkKind};
use crate::passage::{classify, filter_valid_passages, Passage, Restrictions};
use crate::path::{shortest_path_with_limits, PathOutcome, SearchAbort, SearchLimits};
use crate::ports::Port;
use crate::store::NetworkStore;
use crate::units::{self, DistanceUnit};

/// Default vessel speed in knots.
pub const DEFAULT_SPEED_KNOTS: f64 = 24.0;

/// What to do with a segment whose endpoints are not connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachablePolicy {
    /// Keep going; the segment contributes no distance, time or geometry.
    #[default]
    ZeroContribution,
    /// Fail the whole route with [`Error::Unreachable`].
    Fail,
}

/// Immutable settings for a route computation.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub units: DistanceUnit,
    /// Speed in the natural per-hour measure of `units`.
    pub speed: f64,
    /// Passages the route must avoid.
    pub restrictions: Restrictions,
    /// Report traversed passages on the aggregated route.
    pub report_passages: bool,
    /// Replace the first and last waypoint with the nearest port.
    pub include_ports: bool,
    /// Add the exact waypoint coordinates to each found segment's geometry.
    pub append_endpoints: bool,
    pub unreachable: UnreachablePolicy,
    pub limits: SearchLimits,
    /// Route on this network instead of the store's marnet variant.
    pub network: Option<Arc<Network>>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            units: DistanceUnit::default(),
            speed: DEFAULT_SPEED_KNOTS,
            restrictions: Restrictions::default(),
            report_passages: false,
            include_ports: false,
            append_endpoints: false,
            unreachable: UnreachablePolicy::default(),
            limits: SearchLimits::default(),
            network: None,
        }
    }
}

impl RouteOptions {
    pub fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = units;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn with_passages(mut self, report: bool) -> Self {
        self.report_passages = report;
        self
    }

    pub fn with_ports(mut self, include: bool) -> Self {
        self.include_ports = include;
        self
    }

    pub fn with_endpoints(mut self, append: bool) -> Self {
        self.append_endpoints = append;
        self
    }

    pub fn with_unreachable(mut self, policy: UnreachablePolicy) -> Self {
        self.unreachable = policy;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_network(mut self, network: Arc<Network>) -> Self {
        self.network = Some(network);
        self
    }
}

/// Result for one consecutive waypoint pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    pub index: usize,
    pub from: Coordinate,
    pub to: Coordinate,
    pub geometry: Vec<Coordinate>,
    pub length: f64,
    pub units: DistanceUnit,
    pub duration_hours: f64,
    pub passages: Vec<Passage>,
    /// `false` when no path joins the endpoints.
    pub reachable: bool,
}

/// Ports substituted for the first and last waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortEndpoints {
    pub origin: Port,
    pub destination: Port,
}

/// A complete route across all waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRoute {
    pub geometry: Vec<Coordinate>,
    pub length: f64,
    pub units: DistanceUnit,
    pub speed: f64,
    pub duration_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passages: Option<Vec<Passage>>,
    pub segments: Vec<SegmentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<PortEndpoints>,
}

impl AggregatedRoute {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments that had no connecting path.
    pub fn unreachable_segments(&self) -> impl Iterator<Item = &SegmentResult> {
        self.segments.iter().filter(|segment| !segment.reachable)
    }

    pub fn duration_days(&self) -> f64 {
        self.duration_hours / 24.0
    }
}

/// Independent route computation, as used by [`compute_routes`].
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub waypoints: Vec<Coordinate>,
    pub options: RouteOptions,
}

impl RouteRequest {
    pub fn new(waypoints: Vec<Coordinate>, options: RouteOptions) -> Self {
        Self { waypoints, options }
    }
}

/// Compute a sea route through `waypoints` in order.
///
/// Every waypoint and the speed are validated before any network is touched.
/// Any error aborts the whole route; no partial result is returned.
pub fn compute_route(
    store: &NetworkStore,
    waypoints: &[Coordinate],
    options: &RouteOptions,
) -> Result<AggregatedRoute> {
    if waypoints.len() < 2 {
        return Err(Error::InsufficientWaypoints {
            count: waypoints.len(),
        });
    }
    for (index, waypoint) in waypoints.iter().enumerate() {
        coord::validate_waypoint(waypoint, index)?;
    }
    units::validate_speed(options.speed)?;

    let network = match &options.network {
        Some(network) => Arc::clone(network),
        None => store.get_network_variant(NetworkKind::Marnet, &options.restrictions)?,
    };

    let mut stops = waypoints.to_vec();
    let ports = if options.include_ports {
        Some(snap_to_ports(store, &mut stops)?)
    } else {
        None
    };

    let started = Instant::now();
    let mut segments = Vec::with_capacity(stops.len() - 1);
    for (index, pair) in stops.windows(2).enumerate() {
        segments.push(compute_segment(&network, index, pair[0], pair[1], options)?);
    }

    let length = segments.iter().map(|segment| segment.length).sum();
    let duration_hours = segments.iter().map(|segment| segment.duration_hours).sum();
    let geometry = segments
        .iter()
        .flat_map(|segment| segment.geometry.iter().copied())
        .collect();
    let passages = options.report_passages.then(|| {
        filter_valid_passages(
            segments
                .iter()
                .flat_map(|segment| segment.passages.iter().copied()),
        )
    });

    debug!(
        segments = segments.len(),
        length,
        units = %options.units,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "computed route"
    );

    Ok(AggregatedRoute {
        geometry,
        length,
        units: options.units,
        speed: options.speed,
        duration_hours,
        passages,
        segments,
        ports,
    })
}

/// Compute several independent routes in parallel. Results are returned in
/// request order; one failure does not affect the others.
pub fn compute_routes(
    store: &NetworkStore,
    requests: &[RouteRequest],
) -> Vec<Result<AggregatedRoute>> {
    let route = |r: &RouteRequest| compute_route(store, &r.waypoints, &r.options);
    requests.par_iter().map(route).collect()
}

fn compute_segment(
    network: &Network,
    index: usize,
    from: Coordinate,
    to: Coordinate,
    options: &RouteOptions,
) -> Result<SegmentResult> {
    let outcome = shortest_path_with_limits(network, &from, &to, &options.limits)
        .map_err(|abort| abort_error(abort, index))?;

    let path = match outcome {
        PathOutcome::Found(path) => path,
        PathOutcome::Unreachable => {
            if options.unreachable == UnreachablePolicy::Fail {
                return Err(Error::Unreachable {
                    segment: index,
                    from,
                    to,
                });
            }
            warn!(segment = index, %from, %to, "no sea route for segment; contributing zero");
            return Ok(SegmentResult {
                index,
                from,
                to,
                geometry: Vec::new(),
                length: 0.0,
                units: options.units,
                duration_hours: 0.0,
                passages: Vec::new(),
                reachable: false,
            });
        }
    };

    let passages = if options.report_passages {
        classify(&path, network)
    } else {
        Vec::new()
    };

    let mut geometry = path.into_coordinates();
    if options.append_endpoints {
        if geometry.first() != Some(&from) {
            geometry.insert(0, from);
        }
        if geometry.last() != Some(&to) {
            geometry.push(to);
        }
    }

    let length = units::path_length(&geometry, options.units);
    let duration_hours = units::duration_hours(options.speed, length)?;

    debug!(
        segment = index,
        nodes = geometry.len(),
        length,
        duration_hours,
        "computed segment"
    );

    Ok(SegmentResult {
        index,
        from,
        to,
        geometry,
        length,
        units: options.units,
        duration_hours,
        passages,
        reachable: true,
    })
}

fn abort_error(abort: SearchAbort, segment: usize) -> Error {
    match abort {
        SearchAbort::Cancelled => Error::SearchCancelled { segment },
        SearchAbort::TimeLimit(limit) => Error::SearchTimeLimit { segment, limit },
    }
}

/// Replace the first and last stop with their nearest ports.
fn snap_to_ports(store: &NetworkStore, stops: &mut [Coordinate]) -> Result<PortEndpoints> {
    let resolver = store.port_resolver()?;
    let last = stops.len() - 1;
    let mut nearest = |index: usize| -> Result<Port> {
        let (port, km) = resolver
            .nearest(&stops[index])
            .ok_or_else(|| Error::RoutingFailure {
                segment: None,
                message: "port network has no ports".to_string(),
            })?;
        debug!(waypoint = index, port = %port.name, snap_km = km, "snapped waypoint to port");
        stops[index] = port.coordinate;
        Ok(port.clone())
    };

    let origin = nearest(0)?;
    let destination = nearest(last)?;
    Ok(PortEndpoints {
        origin,
        destination,
    })
}
