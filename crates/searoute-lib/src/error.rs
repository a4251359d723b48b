use std::time::Duration;

use thiserror::Error;

use crate::coord::Coordinate;
use crate::network::NetworkKind;

/// Convenient result alias for the sea route library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate is out of range or not a finite number.
    #[error("invalid coordinate {coordinate}{}: {reason}", format_waypoint(.waypoint))]
    InvalidCoordinate {
        coordinate: Coordinate,
        waypoint: Option<usize>,
        reason: &'static str,
    },

    /// Raised when the vessel speed is zero, negative, or not finite.
    #[error("invalid speed {speed}: speed must be a finite value greater than zero")]
    InvalidSpeed { speed: f64 },

    /// Raised when a route request has fewer than two waypoints.
    #[error("a route needs at least two waypoints, got {count}")]
    InsufficientWaypoints { count: usize },

    /// Static network data is missing or malformed.
    #[error("failed to build {kind} network: {message}")]
    NetworkBuild { kind: NetworkKind, message: String },

    /// Raised when a port name could not be found in the port network.
    #[error("unknown port name: {name}{}", format_suggestions(.suggestions))]
    PortNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised for a segment without a connecting path when unreachable
    /// segments are configured to fail the route.
    #[error("no sea route found for segment {segment} between {from} and {to}")]
    Unreachable {
        segment: usize,
        from: Coordinate,
        to: Coordinate,
    },

    /// The caller cancelled the search.
    #[error("route search cancelled during segment {segment}")]
    SearchCancelled { segment: usize },

    /// A segment search ran longer than the configured limit.
    #[error("route search for segment {segment} exceeded the time limit of {limit:?}")]
    SearchTimeLimit { segment: usize, limit: Duration },

    /// Unexpected internal failure while computing a route.
    #[error("routing failed{}: {message}", format_segment(.segment))]
    RoutingFailure {
        segment: Option<usize>,
        message: String,
    },
}

impl Error {
    /// Stable, machine-readable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidCoordinate { .. } => "invalid_coordinate",
            Error::InvalidSpeed { .. } => "invalid_speed",
            Error::InsufficientWaypoints { .. } => "invalid_request",
            Error::NetworkBuild { .. } => "network_build",
            Error::PortNotFound { .. } => "port_not_found",
            Error::Unreachable { .. } => "unreachable",
            Error::SearchCancelled { .. } => "cancelled",
            Error::SearchTimeLimit { .. } => "time_limit",
            Error::RoutingFailure { .. } => "routing_failure",
        }
    }

    /// Index of the segment the error relates to, if any.
    pub fn segment(&self) -> Option<usize> {
        match self {
            Error::Unreachable { segment, .. }
            | Error::SearchCancelled { segment }
            | Error::SearchTimeLimit { segment, .. } => Some(*segment),
            Error::RoutingFailure { segment, .. } => *segment,
            _ => None,
        }
    }
}

fn format_waypoint(waypoint: &Option<usize>) -> String {
    match waypoint {
        Some(index) => format!(" at waypoint {index}"),
        None => String::new(),
    }
}

fn format_segment(segment: &Option<usize>) -> String {
    match segment {
        Some(index) => format!(" for segment {index}"),
        None => String::new(),
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
