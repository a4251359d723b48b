//! Route command handler for computing a sea route through waypoints.

use std::time::Duration;

use anyhow::{Context, Result};

use searoute_lib::{
    compute_route, DistanceUnit, Error as RouteError, NetworkStore, Passage, Restrictions,
    RouteOptions, SearchLimits, UnreachablePolicy,
};

use crate::location::resolve_locations;
use crate::output::{render_route, OutputFormat, RouteReport};
use crate::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Origin port name or `lon,lat`.
    pub from: String,
    /// Destination port name or `lon,lat`.
    pub to: String,
    /// Intermediate waypoints, in order.
    pub via: Vec<String>,
    /// Speed in knots (or km/h, mph for other units).
    pub speed: f64,
    pub units: DistanceUnit,
    /// Report traversed passages.
    pub passages: bool,
    /// Passages to open even if restricted by default.
    pub allow: Vec<Passage>,
    /// Passages to avoid.
    pub restrict: Vec<Passage>,
    pub include_ports: bool,
    pub append_endpoints: bool,
    /// Fail when a segment has no sea route.
    pub strict: bool,
    /// Per-segment search time limit in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RouteCommandArgs {
    /// Waypoint inputs in travel order.
    pub fn waypoints(&self) -> Vec<String> {
        std::iter::once(self.from.clone())
            .chain(self.via.iter().cloned())
            .chain(std::iter::once(self.to.clone()))
            .collect()
    }

    /// Default restrictions, minus `--allow`, plus `--restrict`.
    pub fn restrictions(&self) -> Restrictions {
        let opened = self
            .allow
            .iter()
            .fold(Restrictions::default(), |set, p| set.without(*p));
        self.restrict
            .iter()
            .fold(opened, |set, passage| set.with(*passage))
    }

    /// Convert CLI args to library route options.
    pub fn to_options(&self) -> RouteOptions {
        let mut limits = SearchLimits::default();
        if let Some(ms) = self.timeout_ms {
            limits = limits.with_time_limit(Duration::from_millis(ms));
        }
        let unreachable = if self.strict {
            UnreachablePolicy::Fail
        } else {
            UnreachablePolicy::ZeroContribution
        };

        RouteOptions::default()
            .with_units(self.units)
            .with_speed(self.speed)
            .with_restrictions(self.restrictions())
            .with_passages(self.passages)
            .with_ports(self.include_ports)
            .with_endpoints(self.append_endpoints)
            .with_unreachable(unreachable)
            .with_limits(limits)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    store: &NetworkStore,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let options = args.to_options();
    let restrictions = &options.restrictions;
    let locations = resolve_locations(store, &args.waypoints())
        .map_err(|err| handle_route_failure(store, restrictions, err))?;
    let coordinates: Vec<_> = locations.iter().map(|l| l.coordinate).collect();

    let route = compute_route(store, &coordinates, &options)
        .map_err(|err| handle_route_failure(store, restrictions, err))?;

    let report = RouteReport::new(&locations, route);
    let rendered = render_route(format, &report, &ColorPalette::detect())
        .context("failed to serialize route")?;
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Turn library errors into messages that tell the user what to change.
pub(crate) fn handle_route_failure(
    store: &NetworkStore,
    restrictions: &Restrictions,
    err: RouteError,
) -> anyhow::Error {
    match err {
        RouteError::PortNotFound { name, suggestions } => {
            anyhow::anyhow!(format_unknown_port_message(&name, &suggestions))
        }
        RouteError::Unreachable { segment, from, to } => {
            let (from, to) = (from.to_string(), to.to_string());
            let message = format_unreachable_message(segment, &from, &to, restrictions);
            anyhow::anyhow!(message)
        }
        err @ RouteError::NetworkBuild { .. } => {
            let context = format!("failed to load sea route data from {}", store.source());
            anyhow::Error::new(err).context(context)
        }
        other => anyhow::Error::new(other),
    }
}

pub(crate) fn format_unknown_port_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown port '{}'.", name);
    if !suggestions.is_empty() {
        let formatted = if let [suggestion] = suggestions {
            format!("Did you mean '{suggestion}'?")
        } else {
            let joined = suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Did you mean one of: {}?", joined)
        };
        message.push(' ');
        message.push_str(&formatted);
    }
    message.push_str(" Use `searoute ports --search <text>` to list ports.");
    message
}

fn format_unreachable_message(
    segment: usize,
    from: &str,
    to: &str,
    restrictions: &Restrictions,
) -> String {
    let mut message = format!(
        "No sea route found for segment {} between {} and {}.",
        segment + 1,
        from,
        to
    );
    let restricted: Vec<&str> = restrictions.iter().map(Passage::as_str).collect();
    if restricted.is_empty() {
        message.push_str(" Try waypoints closer to open water.");
    } else {
        message.push_str(&format!(
            " Try allowing a restricted passage ({}) with --allow.",
            restricted.join(", ")
        ));
    }
    message
}
