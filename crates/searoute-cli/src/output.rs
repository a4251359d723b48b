//! Output formatting for routes, ports and networks.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use searoute_lib::{AggregatedRoute, Network, Passage, Port};

use crate::location::Location;
use crate::terminal::{format_distance, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The full route as JSON.
    Json,
    /// A GeoJSON feature (or feature collection).
    Geojson,
}

impl OutputFormat {
    /// Machine formats keep stdout free of log noise.
    pub fn is_machine_readable(self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

/// A computed route together with the names of its waypoints.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub waypoints: Vec<String>,
    #[serde(flatten)]
    pub route: AggregatedRoute,
}

impl RouteReport {
    pub fn new(locations: &[Location], route: AggregatedRoute) -> Self {
        Self {
            waypoints: locations.iter().map(|l| l.label.clone()).collect(),
            route,
        }
    }
}

/// Render a single route report.
pub fn render_route(
    format: OutputFormat,
    report: &RouteReport,
    palette: &ColorPalette,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(route_text(report, palette)),
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Geojson => serde_json::to_string_pretty(&report.route.to_feature()),
    }
}

/// Human-readable route summary: one line per segment, then totals.
pub fn route_text(report: &RouteReport, palette: &ColorPalette) -> String {
    let p = palette;
    let route = &report.route;
    let unit = route.units.label();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Route: {}{}{}",
        p.white_bold,
        report.waypoints.join(" → "),
        p.reset
    );

    if let Some(ports) = &route.ports {
        let _ = writeln!(
            out,
            "{}Ports: {} ({}) → {} ({}){}",
            p.gray,
            ports.origin.name,
            ports.origin.code,
            ports.destination.name,
            ports.destination.code,
            p.reset
        );
    }

    for segment in &route.segments {
        let from = label(report, segment.index);
        let to = label(report, segment.index + 1);
        if segment.reachable {
            let _ = writeln!(
                out,
                "  {}. {from} → {to}: {}{} {unit}{}, {}{:.2} days{}",
                segment.index + 1,
                p.cyan,
                format_distance(segment.length),
                p.reset,
                p.green,
                segment.duration_hours / 24.0,
                p.reset
            );
        } else {
            let _ = writeln!(
                out,
                "  {}. {from} → {to}: {}unreachable (no sea route, counted as zero){}",
                segment.index + 1,
                p.red,
                p.reset
            );
        }
    }

    let _ = writeln!(
        out,
        "Total: {}{} {unit}{} at {} {}, {}{:.2} days{}",
        p.cyan,
        format_distance(route.length),
        p.reset,
        route.speed,
        route.units.speed_label(),
        p.green,
        route.duration_days(),
        p.reset
    );

    if let Some(passages) = &route.passages {
        let names = if passages.is_empty() {
            "none".to_string()
        } else {
            passage_names(passages.iter().copied())
        };
        let _ = writeln!(out, "Passages: {}{names}{}", p.orange, p.reset);
    }

    out
}

fn label(report: &RouteReport, index: usize) -> String {
    match &report.route.ports {
        Some(ports) if index == 0 => ports.origin.name.clone(),
        Some(ports) if index + 1 == report.waypoints.len() => ports.destination.name.clone(),
        _ => report
            .waypoints
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}")),
    }
}

fn passage_names(passages: impl Iterator<Item = Passage>) -> String {
    passages
        .map(Passage::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per port: code, name, country and position.
pub fn ports_text(ports: &[&Port]) -> String {
    let mut out = String::new();
    for port in ports {
        let _ = writeln!(
            out,
            "{:<6} {} ({}) {}",
            port.code,
            port.name,
            port.country.as_deref().unwrap_or("--"),
            port.coordinate
        );
    }
    let _ = writeln!(out, "{} port(s)", ports.len());
    out
}

/// Summary of a loaded network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    pub kind: String,
    pub nodes: usize,
    pub connected_nodes: usize,
    pub edges: usize,
    pub passages: BTreeSet<Passage>,
}

impl NetworkSummary {
    pub fn from_network(network: &Network) -> Self {
        Self {
            kind: network.kind().to_string(),
            nodes: network.node_count(),
            connected_nodes: network.connected_node_count(),
            edges: network.edge_count(),
            passages: network.passages(),
        }
    }

    pub fn to_text(&self) -> String {
        let passages = if self.passages.is_empty() {
            "none".to_string()
        } else {
            passage_names(self.passages.iter().copied())
        };
        format!(
            "{}: {} nodes ({} connected), {} edges\n  passages: {}\n",
            self.kind, self.nodes, self.connected_nodes, self.edges, passages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searoute_lib::{compute_route, Coordinate, NetworkStore, RouteOptions};

    fn report(options: &RouteOptions) -> RouteReport {
        let store = NetworkStore::bundled();
        let waypoints = [
            Coordinate::new(4.47917, 51.9225),
            Coordinate::new(121.473701, 31.230416),
        ];
        let route = compute_route(&store, &waypoints, options).unwrap();
        RouteReport {
            waypoints: vec!["Rotterdam".to_string(), "Shanghai".to_string()],
            route,
        }
    }

    #[test]
    fn text_lists_segments_and_totals() {
        let text = route_text(
            &report(&RouteOptions::default().with_passages(true)),
            &ColorPalette::plain(),
        );
        assert!(text.contains("Route: Rotterdam → Shanghai"));
        assert!(text.contains("1. Rotterdam → Shanghai: "));
        assert!(text.contains("n.miles"));
        assert!(text.contains("at 24 knots"));
        assert!(text.contains("Passages: Strait of Gibraltar, Suez Canal"));
    }

    #[test]
    fn json_flattens_route_fields() {
        let json = render_route(
            OutputFormat::Json,
            &report(&RouteOptions::default()),
            &ColorPalette::plain(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["waypoints"][1], "Shanghai");
        assert_eq!(value["units"], "naut");
        assert!(value["length"].as_f64().unwrap() > 0.0);
        assert!(value.get("passages").is_none());
    }

    #[test]
    fn geojson_is_a_line_feature() {
        let json = render_route(
            OutputFormat::Geojson,
            &report(&RouteOptions::default()),
            &ColorPalette::plain(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["properties"]["units"], "naut");
    }
}
