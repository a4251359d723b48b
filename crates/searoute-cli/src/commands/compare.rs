//! Compare command: several independent routes computed in parallel.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use searoute_lib::{
    compute_routes, feature_collection, AggregatedRoute, DistanceUnit, Error as RouteError,
    NetworkStore, Passage, Restrictions, RouteOptions, RouteRequest,
};

use crate::commands::route::handle_route_failure;
use crate::location::{resolve_locations, Location};
use crate::output::{OutputFormat, RouteReport};
use crate::terminal::{format_distance, ColorPalette};

/// Arguments for the compare command.
#[derive(Debug, Clone)]
pub struct CompareCommandArgs {
    /// `(from, to)` pairs as given on the command line.
    pub pairs: Vec<(String, String)>,
    pub speed: f64,
    pub units: DistanceUnit,
    pub passages: bool,
    pub restrict: Vec<Passage>,
}

impl CompareCommandArgs {
    fn to_options(&self) -> RouteOptions {
        let restrictions = self
            .restrict
            .iter()
            .fold(Restrictions::default(), |set, passage| set.with(*passage));
        RouteOptions::default()
            .with_units(self.units)
            .with_speed(self.speed)
            .with_restrictions(restrictions)
            .with_passages(self.passages)
    }
}

/// Parse `FROM:TO` into its two halves.
pub fn parse_pair(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once(':') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("invalid pair '{input}': expected FROM:TO")),
    }
}

/// Outcome of one compared pair.
#[derive(Debug, Serialize)]
struct PairResult {
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<RouteReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<PairError>,
}

#[derive(Debug, Serialize)]
struct PairError {
    kind: &'static str,
    message: String,
}

/// Handle the compare subcommand.
pub fn handle_compare_command(
    store: &NetworkStore,
    format: OutputFormat,
    args: &CompareCommandArgs,
) -> Result<()> {
    let options = args.to_options();

    // Pairs whose names fail to resolve are reported without being routed.
    let mut results: Vec<PairResult> = Vec::with_capacity(args.pairs.len());
    let mut pending: Vec<(usize, Vec<Location>)> = Vec::new();
    for (from, to) in &args.pairs {
        let inputs = [from.clone(), to.clone()];
        let index = results.len();
        match resolve_locations(store, &inputs) {
            Ok(locations) => pending.push((index, locations)),
            Err(err) => {
                results.push(failed_pair(from, to, err, store, &options));
                continue;
            }
        }
        results.push(PairResult {
            from: from.clone(),
            to: to.clone(),
            route: None,
            error: None,
        });
    }

    let requests: Vec<RouteRequest> = pending
        .iter()
        .map(|(_, locations)| {
            RouteRequest::new(
                locations.iter().map(|l| l.coordinate).collect(),
                options.clone(),
            )
        })
        .collect();
    let outcomes = compute_routes(store, &requests);

    for ((index, locations), outcome) in pending.into_iter().zip(outcomes) {
        let Some(slot) = results.get_mut(index) else {
            continue;
        };
        match outcome {
            Ok(route) => slot.route = Some(RouteReport::new(&locations, route)),
            Err(err) => {
                let (from, to) = (slot.from.clone(), slot.to.clone());
                *slot = failed_pair(&from, &to, err, store, &options);
            }
        }
    }

    let succeeded = results.iter().filter(|r| r.route.is_some()).count();
    tracing::debug!(pairs = results.len(), succeeded, "compared routes");

    let rendered = match format {
        OutputFormat::Text => compare_text(&results, &ColorPalette::detect()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&results).context("failed to serialize routes")?
        }
        OutputFormat::Geojson => {
            let routes: Vec<&AggregatedRoute> = results
                .iter()
                .filter_map(|r| r.route.as_ref().map(|report| &report.route))
                .collect();
            serde_json::to_string_pretty(&feature_collection(routes))
                .context("failed to serialize routes")?
        }
    };
    println!("{}", rendered.trim_end());

    if succeeded == 0 && !results.is_empty() {
        bail!("none of the {} pair(s) could be routed", results.len());
    }
    Ok(())
}

fn failed_pair(
    from: &str,
    to: &str,
    err: RouteError,
    store: &NetworkStore,
    options: &RouteOptions,
) -> PairResult {
    let kind = err.kind();
    let message = handle_route_failure(store, &options.restrictions, err).to_string();
    PairResult {
        from: from.to_string(),
        to: to.to_string(),
        route: None,
        error: Some(PairError { kind, message }),
    }
}

fn compare_text(results: &[PairResult], palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    for result in results {
        match (&result.route, &result.error) {
            (Some(report), _) => {
                let route = &report.route;
                let _ = write!(
                    out,
                    "{}{} → {}{}: {}{} {}{}, {}{:.2} days{}",
                    p.white_bold,
                    report.waypoints.first().map_or(&result.from, |w| w),
                    report.waypoints.last().map_or(&result.to, |w| w),
                    p.reset,
                    p.cyan,
                    format_distance(route.length),
                    route.units.label(),
                    p.reset,
                    p.green,
                    route.duration_days(),
                    p.reset
                );
                if let Some(passages) = &route.passages {
                    let names: Vec<&str> = passages
                        .iter()
                        .map(|passage| passage.display_name())
                        .collect();
                    let names = if names.is_empty() {
                        "none".to_string()
                    } else {
                        names.join(", ")
                    };
                    let _ = write!(out, " [{}{}{}]", p.orange, names, p.reset);
                }
                out.push('\n');
            }
            (None, Some(error)) => {
                let _ = writeln!(
                    out,
                    "{} → {}: {}error:{} {}",
                    result.from, result.to, p.red, p.reset, error.message
                );
            }
            (None, None) => {}
        }
    }
    out
}
