//! Ports command: list or search the port network.

use anyhow::{Context, Result};

use searoute_lib::{port_features, NetworkStore, Port};

use crate::output::{ports_text, OutputFormat};

/// Handle the ports subcommand.
pub fn handle_ports_command(
    store: &NetworkStore,
    format: OutputFormat,
    search: Option<&str>,
) -> Result<()> {
    let resolver = store
        .port_resolver()
        .with_context(|| format!("failed to load ports from {}", store.source()))?;

    let ports: Vec<&Port> = match search {
        Some(query) => resolver.search(query),
        None => {
            let mut all: Vec<&Port> = resolver.ports().iter().collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            all
        }
    };
    tracing::debug!(count = ports.len(), query = ?search, "listing ports");

    let rendered = match format {
        OutputFormat::Text => ports_text(&ports),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&ports).context("failed to serialize ports")?
        }
        OutputFormat::Geojson => {
            serde_json::to_string_pretty(&port_features(ports.iter().copied()))
                .context("failed to serialize ports")?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
