//! Network command: summary statistics for the loaded networks.

use anyhow::{bail, Context, Result};

use searoute_lib::{NetworkKind, NetworkStore};

use crate::output::{NetworkSummary, OutputFormat};

/// Handle the network subcommand. Without `kind`, both networks are summarized.
pub fn handle_network_command(
    store: &NetworkStore,
    format: OutputFormat,
    kind: Option<NetworkKind>,
) -> Result<()> {
    let kinds: Vec<NetworkKind> = match kind {
        Some(kind) => vec![kind],
        None => NetworkKind::ALL.to_vec(),
    };

    let summaries = kinds
        .into_iter()
        .map(|kind| {
            let network = store.get_network(kind).with_context(|| {
                format!("failed to load sea route data from {}", store.source())
            })?;
            Ok(NetworkSummary::from_network(&network))
        })
        .collect::<Result<Vec<_>>>()?;

    let rendered: String = match format {
        OutputFormat::Text => summaries.iter().map(NetworkSummary::to_text).collect(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&summaries).context("failed to serialize summary")?
        }
        OutputFormat::Geojson => bail!("use --format json for network summaries"),
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
