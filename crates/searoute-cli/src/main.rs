use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use searoute_cli::commands::compare::{handle_compare_command, parse_pair, CompareCommandArgs};
use searoute_cli::commands::network::handle_network_command;
use searoute_cli::commands::ports::handle_ports_command;
use searoute_cli::commands::route::{handle_route_command, RouteCommandArgs};
use searoute_cli::output::OutputFormat;
use searoute_lib::{DistanceUnit, NetworkKind, NetworkStore, Passage, DEFAULT_SPEED_KNOTS};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Shortest sea routes over the maritime network"
)]
struct Cli {
    /// Directory holding the network CSV files (defaults to the bundled data).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a sea route through two or more waypoints.
    Route {
        /// Origin: a port name, port code, or `lon,lat`.
        #[arg(long = "from", allow_hyphen_values = true)]
        from: String,
        /// Destination: a port name, port code, or `lon,lat`.
        #[arg(long = "to", allow_hyphen_values = true)]
        to: String,
        /// Intermediate waypoint (repeatable, visited in order).
        #[arg(long = "via", allow_hyphen_values = true)]
        via: Vec<String>,
        /// Vessel speed in `units` per hour (knots for nautical miles).
        #[arg(long, default_value_t = DEFAULT_SPEED_KNOTS)]
        speed: f64,
        /// Distance unit: naut, km or mi.
        #[arg(long, default_value = "naut")]
        units: DistanceUnit,
        /// Report the passages the route traverses.
        #[arg(long)]
        passages: bool,
        /// Open a passage that is restricted by default (repeatable).
        #[arg(long = "allow")]
        allow: Vec<Passage>,
        /// Avoid a passage (repeatable).
        #[arg(long = "restrict")]
        restrict: Vec<Passage>,
        /// Snap the first and last waypoint to the nearest ports.
        #[arg(long)]
        include_ports: bool,
        /// Add the original endpoints to the route geometry.
        #[arg(long)]
        append_endpoints: bool,
        /// Fail instead of counting unreachable segments as zero.
        #[arg(long)]
        strict: bool,
        /// Give up on a segment search after this many milliseconds.
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
    },
    /// Compute several independent routes in parallel.
    Compare {
        /// A `FROM:TO` pair (repeatable).
        #[arg(
            long = "pair",
            required = true,
            value_parser = parse_pair,
            allow_hyphen_values = true
        )]
        pairs: Vec<(String, String)>,
        #[arg(long, default_value_t = DEFAULT_SPEED_KNOTS)]
        speed: f64,
        #[arg(long, default_value = "naut")]
        units: DistanceUnit,
        #[arg(long)]
        passages: bool,
        /// Avoid a passage in every route (repeatable).
        #[arg(long = "restrict")]
        restrict: Vec<Passage>,
    },
    /// List ports, optionally filtered by name.
    Ports {
        /// Case-insensitive substring of the port name.
        #[arg(long)]
        search: Option<String>,
    },
    /// Summarize the loaded networks.
    Network {
        /// Only summarize this network: marnet or ports.
        #[arg(long)]
        kind: Option<NetworkKind>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.format);

    let store = NetworkStore::resolve(cli.data_dir.as_deref());
    tracing::debug!(source = %store.source(), "using sea route data");

    match cli.command {
        Command::Route {
            from,
            to,
            via,
            speed,
            units,
            passages,
            allow,
            restrict,
            include_ports,
            append_endpoints,
            strict,
            timeout_ms,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                via,
                speed,
                units,
                passages,
                allow,
                restrict,
                include_ports,
                append_endpoints,
                strict,
                timeout_ms,
            };
            handle_route_command(&store, cli.format, &args)
        }
        Command::Compare {
            pairs,
            speed,
            units,
            passages,
            restrict,
        } => {
            let args = CompareCommandArgs {
                pairs,
                speed,
                units,
                passages,
                restrict,
            };
            handle_compare_command(&store, cli.format, &args)
        }
        Command::Ports { search } => handle_ports_command(&store, cli.format, search.as_deref()),
        Command::Network { kind } => handle_network_command(&store, cli.format, kind),
    }
}

fn init_tracing(format: OutputFormat) {
    // Machine-readable output goes to stdout; keep the default log level quiet.
    let default_level = if format.is_machine_readable() {
        "warn"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
