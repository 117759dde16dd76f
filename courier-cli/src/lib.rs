//! Command-line interface for the Courier routing engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod decode;
mod distance;
mod error;
mod files;
mod route;
mod settings;

pub use error::CliError;

use decode::{DecodeArgs, run_decode};
use distance::{DistanceArgs, run_distance};
use route::{RouteArgs, run_route};

const ARG_POINTS: &str = "points";
const ARG_REQUEST: &str = "request";
const ARG_ENCODED: &str = "encoded";
const ARG_MAPS_API_KEY: &str = "maps-api-key";
const ARG_MAPS_BASE_URL: &str = "maps-base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_SHOW_DIRECTIONS: &str = "show-directions";
const ARG_OUTPUT: &str = "output";
const ENV_DISTANCE_POINTS: &str = "COURIER_CMDS_DISTANCE_POINTS_PATH";
const ENV_DISTANCE_MAPS_API_KEY: &str = "COURIER_CMDS_DISTANCE_MAPS_API_KEY";
const ENV_ROUTE_REQUEST: &str = "COURIER_CMDS_ROUTE_REQUEST_PATH";
const ENV_ROUTE_MAPS_API_KEY: &str = "COURIER_CMDS_ROUTE_MAPS_API_KEY";
const ENV_DECODE_ENCODED: &str = "COURIER_CMDS_DECODE_ENCODED";

/// Run the Courier CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Distance(args) => run_distance(args),
        Command::Route(args) => run_route(args),
        Command::Decode(args) => run_decode(args),
    }
}

/// Send log records to stderr so JSON on stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("courier: logging unavailable: {err}");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Trip distances and multi-stop route ordering for couriers",
    version
)]
struct Cli {
    /// Log provider traffic at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sum distance and duration along an ordered list of points.
    Distance(DistanceArgs),
    /// Order pickup stops for a trip that ends at one destination.
    Route(RouteArgs),
    /// Decode an encoded polyline into coordinates.
    Decode(DecodeArgs),
}

#[cfg(test)]
mod tests;
