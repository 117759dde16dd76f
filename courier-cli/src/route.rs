//! Route command implementation for the Courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::{CancellationToken, Point, RouteOptimiser, RouteResult, Stop};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::files::{load_json, require_existing, write_json};
use crate::settings::{DefaultRoutingProviderBuilder, RoutingProviderBuilder, RoutingSettings};
use crate::{
    ARG_MAPS_API_KEY, ARG_MAPS_BASE_URL, ARG_OUTPUT, ARG_REQUEST, ARG_TIMEOUT_SECS, CliError,
    ENV_ROUTE_MAPS_API_KEY, ENV_ROUTE_REQUEST,
};

/// A multi-stop trip read from the request file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RouteRequest {
    /// Pickup stops in any order.
    pub(crate) stops: Vec<Stop>,
    /// Where the trip ends.
    pub(crate) destination: Point,
}

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Order the pickup stops of a trip that ends at a single \
                 destination. The stop farthest from the destination is \
                 visited first and the routing service orders the rest. \
                 The request is a JSON object with `stops` and `destination`.",
    about = "Order stops for a multi-pickup trip"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct RouteArgs {
    /// Path to a JSON file containing a route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// API key for the routing service.
    #[arg(long = ARG_MAPS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) maps_api_key: Option<String>,
    /// Base URL of the routing service.
    #[arg(long = ARG_MAPS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) maps_base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Write the result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) routing: RoutingSettings,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_ROUTE_REQUEST,
        })?;
        let routing = RoutingSettings::resolve(
            args.maps_api_key,
            args.maps_base_url,
            args.timeout_secs,
            ENV_ROUTE_MAPS_API_KEY,
        )?;
        Ok(Self {
            request_path,
            routing,
            output: args.output,
        })
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &DefaultRoutingProviderBuilder, &mut stdout)
}

pub(crate) fn run_route_with(
    args: RouteArgs,
    builder: &dyn RoutingProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let route = execute_route(&config, builder)?;
    write_json(writer, config.output.as_deref(), &route)
}

fn execute_route(
    config: &RouteConfig,
    builder: &dyn RoutingProviderBuilder,
) -> Result<RouteResult, CliError> {
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request: RouteRequest = load_json(&config.request_path)?;
    debug!(
        "loaded {} stops from {}",
        request.stops.len(),
        config.request_path
    );

    let provider = builder.build(&config.routing)?;
    let optimiser = RouteOptimiser::new(provider, config.routing.configuration());
    let route =
        optimiser.find_best_route(&request.stops, request.destination, &CancellationToken::new())?;
    Ok(route)
}
