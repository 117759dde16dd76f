//! Distance command implementation for the Courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use courier_core::{
    AggregateResult, AggregatorConfig, CancellationToken, DistanceAggregator, Point,
};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::files::{load_json, require_existing, write_json};
use crate::settings::{DefaultRoutingProviderBuilder, RoutingProviderBuilder, RoutingSettings};
use crate::{
    ARG_MAPS_API_KEY, ARG_MAPS_BASE_URL, ARG_OUTPUT, ARG_POINTS, ARG_SHOW_DIRECTIONS,
    ARG_TIMEOUT_SECS, CliError, ENV_DISTANCE_MAPS_API_KEY, ENV_DISTANCE_POINTS,
};

/// CLI arguments for the `distance` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Sum the distance and duration of a trip through an ordered \
                 list of points. Each consecutive pair is one leg, measured \
                 by the routing service. Points are read from a JSON array \
                 of {\"latitude\", \"longitude\"} objects.",
    about = "Measure a trip through ordered points"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct DistanceArgs {
    /// Path to a JSON file containing the ordered points.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) points_path: Option<Utf8PathBuf>,
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
    /// Also fetch and decode the route's overview path.
    #[arg(long = ARG_SHOW_DIRECTIONS, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) show_directions: bool,
    /// Write the result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl DistanceArgs {
    pub(crate) fn into_config(self) -> Result<DistanceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DistanceConfig::try_from(merged)
    }
}

/// Resolved `distance` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DistanceConfig {
    /// Path to the JSON points file.
    pub(crate) points_path: Utf8PathBuf,
    /// Provider settings.
    pub(crate) routing: RoutingSettings,
    /// Whether to request the overview path.
    pub(crate) show_directions: bool,
    /// Optional output file.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<DistanceArgs> for DistanceConfig {
    type Error = CliError;

    fn try_from(args: DistanceArgs) -> Result<Self, Self::Error> {
        let points_path = args.points_path.ok_or(CliError::MissingArgument {
            field: ARG_POINTS,
            env: ENV_DISTANCE_POINTS,
        })?;
        let routing = RoutingSettings::resolve(
            args.maps_api_key,
            args.maps_base_url,
            args.timeout_secs,
            ENV_DISTANCE_MAPS_API_KEY,
        )?;
        Ok(Self {
            points_path,
            routing,
            show_directions: args.show_directions,
            output: args.output,
        })
    }
}

pub(crate) fn run_distance(args: DistanceArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_distance_with(args, &DefaultRoutingProviderBuilder, &mut stdout)
}

pub(crate) fn run_distance_with(
    args: DistanceArgs,
    builder: &dyn RoutingProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let totals = execute_distance(&config, builder)?;
    write_json(writer, config.output.as_deref(), &totals)
}

fn execute_distance(
    config: &DistanceConfig,
    builder: &dyn RoutingProviderBuilder,
) -> Result<AggregateResult, CliError> {
    require_existing(&config.points_path, ARG_POINTS)?;
    let points: Vec<Point> = load_json(&config.points_path)?;
    debug!("loaded {} points from {}", points.len(), config.points_path);

    let provider = builder.build(&config.routing)?;
    let aggregator = DistanceAggregator::with_config(
        provider,
        config.routing.configuration(),
        AggregatorConfig {
            preview_path: config.show_directions,
        },
    );
    let totals = aggregator.sum_distance_and_duration(&points, &CancellationToken::new())?;
    Ok(totals)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<DistanceConfig, CliError> {
    let merged = DistanceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    DistanceConfig::try_from(merged)
}
