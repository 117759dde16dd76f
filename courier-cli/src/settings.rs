//! Routing provider settings shared by the `distance` and `route` commands.

use std::time::Duration;

use courier_core::{RoutingConfiguration, RoutingProvider};
use courier_data::routing::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpRoutingProvider, HttpRoutingProviderConfig,
};

use crate::{ARG_MAPS_API_KEY, ARG_TIMEOUT_SECS, CliError};

/// Resolved provider settings for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutingSettings {
    /// Key forwarded with every provider request.
    pub(crate) maps_api_key: String,
    /// Base URL of the routing service.
    pub(crate) maps_base_url: String,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
}

impl RoutingSettings {
    /// Apply defaults to the merged options and reject unusable values.
    pub(crate) fn resolve(
        maps_api_key: Option<String>,
        maps_base_url: Option<String>,
        timeout_secs: Option<u64>,
        api_key_env: &'static str,
    ) -> Result<Self, CliError> {
        let maps_api_key = maps_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_MAPS_API_KEY,
                env: api_key_env,
            })?;
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_TIMEOUT_SECS,
                reason: "must be at least one second",
            });
        }
        Ok(Self {
            maps_api_key,
            maps_base_url: maps_base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Credentials for the routing engine.
    pub(crate) fn configuration(&self) -> RoutingConfiguration {
        RoutingConfiguration::with_api_key(self.maps_api_key.clone())
    }
}

/// Builds the routing provider for the current invocation.
pub(crate) trait RoutingProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn RoutingProvider>, CliError>;
}

/// Builds an [`HttpRoutingProvider`] against the configured base URL.
pub(crate) struct DefaultRoutingProviderBuilder;

impl RoutingProviderBuilder for DefaultRoutingProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn RoutingProvider>, CliError> {
        let config = HttpRoutingProviderConfig::new(settings.maps_base_url.clone())
            .with_timeout(settings.timeout);
        let provider = HttpRoutingProvider::with_config(config).map_err(|source| {
            CliError::BuildRoutingProvider {
                base_url: settings.maps_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}
