//! Source of credentials for the routing provider.

use thiserror::Error;

use crate::RoutingError;

/// Settings the engine reads before talking to the provider.
///
/// A `RoutingConfiguration` is itself a [`ConfigurationProvider`] serving
/// fixed values, which covers most embedders.
///
/// # Examples
/// ```
/// use courier_core::{ConfigurationProvider, RoutingConfiguration};
///
/// let config = RoutingConfiguration::with_api_key("secret");
/// assert_eq!(config.configuration()?.maps_api_key.as_deref(), Some("secret"));
/// # Ok::<(), courier_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingConfiguration {
    /// API key forwarded with every provider request.
    pub maps_api_key: Option<String>,
}

impl RoutingConfiguration {
    /// Configuration carrying `key`.
    #[must_use]
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            maps_api_key: Some(key.into()),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The configuration source could not be read.
    #[error("routing configuration is unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Supply [`RoutingConfiguration`] on demand.
///
/// The engine asks once per operation, so implementations may rotate keys
/// between calls.
pub trait ConfigurationProvider {
    /// Return the current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the source cannot be read.
    fn configuration(&self) -> Result<RoutingConfiguration, ConfigurationError>;
}

impl ConfigurationProvider for RoutingConfiguration {
    fn configuration(&self) -> Result<RoutingConfiguration, ConfigurationError> {
        Ok(self.clone())
    }
}

impl<T: ConfigurationProvider + ?Sized> ConfigurationProvider for &T {
    fn configuration(&self) -> Result<RoutingConfiguration, ConfigurationError> {
        (**self).configuration()
    }
}

/// Read the API key, rejecting absent or blank values.
pub(crate) fn resolve_api_key<C>(config: &C) -> Result<String, RoutingError>
where
    C: ConfigurationProvider + ?Sized,
{
    config
        .configuration()?
        .maps_api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(RoutingError::MissingApiKey)
}
