//! HTTP-based `RoutingProvider` for Google-Maps-compatible services.
//!
//! The [`RoutingProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally, and
//! races every request against the caller's [`CancellationToken`].
//!
//! # Example
//!
//! ```no_run
//! use courier_core::{CancellationToken, DistanceQuery, Point, RoutingProvider};
//! use courier_data::routing::HttpRoutingProvider;
//!
//! let provider = HttpRoutingProvider::new("https://maps.googleapis.com/maps/api")?;
//! let query = DistanceQuery {
//!     origin: Point::new(51.5, -0.1),
//!     destination: Point::new(51.6, -0.2),
//!     api_key: "secret",
//! };
//! let reply = provider.query_distance(&query, &CancellationToken::new())?;
//! println!("status: {}", reply.status);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::future::Future;
use std::time::Duration;

use courier_core::{
    CancellationToken, DirectionsQuery, DirectionsResponse, DistanceQuery, DistanceResponse,
    ProviderError, RoutingProvider, STATUS_OK,
};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::google::{DirectionsReply, DistanceMatrixReply};

/// Error type for [`HttpRoutingProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL could not be parsed.
    #[error("invalid routing service URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default base URL of the Google Maps web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "courier-routing/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DISTANCE_MATRIX_PATH: &str = "distancematrix/json";
const DIRECTIONS_PATH: &str = "directions/json";

/// Configuration for [`HttpRoutingProvider`].
#[derive(Debug, Clone)]
pub struct HttpRoutingProviderConfig {
    /// Base URL under which `distancematrix/json` and `directions/json` live.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Honour `HTTP_PROXY`-style environment variables.
    pub use_system_proxy: bool,
}

impl Default for HttpRoutingProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            use_system_proxy: true,
        }
    }
}

impl HttpRoutingProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Connect directly, ignoring proxy settings from the environment.
    #[must_use]
    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

/// HTTP routing provider for the Distance Matrix and Directions services.
///
/// Replies are passed through with their service status; deciding what a
/// non-OK status means is left to the caller. Only transport, HTTP and
/// decoding failures become [`ProviderError`]s, and the URLs they carry have
/// their query string removed so API keys never leak into messages.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within a multi-threaded Tokio runtime it
/// uses that runtime's handle with [`tokio::task::block_in_place`]. From a
/// `current_thread` runtime it falls back to its own runtime, which blocks
/// the caller's runtime for the duration of the request.
pub struct HttpRoutingProvider {
    client: Client,
    config: HttpRoutingProviderConfig,
    distance_url: Url,
    directions_url: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpRoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRoutingProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpRoutingProvider {
    /// Create a new provider with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRoutingProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpRoutingProviderConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let endpoint = |path: &str| {
            base.join(path)
                .map_err(|source| ProviderBuildError::InvalidBaseUrl {
                    url: config.base_url.clone(),
                    source,
                })
        };
        let distance_url = endpoint(DISTANCE_MATRIX_PATH)?;
        let directions_url = endpoint(DIRECTIONS_PATH)?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            distance_url,
            directions_url,
            runtime,
        })
    }

    /// Build the Distance Matrix URL for a single origin/destination pair.
    fn build_distance_url(&self, query: &DistanceQuery<'_>) -> Url {
        let mut url = self.distance_url.clone();
        url.query_pairs_mut()
            .append_pair("origins", &query.origin.to_string())
            .append_pair("destinations", &query.destination.to_string())
            .append_pair("key", query.api_key);
        url
    }

    /// Build the Directions URL.
    ///
    /// Waypoints are `|`-separated `lat,lng` pairs, prefixed with
    /// `optimize:true` when the service should reorder them.
    fn build_directions_url(&self, query: &DirectionsQuery<'_>) -> Url {
        let mut url = self.directions_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("origin", &query.origin.to_string())
                .append_pair("destination", &query.destination.to_string());
            if !query.waypoints.is_empty() {
                let optimise = query.optimize_waypoints.then_some("optimize:true".to_owned());
                let waypoints: Vec<String> = optimise
                    .into_iter()
                    .chain(query.waypoints.iter().map(ToString::to_string))
                    .collect();
                pairs.append_pair("waypoints", &waypoints.join("|"));
            }
            pairs.append_pair("key", query.api_key);
        }
        url
    }

    /// Fetch and decode a JSON reply.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let shown = redact(&url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::ParseError {
                message: err.without_url().to_string(),
            })
    }

    /// Convert a reqwest error to a `ProviderError`.
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        ProviderError::NetworkError {
            url: url.to_owned(),
            message: error.without_url().to_string(),
        }
    }

    /// Drive `future` to completion unless `cancel` fires first.
    fn block_on_cancellable<T>(
        &self,
        cancel: &CancellationToken,
        future: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        let guarded = async {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(ProviderError::Cancelled),
                result = future => result,
            }
        };

        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(guarded))
            }
            _ => self.runtime.block_on(guarded),
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ProviderBuildError> {
    let invalid = |source| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    };
    let mut base = Url::parse(base_url).map_err(invalid)?;
    if base.cannot_be_a_base() {
        return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    // `join` replaces the last segment unless the path ends in a slash.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// The URL without its query string, which carries the API key.
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

fn log_status(service: &str, status: &str, detail: Option<&str>) {
    if status != STATUS_OK {
        debug!(
            "{service} replied with status {status}: {}",
            detail.unwrap_or("no detail")
        );
    }
}

impl RoutingProvider for HttpRoutingProvider {
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError> {
        let url = self.build_distance_url(query);
        let reply: DistanceMatrixReply = self.block_on_cancellable(cancel, self.fetch(url))?;
        log_status("distance matrix", &reply.status, reply.error_message.as_deref());
        Ok(reply.into())
    }

    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError> {
        let url = self.build_directions_url(query);
        let reply: DirectionsReply = self.block_on_cancellable(cancel, self.fetch(url))?;
        log_status("directions", &reply.status, reply.error_message.as_deref());
        Ok(reply.into())
    }
}
