//! Blocking HTTP plumbing shared by the service adapters.
//!
//! The collaborator traits in `hop_core` are synchronous so the scheduler can
//! be driven from plain threads. Each adapter owns an [`HttpRuntime`] that
//! blocks on `reqwest` futures, reusing the caller's multi-threaded Tokio
//! runtime when there is one.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use hop_core::TransportError;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "hop-scheduler/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for adapter construction failures.
#[derive(Debug)]
pub enum ClientBuildError {
    /// The configured base URL does not form a valid endpoint.
    InvalidUrl {
        /// Endpoint text that failed to parse.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl fmt::Display for ClientBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, source } => write!(f, "invalid endpoint {url:?}: {source}"),
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ClientBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl { source, .. } => Some(source),
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Connection settings common to every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create a configuration for `base_url` with default timeout and agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
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

    /// Join `path` onto the base URL.
    ///
    /// An empty `path` addresses the base URL itself.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientBuildError> {
        let base = self.base_url.trim().trim_end_matches('/');
        let relative = path.trim_start_matches('/');
        let joined = if relative.is_empty() {
            base.to_owned()
        } else {
            format!("{base}/{relative}")
        };
        Url::parse(&joined).map_err(|source| ClientBuildError::InvalidUrl {
            url: joined,
            source,
        })
    }
}

/// An HTTP client paired with the runtime used to drive it synchronously.
///
/// Outside any Tokio runtime, and inside a `current_thread` one, requests run
/// on the stored runtime. Inside a multi-threaded runtime the caller's handle
/// is used with [`tokio::task::block_in_place`] to avoid nested runtime
/// panics.
pub(crate) struct HttpRuntime {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl fmt::Debug for HttpRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRuntime")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpRuntime {
    pub(crate) fn new(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout: config.timeout,
        })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Drive `future` to completion from synchronous code.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    /// Map a `reqwest` failure onto a [`TransportError`].
    ///
    /// The error's own URL is stripped because it carries query parameters,
    /// API keys included; `url` is the key-free endpoint.
    pub(crate) fn transport_error(&self, error: reqwest::Error, url: &Url) -> TransportError {
        let stripped = error.without_url();
        if stripped.is_timeout() {
            return TransportError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }
        if let Some(status) = stripped.status() {
            return TransportError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: stripped.to_string(),
            };
        }
        TransportError::Network {
            url: url.to_string(),
            message: stripped.to_string(),
        }
    }
}

/// Build the error reported when a response body cannot be decoded.
pub(crate) fn decode_error(url: &Url, error: &serde_json::Error) -> TransportError {
    TransportError::Decode {
        url: url.to_string(),
        message: error.to_string(),
    }
}
