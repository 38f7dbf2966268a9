//! Client configuration.
//!
//! Read from the environment, with defaults for a simulator running on the
//! local machine. The console binary overlays its flags on top.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::layout::Viewport;

/// Default simulation engine address.
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8080";

/// Default physics frame period.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL of the simulation engine
    pub engine_url: Url,
    /// Render surface size
    pub viewport: Viewport,
    /// Time between physics frames
    pub frame_period: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl ConsoleConfig {
    /// Configuration for an engine address, with every other setting at its
    /// default.
    pub fn new(engine_url: Url) -> Self {
        Self {
            engine_url,
            viewport: Viewport::default(),
            frame_period: DEFAULT_FRAME_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load configuration from `MESHSIM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let url = env::var("MESHSIM_ENGINE_URL").unwrap_or_else(|_| DEFAULT_ENGINE_URL.to_string());
        let mut config = Self::new(Url::parse(&url)?);

        if let Ok(size) = env::var("MESHSIM_VIEWPORT") {
            config.viewport = parse_viewport(&size)?;
        }
        if let Ok(ms) = env::var("MESHSIM_TICK_MS") {
            config.frame_period = Duration::from_millis(parse_positive("MESHSIM_TICK_MS", &ms)?);
        }
        if let Ok(secs) = env::var("MESHSIM_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_positive("MESHSIM_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Address of the engine's event channel.
    ///
    /// `http` becomes `ws` and `https` becomes `wss`; the path is `/ws`.
    pub fn events_url(&self) -> Result<Url> {
        events_url(&self.engine_url)
    }
}

/// Derive the event channel address from an engine base URL.
pub fn events_url(base: &Url) -> Result<Url> {
    let mut url = base.clone();
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(Error::Config(format!("unsupported engine scheme {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|_| Error::Config(format!("cannot use scheme {scheme} for {base}")))?;
    url.set_path("/ws");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Parse a `WIDTHxHEIGHT` viewport size.
pub fn parse_viewport(text: &str) -> Result<Viewport> {
    let invalid = || Error::Config(format!("viewport must be WIDTHxHEIGHT, got {text:?}"));
    let (w, h) = text.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(invalid());
    }
    Ok(Viewport::new(width, height))
}

fn parse_positive(name: &str, text: &str) -> Result<u64> {
    match text.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!("{name} must be a positive integer, got {text:?}"))),
    }
}
