//! HTTP client for the simulation engine.

use std::time::Duration;

use meshsim_topology::SimulationConfig;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::config::events_url;
use crate::error::{Error, Result};

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
}

/// Typed access to the engine's HTTP interface.
#[derive(Clone, Debug)]
pub struct EngineClient {
    http: Client,
    base: Url,
}

impl EngineClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Address of the event channel.
    pub fn events_url(&self) -> Result<Url> {
        events_url(&self.base)
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /topologies`: file names held by the engine.
    pub async fn topologies(&self) -> Result<Vec<String>> {
        let resp = self.get("/topologies", &["topologies"]).await?;
        let list: Option<Vec<String>> = json(resp, "/topologies").await?;
        Ok(list.unwrap_or_default())
    }

    /// `POST /configure`. A rejection carries the engine's response text.
    pub async fn configure(&self, config: &SimulationConfig) -> Result<()> {
        let path = "/configure";
        let url = self.endpoint(&["configure"])?;
        let resp = self
            .http
            .post(url)
            .json(config)
            .send()
            .await
            .map_err(|source| request_error(path, source))?;
        success(resp, path).await.map(drop)
    }

    /// `GET /nodes`: ids of the configured nodes.
    pub async fn nodes(&self) -> Result<Vec<String>> {
        let resp = self.get("/nodes", &["nodes"]).await?;
        let list: Option<Vec<String>> = json(resp, "/nodes").await?;
        Ok(list.unwrap_or_default())
    }

    /// `GET /topo-files/{name}`: raw descriptor text of an engine-held file.
    pub async fn topology_file(&self, name: &str) -> Result<String> {
        let path = "/topo-files";
        let resp = self.get(path, &["topo-files", name]).await?;
        resp.text().await.map_err(|source| request_error(path, source))
    }

    /// `POST /send`: queue a message from one node to another.
    pub async fn send(&self, from: &str, to: &str) -> Result<()> {
        let path = "/send";
        let url = self.endpoint(&["send"])?;
        let resp = self
            .http
            .post(url)
            .json(&SendRequest { from, to })
            .send()
            .await
            .map_err(|source| request_error(path, source))?;
        success(resp, path).await.map(drop)
    }

    async fn get(&self, path: &str, segments: &[&str]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| request_error(path, source))?;
        success(resp, path).await
    }
}

fn request_error(path: &str, source: reqwest::Error) -> Error {
    tracing::error!(%path, error = %source, "network error");
    Error::Request {
        path: path.to_string(),
        source,
    }
}

/// Pass a success response through; turn anything else into
/// [`Error::Status`] with the response text.
async fn success(resp: Response, path: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        tracing::debug!(%path, %status, "engine response");
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::error!(%path, %status, %body, "engine rejected request");
    Err(Error::Status {
        path: path.to_string(),
        status,
        body,
    })
}

async fn json<T: serde::de::DeserializeOwned>(resp: Response, path: &str) -> Result<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|source| request_error(path, source))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> EngineClient {
        EngineClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(&["nodes"]).unwrap().as_str(),
            "http://localhost:8080/nodes"
        );

        let nested = client("http://localhost:8080/sim/");
        assert_eq!(
            nested.endpoint(&["topo-files", "ring5.yaml"]).unwrap().as_str(),
            "http://localhost:8080/sim/topo-files/ring5.yaml"
        );
    }

    #[test]
    fn file_names_are_one_segment() {
        let c = client("http://localhost:8080");
        let url = c.endpoint(&["topo-files", "my ring/../5.yaml"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/topo-files/my%20ring%2F..%2F5.yaml"
        );
    }

    #[test]
    fn events_url_is_ws() {
        let c = client("http://127.0.0.1:9000");
        assert_eq!(c.events_url().unwrap().as_str(), "ws://127.0.0.1:9000/ws");
    }

    #[tokio::test]
    async fn unreachable_engine_is_a_request_error() {
        // Port 9 (discard) is closed on test hosts
        let c = client("http://127.0.0.1:9");
        let err = c.nodes().await.unwrap_err();
        assert!(err.is_unreachable());
    }
}
