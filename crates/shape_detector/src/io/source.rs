use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    config::FetchConfig,
    error::{DetectorError, Result},
    traits::ImageSource,
};

/// Fetches snapshots over HTTP(S).
///
/// Certificate validation can be switched off so that cameras with
/// self-signed certificates are reachable. The client is shared by every
/// request; dropping a pending `fetch` aborts the transfer.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::trace!(url, "Getting image from camera URL");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DetectorError::fetch(url, e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| DetectorError::fetch(url, e))?;

        Ok(body.to_vec())
    }
}

/// Reads snapshots from the local filesystem, relative to an optional root
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    root: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = match &self.root {
            Some(root) => root.join(location),
            None => PathBuf::from(location),
        };
        tokio::fs::read(&path)
            .await
            .map_err(|e| DetectorError::fetch(path.display().to_string(), e))
    }
}
