//! IPFS HTTP API client for blob operations

use crate::{BlobStore, BlockStoreError, ContentAddress, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Configuration for IPFS connection
#[derive(Clone, Debug)]
pub struct IpfsConfig {
    /// IPFS API URL (e.g., "http://localhost:5001")
    pub api_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional HTTP gateway used for reads instead of `/api/v0/cat`
    pub gateway_url: Option<String>,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5001".to_string(),
            timeout: Duration::from_secs(30),
            gateway_url: None,
        }
    }
}

impl IpfsConfig {
    /// Create with a custom API URL
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read through an HTTP gateway
    pub fn with_gateway(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = Some(gateway_url.into());
        self
    }
}

/// Response from `/api/v0/add`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddResponse {
    pub name: String,
    pub hash: String,
    pub size: String,
}

/// IPFS blob store client
#[derive(Clone)]
pub struct IpfsBlockStore {
    client: Client,
    config: IpfsConfig,
}

impl IpfsBlockStore {
    /// Create a new IPFS blob store
    ///
    /// No request is made here; an unreachable node surfaces on first use as
    /// a transient error.
    pub fn new(config: IpfsConfig) -> Result<Self> {
        if config.api_url.trim().is_empty() {
            return Err(BlockStoreError::Configuration(
                "IPFS API URL must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BlockStoreError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from URL string
    pub fn from_url(url: &str) -> Result<Self> {
        Self::new(IpfsConfig::with_url(url))
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v0/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn map_send_error(&self, err: reqwest::Error) -> BlockStoreError {
        if err.is_timeout() {
            BlockStoreError::Timeout {
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            err.into()
        }
    }

    /// Add raw data to IPFS
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn add_raw(&self, data: &[u8]) -> Result<AddResponse> {
        let url = self.api("add?cid-version=1&raw-leaves=true&pin=true");

        let part = multipart::Part::bytes(data.to_vec())
            .file_name("data")
            .mime_str("application/octet-stream")
            .map_err(|e| BlockStoreError::IpfsApi(e.to_string()))?;

        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(BlockStoreError::IpfsApi(format!(
                "Failed to add data ({}): {}",
                status, error
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BlockStoreError::IpfsApi(e.to_string()))
    }

    /// Read a blob through the API or the configured gateway
    #[instrument(skip(self), fields(address = %address))]
    pub async fn cat(&self, address: &ContentAddress) -> Result<Bytes> {
        let request = match &self.config.gateway_url {
            Some(gateway) => self
                .client
                .get(format!("{}/ipfs/{}", gateway.trim_end_matches('/'), address)),
            None => self.client.post(self.api(&format!("cat?arg={}", address))),
        };

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            debug!(%status, error = %error, "cat failed");
            return Err(BlockStoreError::NotFound(*address));
        }

        let data = response.bytes().await.map_err(|e| self.map_send_error(e))?;

        if !address.verify(&data) {
            warn!(%address, "fetched bytes do not match address");
            return Err(BlockStoreError::HashMismatch {
                expected: address.to_string(),
                actual: ContentAddress::for_bytes(&data).to_string(),
            });
        }

        Ok(data)
    }

    /// Check whether the node can resolve a block
    pub async fn block_stat(&self, address: &ContentAddress) -> Result<bool> {
        let url = self.api(&format!("block/stat?arg={}", address));

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR => Ok(false),
            status => Err(BlockStoreError::IpfsApi(format!(
                "Failed to stat block: {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for IpfsBlockStore {
    async fn publish(&self, data: &[u8]) -> Result<ContentAddress> {
        let added = self.add_raw(data).await?;
        let address = ContentAddress::parse(&added.hash)?;
        debug!(%address, size = data.len(), "published blob to IPFS");
        Ok(address)
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes> {
        self.cat(address).await
    }

    async fn has(&self, address: &ContentAddress) -> Result<bool> {
        self.block_stat(address).await
    }
}
