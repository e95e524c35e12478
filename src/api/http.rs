//! `reqwest` implementation of [`ClientApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::api::{ApiError, ApiResult, ClientApi, QueryDescriptor};
use crate::domain::client::{Client, ClientFilter, NewClient};
use crate::domain::page::Page;
use crate::dto::export::{CsvExport, file_name_from_disposition};
use crate::models::config::ClientConfig;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// HTTP client for the remote client service.
#[derive(Clone, Debug)]
pub struct HttpClientApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClientApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), &body));
    }
    serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}

#[async_trait]
impl ClientApi for HttpClientApi {
    async fn create_client(&self, new_client: &NewClient) -> ApiResult<Client> {
        let url = self.url(&["clients"])?;
        log::debug!("POST {url}");
        let response = self.client.post(url).json(new_client).send().await?;
        decode(response).await
    }

    async fn list_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>> {
        let url = self.url(&["clients"])?;
        log::debug!("GET {url} {:?}", query.query_pairs());
        let response = self
            .client
            .get(url)
            .query(&query.query_pairs())
            .send()
            .await?;
        decode(response).await
    }

    async fn search_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>> {
        let url = self.url(&["clients", "search"])?;
        log::debug!("POST {url} {:?}", query.query_pairs());
        let empty = ClientFilter::default();
        let filter = query.filter.as_ref().unwrap_or(&empty);
        let response = self
            .client
            .post(url)
            .query(&query.query_pairs())
            .json(filter)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_by_shared_key(&self, shared_key: &str) -> ApiResult<Client> {
        let url = self.url(&["clients", "search", "shared-key", shared_key])?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn export_csv(&self) -> ApiResult<CsvExport> {
        let url = self.url(&["clients", "export", "csv"])?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(file_name_from_disposition);
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(CsvExport::new(file_name, body.to_vec()))
    }
}
