//! Seam between the controllers and the remote client service.

use async_trait::async_trait;

use crate::domain::client::{Client, NewClient};
use crate::domain::page::Page;
use crate::dto::export::CsvExport;

pub mod errors;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod query;

pub use errors::{ApiError, ApiResult};
pub use query::{ClientQuery, Endpoint, QueryDescriptor, SortDir};

/// Operations implemented by the remote record service.
///
/// Every call is asynchronous; implementations own transport concerns such as
/// timeouts and retries.
#[async_trait]
pub trait ClientApi: Send + Sync {
    /// `POST /clients`
    async fn create_client(&self, new_client: &NewClient) -> ApiResult<Client>;
    /// `GET /clients`
    async fn list_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>>;
    /// `POST /clients/search`
    async fn search_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>>;
    /// `GET /clients/search/shared-key/{key}`
    async fn get_by_shared_key(&self, shared_key: &str) -> ApiResult<Client>;
    /// `GET /clients/export/csv`
    async fn export_csv(&self) -> ApiResult<CsvExport>;
}
