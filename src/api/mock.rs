//! Mock service implementation for isolating controllers in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::{ApiResult, ClientApi, QueryDescriptor};
use crate::domain::client::{Client, NewClient};
use crate::domain::page::Page;
use crate::dto::export::CsvExport;

mock! {
    pub ClientApi {}

    #[async_trait]
    impl ClientApi for ClientApi {
        async fn create_client(&self, new_client: &NewClient) -> ApiResult<Client>;
        async fn list_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>>;
        async fn search_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>>;
        async fn get_by_shared_key(&self, shared_key: &str) -> ApiResult<Client>;
        async fn export_csv(&self) -> ApiResult<CsvExport>;
    }
}
