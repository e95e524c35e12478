use crate::api::{ApiError, ApiResult, ClientApi, Endpoint, QueryDescriptor};
use crate::domain::client::{Client, NewClient};
use crate::domain::page::Page;
use crate::dto::export::CsvExport;

/// Loads a page from the list or search endpoint, depending on the filter.
pub async fn fetch_page<A>(api: &A, query: &QueryDescriptor) -> ApiResult<Page<Client>>
where
    A: ClientApi + ?Sized,
{
    let result = match query.endpoint() {
        Endpoint::List => api.list_clients(query).await,
        Endpoint::Search => api.search_clients(query).await,
    };

    result.map_err(|err| {
        log::error!("Failed to load clients: {err}");
        err
    })
}

/// Fetches the single client holding `shared_key`.
pub async fn find_by_shared_key<A>(api: &A, shared_key: &str) -> ApiResult<Client>
where
    A: ClientApi + ?Sized,
{
    api.get_by_shared_key(shared_key).await.map_err(|err| {
        match &err {
            ApiError::NotFound => log::info!("No client with shared key {shared_key}"),
            _ => log::error!("Failed to look up client {shared_key}: {err}"),
        }
        err
    })
}

/// Submits a new client record.
pub async fn create_client<A>(api: &A, new_client: &NewClient) -> ApiResult<Client>
where
    A: ClientApi + ?Sized,
{
    let client = api.create_client(new_client).await.map_err(|err| {
        log::error!("Failed to create client {}: {err}", new_client.shared_key);
        err
    })?;
    log::info!("Created client {} with id {}", client.shared_key, client.id);
    Ok(client)
}

/// Downloads the unpaginated CSV export.
pub async fn export_clients<A>(api: &A) -> ApiResult<CsvExport>
where
    A: ClientApi + ?Sized,
{
    api.export_csv().await.map_err(|err| {
        log::error!("Failed to export clients: {err}");
        err
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::api::mock::MockClientApi;
    use crate::api::{ClientQuery, SortDir};
    use crate::domain::client::ClientFilter;
    use crate::domain::types::{ClientId, SharedKey};

    fn sample_client() -> Client {
        Client {
            id: ClientId::new(1).unwrap(),
            shared_key: SharedKey::new("jgomez").unwrap(),
            name: "Juan Gomez".to_string(),
            email: "jgomez@example.com".to_string(),
            phone: "3001234567".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn plain_query_hits_list_endpoint() {
        let mut api = MockClientApi::new();
        api.expect_search_clients().times(0);
        api.expect_list_clients()
            .times(1)
            .withf(|query| query.page_number == 3 && query.sort_dir == SortDir::Desc)
            .returning(|query| {
                Ok(Page::from_parts(
                    vec![sample_client()],
                    query.page_number,
                    query.page_size,
                    31,
                ))
            });

        let query = ClientQuery::new().paginate(3, 10).sort("id", SortDir::Desc).build();
        let page = fetch_page(&api, &query).await.expect("page");

        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn filtered_query_hits_search_endpoint() {
        let mut api = MockClientApi::new();
        api.expect_list_clients().times(0);
        api.expect_search_clients()
            .times(1)
            .withf(|query| {
                query.filter.as_ref().and_then(|f| f.email.as_deref()) == Some("a@b.co")
            })
            .returning(|query| Ok(Page::from_parts(Vec::new(), 0, query.page_size, 0)));

        let query = ClientQuery::new()
            .filter(ClientFilter::default().email("a@b.co"))
            .build();
        let page = fetch_page(&api, &query).await.expect("page");

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn errors_are_passed_through() {
        let mut api = MockClientApi::new();
        api.expect_get_by_shared_key()
            .times(1)
            .returning(|_| Err(ApiError::NotFound));
        api.expect_export_csv()
            .times(1)
            .returning(|| Err(ApiError::Network("connection refused".to_string())));

        assert_eq!(
            find_by_shared_key(&api, "missing").await,
            Err(ApiError::NotFound)
        );
        assert!(matches!(
            export_clients(&api).await,
            Err(ApiError::Network(_))
        ));
    }
}
