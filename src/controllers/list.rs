//! List/search controller: pagination, filtering, exact-key lookup and export.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::api::query::{DEFAULT_PAGE_SIZE, DEFAULT_SORT_BY};
use crate::api::{ApiError, ApiResult, ClientApi, QueryDescriptor, SortDir};
use crate::controllers::{Observers, RequestTicket, SubscriptionId};
use crate::domain::client::{Client, ClientFilter};
use crate::domain::page::Page;
use crate::dto::export::CsvExport;
use crate::dto::list::ClientListView;
use crate::notice::Notice;
use crate::pagination::page_window;
use crate::services::clients as client_service;

/// Failure classes surfaced to the list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ListErrorKind {
    NotFound,
    ServerError,
    NetworkError,
}

impl Display for ListErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListErrorKind::NotFound => write!(f, "No clients found"),
            ListErrorKind::ServerError => write!(f, "Error loading clients"),
            ListErrorKind::NetworkError => write!(f, "Client service is unreachable"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded(Page<Client>),
    Failed(ListErrorKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListRequestKind {
    /// Paginated list or filtered search.
    Query(QueryDescriptor),
    /// Single-record fetch by shared key.
    SharedKey(String),
}

/// A request issued by the controller, to be executed by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct ListRequest {
    pub ticket: RequestTicket,
    pub kind: ListRequestKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListResponse {
    Page(Page<Client>),
    Record(Client),
}

impl ListRequest {
    pub fn descriptor(&self) -> Option<&QueryDescriptor> {
        match &self.kind {
            ListRequestKind::Query(query) => Some(query),
            ListRequestKind::SharedKey(_) => None,
        }
    }

    /// Runs the request against the service. Does not touch controller state.
    pub async fn execute<A>(&self, api: &A) -> ApiResult<ListResponse>
    where
        A: ClientApi + ?Sized,
    {
        match &self.kind {
            ListRequestKind::Query(query) => client_service::fetch_page(api, query)
                .await
                .map(ListResponse::Page),
            ListRequestKind::SharedKey(key) => client_service::find_by_shared_key(api, key)
                .await
                .map(ListResponse::Record),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    ticket: RequestTicket,
    lookup: bool,
}

/// Owns the displayed page, the active filter and the loading state.
#[derive(Debug)]
pub struct ListController {
    state: ListState,
    /// Last loaded page, kept visible while a newer request is in flight.
    retained: Page<Client>,
    page_number: usize,
    page_size: usize,
    sort_by: String,
    sort_dir: SortDir,
    filter: Option<ClientFilter>,
    lookup_key: Option<String>,
    generation: u64,
    pending: Option<Pending>,
    notices: Vec<Notice>,
    observers: Observers<ListState>,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListController {
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            state: ListState::Idle,
            retained: Page::empty(page_size),
            page_number: 0,
            page_size,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_dir: SortDir::Asc,
            filter: None,
            lookup_key: None,
            generation: 0,
            pending: None,
            notices: Vec::new(),
            observers: Observers::default(),
        }
    }

    /// Sort order applied to subsequent list and search requests.
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_dir: SortDir) -> Self {
        self.sort_by = sort_by.into();
        self.sort_dir = sort_dir;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Active search filter, `None` when plain listing is active.
    pub fn filter(&self) -> Option<&ClientFilter> {
        self.filter.as_ref()
    }

    pub fn lookup_key(&self) -> Option<&str> {
        self.lookup_key.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    fn displayed(&self) -> &Page<Client> {
        match &self.state {
            ListState::Loaded(page) => page,
            _ => &self.retained,
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.displayed().content
    }

    /// Total reported by the last applied response.
    ///
    /// After an exact-key lookup this counts the lookup result only.
    pub fn total_elements(&self) -> u64 {
        self.displayed().total_elements
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ListState) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Drains notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn view(&self) -> ClientListView {
        let displayed = self.displayed();
        ClientListView {
            clients: displayed.content.clone(),
            total_elements: displayed.total_elements,
            page_number: self.page_number,
            page_size: self.page_size,
            pages: page_window(displayed.total_pages as usize, self.page_number),
            filter: self.filter.clone(),
            loading: self.is_loading(),
            error: match self.state {
                ListState::Failed(kind) => Some(kind.to_string()),
                _ => None,
            },
        }
    }

    fn transition(&mut self, next: ListState) {
        let previous = std::mem::replace(&mut self.state, next);
        if let ListState::Loaded(page) = previous {
            self.retained = page;
        }
        self.observers.notify(&self.state);
    }

    fn set_pagination(&mut self, page_number: usize, page_size: usize) {
        self.page_number = page_number;
        if page_size > 0 {
            self.page_size = page_size;
        }
    }

    fn current_query(&self) -> QueryDescriptor {
        QueryDescriptor::build(
            self.page_number,
            self.page_size,
            self.sort_by.clone(),
            self.sort_dir,
            self.filter.clone(),
        )
    }

    fn issue(&mut self, kind: ListRequestKind) -> ListRequest {
        self.generation += 1;
        let ticket = RequestTicket(self.generation);
        if let Some(previous) = self.pending {
            log::debug!(
                "Request #{} supersedes pending request #{}",
                ticket.generation(),
                previous.ticket.generation()
            );
        }
        self.pending = Some(Pending {
            ticket,
            lookup: matches!(kind, ListRequestKind::SharedKey(_)),
        });
        self.transition(ListState::Loading);
        ListRequest { ticket, kind }
    }

    fn issue_query(&mut self) -> ListRequest {
        self.lookup_key = None;
        let query = self.current_query();
        log::info!(
            "Loading clients: page {}, size {}, filtered: {}",
            query.page_number,
            query.page_size,
            query.filter.is_some()
        );
        self.issue(ListRequestKind::Query(query))
    }

    /// Plain paginated listing; discards the active filter.
    pub fn request_list(&mut self, page_number: usize, page_size: usize) -> ListRequest {
        self.filter = None;
        self.set_pagination(page_number, page_size);
        self.issue_query()
    }

    /// Filtered search. Blank text fields of `filter` are dropped.
    pub fn request_search(
        &mut self,
        filter: ClientFilter,
        page_number: usize,
        page_size: usize,
    ) -> ListRequest {
        self.filter = Some(filter.normalized());
        self.set_pagination(page_number, page_size);
        self.issue_query()
    }

    /// Starts a new search from the first page.
    pub fn apply_filter(&mut self, filter: ClientFilter) -> ListRequest {
        let page_size = self.page_size;
        self.request_search(filter, 0, page_size)
    }

    /// Drops the filter and lookup key and lists from the first page.
    pub fn clear_filters(&mut self) -> ListRequest {
        let page_size = self.page_size;
        self.request_list(0, page_size)
    }

    /// Re-issues the active list or search with new pagination values.
    pub fn change_page(&mut self, page_number: usize, page_size: usize) -> ListRequest {
        self.set_pagination(page_number, page_size);
        self.issue_query()
    }

    /// Re-issues the active query, including an exact-key lookup.
    pub fn refresh(&mut self) -> ListRequest {
        match self.lookup_key.clone() {
            Some(key) => self.issue(ListRequestKind::SharedKey(key)),
            None => self.issue_query(),
        }
    }

    /// Fetches the single record with `key`, or lists when `key` is blank.
    pub fn exact_key_lookup(&mut self, key: &str) -> ListRequest {
        let key = key.trim();
        if key.is_empty() {
            let (page_number, page_size) = (self.page_number, self.page_size);
            return self.request_list(page_number, page_size);
        }

        log::info!("Looking up client by shared key {key}");
        self.lookup_key = Some(key.to_string());
        self.issue(ListRequestKind::SharedKey(key.to_string()))
    }

    /// Applies the outcome of `ticket`.
    ///
    /// Returns `false` and leaves state untouched when `ticket` was superseded.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: ApiResult<ListResponse>) -> bool {
        let pending = match self.pending {
            Some(pending) if pending.ticket == ticket => pending,
            _ => {
                log::warn!("Discarding stale response for request #{}", ticket.generation());
                return false;
            }
        };
        self.pending = None;

        let next = match outcome {
            Ok(ListResponse::Page(page)) if page.is_consistent() => {
                self.page_number = page.page_number;
                if page.page_size > 0 {
                    self.page_size = page.page_size;
                }
                ListState::Loaded(page)
            }
            Ok(ListResponse::Page(page)) => {
                log::error!(
                    "Malformed page: {} elements, size {}, {} total pages",
                    page.total_elements,
                    page.page_size,
                    page.total_pages
                );
                self.notices.push(Notice::error(ListErrorKind::ServerError.to_string()));
                ListState::Failed(ListErrorKind::ServerError)
            }
            Ok(ListResponse::Record(client)) => {
                self.page_number = 0;
                ListState::Loaded(Page::single(Some(client), self.page_size))
            }
            Err(ApiError::NotFound) if pending.lookup => {
                self.page_number = 0;
                self.notices
                    .push(Notice::info("No client found with that shared key"));
                ListState::Loaded(Page::single(None, self.page_size))
            }
            Err(err) => {
                let kind = ListErrorKind::from(&err);
                self.notices.push(Notice::error(kind.to_string()));
                ListState::Failed(kind)
            }
        };

        self.transition(next);
        true
    }

    /// Executes `request` and applies its outcome.
    pub async fn run<A>(&mut self, api: &A, request: ListRequest) -> bool
    where
        A: ClientApi + ?Sized,
    {
        let outcome = request.execute(api).await;
        self.complete(request.ticket, outcome)
    }

    /// Downloads the full, unpaginated CSV export.
    ///
    /// Only borrows the controller, so the download can run beside a pending
    /// list request. Pass the result to [`Self::record_export`] to notify.
    pub async fn export_current_view<A>(&self, api: &A) -> ApiResult<CsvExport>
    where
        A: ClientApi + ?Sized,
    {
        client_service::export_clients(api).await
    }

    /// Raises the notice for a finished export. List state is not touched.
    pub fn record_export(&mut self, result: &ApiResult<CsvExport>) {
        match result {
            Ok(export) => self.notices.push(Notice::success(format!(
                "Downloaded {}",
                export.file_name
            ))),
            Err(_) => self
                .notices
                .push(Notice::error("Error exporting clients to CSV")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::{ClientId, SharedKey};

    fn client(id: i64) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            shared_key: SharedKey::new(format!("key{id}")).unwrap(),
            name: format!("Client #{id}"),
            email: format!("client{id}@example.com"),
            phone: "3001234567".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            created_at: None,
        }
    }

    fn page_of(ids: &[i64], page_number: usize, page_size: usize, total: u64) -> ListResponse {
        ListResponse::Page(Page::from_parts(
            ids.iter().copied().map(client).collect(),
            page_number,
            page_size,
            total,
        ))
    }

    #[test]
    fn starts_idle() {
        let controller = ListController::default();
        assert_eq!(controller.state(), &ListState::Idle);
        assert_eq!(controller.page_size(), 10);
        assert!(controller.clients().is_empty());
    }

    #[test]
    fn later_request_wins() {
        let mut controller = ListController::default();
        let first = controller.request_list(0, 10);
        let second = controller.apply_filter(ClientFilter::default().name("Ana"));

        assert!(controller.complete(second.ticket, Ok(page_of(&[2], 0, 10, 1))));
        assert!(!controller.complete(first.ticket, Ok(page_of(&[1, 3], 0, 10, 2))));

        assert_eq!(controller.clients()[0].id.get(), 2);
        assert_eq!(controller.total_elements(), 1);
    }

    #[test]
    fn stale_response_does_not_end_loading() {
        let mut controller = ListController::default();
        let first = controller.request_list(0, 10);
        let _second = controller.change_page(1, 10);

        assert!(!controller.complete(first.ticket, Ok(page_of(&[1], 0, 10, 11))));
        assert!(controller.is_loading());
    }

    #[test]
    fn inconsistent_page_is_a_server_error() {
        let mut controller = ListController::default();
        let request = controller.request_list(0, 10);
        let mut page = Page::from_parts(vec![client(1)], 0, 10, 25);
        page.total_pages = 7;

        controller.complete(request.ticket, Ok(ListResponse::Page(page)));

        assert_eq!(
            controller.state(),
            &ListState::Failed(ListErrorKind::ServerError)
        );
    }

    #[test]
    fn loading_keeps_previous_page_visible() {
        let mut controller = ListController::default();
        let request = controller.request_list(0, 2);
        controller.complete(request.ticket, Ok(page_of(&[1, 2], 0, 2, 5)));

        let _next = controller.change_page(1, 2);

        assert!(controller.is_loading());
        assert_eq!(controller.clients().len(), 2);
        assert_eq!(controller.view().pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn lookup_result_is_shown_as_first_page() {
        let mut controller = ListController::default();
        let list = controller.request_list(2, 10);
        controller.complete(list.ticket, Ok(page_of(&[21, 22], 2, 10, 22)));
        assert_eq!(controller.page_number(), 2);

        let hit = controller.exact_key_lookup("key5");
        controller.complete(hit.ticket, Ok(ListResponse::Record(client(5))));
        assert_eq!(controller.view().page_number, 0);
        assert_eq!(controller.view().pages, vec![Some(1)]);

        let _list = controller.change_page(1, 10);
        let miss = controller.exact_key_lookup("nobody");
        controller.complete(miss.ticket, Err(ApiError::NotFound));
        assert_eq!(controller.view().page_number, 0);
        assert!(controller.clients().is_empty());
    }
}
