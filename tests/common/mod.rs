//! In-memory stand-in for the remote client service.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use pushkind_clients::api::{ApiError, ApiResult, ClientApi, QueryDescriptor};
use pushkind_clients::domain::client::{Client, ClientFilter, NewClient};
use pushkind_clients::domain::page::Page;
use pushkind_clients::domain::types::{ClientId, SharedKey};
use pushkind_clients::dto::export::CsvExport;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn client(id: i64, shared_key: &str, name: &str) -> Client {
    Client {
        id: ClientId::new(id).unwrap(),
        shared_key: SharedKey::new(shared_key).unwrap(),
        name: name.to_string(),
        email: format!("{}@example.com", shared_key.to_lowercase()),
        phone: "3001234567".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        created_at: Some(date(2023, 12, 1)),
    }
}

/// `count` clients keyed `CLI1..=CLI{count}`.
pub fn numbered(count: i64) -> Vec<Client> {
    (1..=count)
        .map(|id| client(id, &format!("CLI{id}"), &format!("Client {id}")))
        .collect()
}

#[derive(Default)]
pub struct Calls {
    pub create: AtomicUsize,
    pub list: AtomicUsize,
    pub search: AtomicUsize,
    pub lookup: AtomicUsize,
    pub export: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Keeps clients in memory and answers like the real service.
#[derive(Default)]
pub struct FakeClientApi {
    clients: Mutex<Vec<Client>>,
    failure: Mutex<Option<ApiError>>,
    pub calls: Calls,
}

fn matches(client: &Client, filter: &ClientFilter) -> bool {
    fn contains(value: &str, needle: &Option<String>) -> bool {
        needle
            .as_ref()
            .is_none_or(|needle| value.to_lowercase().contains(&needle.to_lowercase()))
    }

    contains(client.shared_key.as_str(), &filter.shared_key)
        && contains(&client.name, &filter.name)
        && contains(&client.email, &filter.email)
        && contains(&client.phone, &filter.phone)
        && filter.start_date.is_none_or(|d| client.start_date >= d)
        && filter.end_date.is_none_or(|d| client.end_date <= d)
}

impl FakeClientApi {
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: Mutex::new(clients),
            ..Self::default()
        }
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn stored(&self) -> Vec<Client> {
        self.clients.lock().unwrap().clone()
    }

    fn take_failure(&self) -> ApiResult<()> {
        match self.failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn paginate(&self, query: &QueryDescriptor, filter: &ClientFilter) -> Page<Client> {
        let matching: Vec<Client> = self
            .clients
            .lock()
            .unwrap()
            .iter()
            .filter(|client| matches(client, filter))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(query.page_number * query.page_size)
            .take(query.page_size)
            .collect();
        Page::from_parts(content, query.page_number, query.page_size, total)
    }
}

#[async_trait]
impl ClientApi for FakeClientApi {
    async fn create_client(&self, new_client: &NewClient) -> ApiResult<Client> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let mut clients = self.clients.lock().unwrap();
        if clients
            .iter()
            .any(|c| c.shared_key == new_client.shared_key)
        {
            return Err(ApiError::DuplicateKey(format!(
                "Client with sharedKey {} already exists",
                new_client.shared_key
            )));
        }
        let client = Client {
            id: ClientId::new(clients.len() as i64 + 1).unwrap(),
            shared_key: new_client.shared_key.clone(),
            name: new_client.name.to_string(),
            email: new_client.email.to_string(),
            phone: new_client.phone.clone(),
            start_date: new_client.start_date,
            end_date: new_client.end_date,
            created_at: Some(date(2025, 1, 15)),
        };
        clients.push(client.clone());
        Ok(client)
    }

    async fn list_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        Ok(self.paginate(query, &ClientFilter::default()))
    }

    async fn search_clients(&self, query: &QueryDescriptor) -> ApiResult<Page<Client>> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let filter = query.filter.clone().unwrap_or_default();
        Ok(self.paginate(query, &filter))
    }

    async fn get_by_shared_key(&self, shared_key: &str) -> ApiResult<Client> {
        self.calls.lookup.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.shared_key.as_str() == shared_key)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn export_csv(&self) -> ApiResult<CsvExport> {
        self.calls.export.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let mut csv = String::from("ID,Shared Key,Nombre,Teléfono,Email,Fecha Inicio,Fecha Fin,Fecha Creación\n");
        for c in self.clients.lock().unwrap().iter() {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                c.id,
                c.shared_key,
                c.name,
                c.phone,
                c.email,
                c.start_date,
                c.end_date,
                c.created_at.map(|d| d.to_string()).unwrap_or_default()
            ));
        }
        Ok(CsvExport::new(Some("clientes.csv".to_string()), csv.into_bytes()))
    }
}
