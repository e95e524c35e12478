//! Request descriptors for the list and search endpoints.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::client::ClientFilter;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SORT_BY: &str = "id";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl Display for SortDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Remote endpoint a descriptor is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /clients`
    List,
    /// `POST /clients/search`
    Search,
}

/// Page, sort and optional filter of a single list/search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub page_number: usize,
    pub page_size: usize,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub filter: Option<ClientFilter>,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::build(0, DEFAULT_PAGE_SIZE, DEFAULT_SORT_BY, SortDir::Asc, None)
    }
}

impl QueryDescriptor {
    /// Composes a descriptor. A zero page size falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn build(
        page_number: usize,
        page_size: usize,
        sort_by: impl Into<String>,
        sort_dir: SortDir,
        filter: Option<ClientFilter>,
    ) -> Self {
        Self {
            page_number,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            sort_by: sort_by.into(),
            sort_dir,
            filter,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        if self.filter.is_some() {
            Endpoint::Search
        } else {
            Endpoint::List
        }
    }

    /// URL query parameters shared by both endpoints.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page_number.to_string()),
            ("size", self.page_size.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortDir", self.sort_dir.to_string()),
        ]
    }
}

/// Builder producing [`QueryDescriptor`] values with the service defaults.
#[derive(Clone, Debug, Default)]
pub struct ClientQuery {
    descriptor: QueryDescriptor,
}

impl ClientQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page_number: usize, page_size: usize) -> Self {
        self.descriptor.page_number = page_number;
        if page_size > 0 {
            self.descriptor.page_size = page_size;
        }
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, sort_dir: SortDir) -> Self {
        self.descriptor.sort_by = sort_by.into();
        self.descriptor.sort_dir = sort_dir;
        self
    }

    pub fn filter(mut self, filter: ClientFilter) -> Self {
        self.descriptor.filter = Some(filter);
        self
    }

    pub fn build(self) -> QueryDescriptor {
        self.descriptor
    }
}
