use serde::Serialize;

use crate::domain::client::{Client, ClientFilter};

/// Data required to render the client table and its pagination controls.
#[derive(Debug, Clone, Serialize)]
pub struct ClientListView {
    pub clients: Vec<Client>,
    pub total_elements: u64,
    /// Zero-based index of the displayed page.
    pub page_number: usize,
    pub page_size: usize,
    /// One-based page links, `None` marking a gap.
    pub pages: Vec<Option<usize>>,
    pub filter: Option<ClientFilter>,
    pub loading: bool,
    /// Message shown in place of the table after a failed load.
    pub error: Option<String>,
}
