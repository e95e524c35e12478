//! Domain records and value objects exchanged with the client service.

pub mod client;
pub mod page;
pub mod types;
