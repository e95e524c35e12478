//! Async operations against the client service used by the controllers.

pub mod clients;
