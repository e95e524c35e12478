//! DTO modules that bridge controllers with the view layer.

pub mod export;
pub mod list;
