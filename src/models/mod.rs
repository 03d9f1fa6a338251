//! Data layer: row types persisted in the shared registry table.

pub mod server_record;

pub use server_record::{NewServerRecord, ServerRecord};
