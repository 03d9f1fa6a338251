//! # Database Layer
//!
//! Store connectivity and every SQL statement the registry core issues.
//!
//! - [`connection`] owns pool construction (bounded, idle-timeout) and the
//!   health probe.
//! - [`store`] is the single place query text lives. All values are bound
//!   parameters; the only interpolated fragment is the table name, which is
//!   validated as a bare identifier at configuration load.

pub mod connection;
pub mod store;

pub use connection::DatabaseConnection;
pub use store::RegistryStore;
