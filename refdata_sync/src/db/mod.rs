//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_sqlite`] opens a SQLite connection with WAL,
//!   foreign_keys=ON, and a 5000ms busy_timeout.
//! - [`migrate`] bundles the embedded Diesel migrations and runners:
//!   [`migrate::run_sqlite`], [`migrate::run_postgres`], and
//!   [`migrate::run_all`] which dispatches on the URL scheme.
//!
//! Note: building with PostgreSQL support requires the system libpq.

pub mod connection;
pub mod migrate;
