//! # Rasoi Database Crate
//!
//! This crate is the application's only interface to the SQLite database.
//! All SQL lives here, behind one repository per entity.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** encapsulates every query and the schema itself; the
//!   web layer only sees typed methods like `OrderRepository::create`.
//! - **Constructor injection:** each repository owns a clone of the shared
//!   `SqlitePool`. There is no process-wide client handle.
//! - **Asynchronous & pooled:** all operations run through sqlx on a pooled
//!   connection; multi-row writes use explicit transactions.
//!
//! ## Public API
//!
//! - `connect` / `connect_with`: establish the connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - The repository structs under [`repository`].
//! - `DbError`: the error type returned by everything in this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_with, run_migrations};
pub use sqlx::SqlitePool;
pub use error::DbError;
pub use repository::{
    AdminRepository, CustomerRepository, CustomizationRepository, DashboardRepository,
    OrderRepository, ProductRepository,
};
pub use repository::dashboard::{
    CustomerPendingDetail, CustomerPendingSummary, DashboardStats, EntityCounts, FinancialStats,
    PendingMonth, PendingMonthDetail,
};
