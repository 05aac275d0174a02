//! # Storage Layer
//!
//! Data persistence for the BizPulse workspace. A single [`DbConnection`]
//! wraps the SQLite pool; the per-entity repository modules extend it with
//! typed query methods so domain services never touch SQL directly.

pub mod api_key_repository;
pub mod appointment_repository;
pub mod client_repository;
pub mod db;
pub mod invoice_repository;
pub mod profile_repository;

pub use api_key_repository::ApiKeyRecord;
pub use db::DbConnection;
