//! # REST API Interface Layer
//!
//! HTTP endpoints for the BizPulse dashboard. This layer handles:
//! - Request/response serialization
//! - Mapping query-string parameters onto domain queries
//! - Error translation from domain errors to HTTP status codes
//! - Request logging
//!
//! Handlers stay a pure translation layer; every business rule lives in the
//! domain services.

pub mod appointment_apis;
pub mod automation_apis;
pub mod calendar_apis;
pub mod client_apis;
pub mod dashboard_apis;
pub mod invoice_apis;
pub mod settings_apis;
