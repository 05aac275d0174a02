//! # IO Layer
//!
//! Interface layer exposing the domain services over HTTP: the REST
//! endpoints under `/api` and the server-sent change-notification feed.

pub mod events;
pub mod rest;
