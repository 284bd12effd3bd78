//! Shared wire types for the `TaskFlow` HTTP API.

pub mod api;
pub mod task;
