//! `TaskFlow` server library.
//!
//! Exposes the task store and HTTP API for use in tests and embedding.
//! The server keeps tasks in process memory; a restart starts empty.

pub mod api;
pub mod config;
pub mod store;
