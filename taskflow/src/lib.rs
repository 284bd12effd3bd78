//! `TaskFlow` — terminal Kanban board for the `TaskFlow` task API.

pub mod app;
pub mod board;
pub mod cache;
pub mod client;
pub mod config;
pub mod net;
pub mod ui;
