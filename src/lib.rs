//! Taskboard Frontend
//!
//! Leptos CSR client for the taskboard backend. `main.rs` mounts [`app::App`]
//! in the browser; everything else builds natively for the test suite.

pub mod api;
pub mod app;
pub mod auth;
pub mod board;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod invites;
pub mod models;
pub mod moves;
pub mod mutations;
pub mod queries;
pub mod query;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod storage;
#[cfg(test)]
mod testing;
pub mod toast;
