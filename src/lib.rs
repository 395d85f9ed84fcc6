//! A small blog-article CRUD API over SQLite.
//!
//! - [`storage`]: the SQLite-backed article store
//! - [`articles`]: validation, partial updates, pagination and the CRUD operations
//! - [`api`]: the axum router and response envelope
//! - [`config`]: TOML + environment configuration

pub mod api;
pub mod articles;
pub mod config;
pub mod storage;
