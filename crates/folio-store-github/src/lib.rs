//! GitHub-backed implementation of the folio content store's file backend.
//!
//! Talks to the repository contents endpoint: `GET` to observe the current
//! revision token of a path, `PUT` to commit new base64-encoded content
//! under that token (or without one, when creating the path).

mod client;
mod config;

pub use client::GitHubBackend;
pub use config::{GitHubConfig, DEFAULT_API_BASE};
