//! Core domain + application logic for the file catalog relay.
//!
//! This crate is intentionally framework-agnostic. Telegram / MongoDB / HTTP
//! live behind ports (traits) implemented in adapter crates.

pub mod catalog;
pub mod config;
pub mod deeplink;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod relay;

pub use errors::{Error, Result};
