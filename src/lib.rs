//! EVM transaction sampler
//!
//! Terminal front end for a sampling backend: pick a chain, enter an
//! address, fetch `GET /sample`, and browse the returned transactions.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod modules;
pub mod ui;

pub use app::App;
pub use error::{ConfigError, TransportError, ValidationError};
