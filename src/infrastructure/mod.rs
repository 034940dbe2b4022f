//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - reqwest-based client for the sample backend
//! - Tokio runtime bridge for async operations

pub mod backend;
pub mod runtime;

pub use backend::{HttpSampleClient, SampleClient};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
