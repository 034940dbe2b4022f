//! Sample backend client

mod client;

pub use client::{HttpSampleClient, SampleClient};
