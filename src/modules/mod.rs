//! UI Modules
//!
//! Each module implements the Module trait and handles its own key input.
//!
//! Modules:
//! - input: chain selector, address field, submit button
//! - results: collapsible per-transaction sections
//! - export: writes the last result to CSV/JSON

pub mod export;
pub mod input;
pub mod results;

pub use input::{Field, InputController, Submission};
pub use results::{ResultState, ResultsPanel, SectionState};
