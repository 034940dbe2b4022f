//! Domain layer - sampler data model and rendering
//!
//! Pure logic with no terminal or network dependencies.

pub mod address;
pub mod chain;
pub mod query;
pub mod record;
pub mod render;

pub use address::{is_valid_address, validate_address};
pub use chain::Chain;
pub use query::{QueryParams, SampleRequest};
pub use record::{FetchOutcome, SampleResponse, TransactionRecord};
pub use render::{render_records, title_case, Document, ResultView, Section};
