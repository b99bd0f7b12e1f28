//! Stream definitions, CSV loading and input validation

mod data;
pub mod loader;
pub mod validation;

pub use data::{StreamDefinition, StreamKind, resolve_labels};
pub use loader::{load_streams, load_streams_from_reader};
pub use validation::{validate_request, validate_stream, MAX_LABEL_LEN};
