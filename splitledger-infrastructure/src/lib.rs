#![warn(clippy::uninlined_format_args)]

pub mod in_memory;
pub mod text_source;

pub use in_memory::InMemoryLedger;
pub use text_source::{TextLedgerSource, snapshot_from_text};
