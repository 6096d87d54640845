#![warn(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use config::{LedgerConfig, ReferencePolicy};
pub use error::{ConfigError, LedgerError, LedgerSourceError};
pub use ledger_service::LedgerService;
pub use model::{GroupId, GroupReport, GroupSnapshot, Residue};
pub use ports::LedgerSource;
