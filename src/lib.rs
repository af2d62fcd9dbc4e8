#![allow(clippy::module_inception)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod protocol;

pub use crate::error::DumperError;
pub type Result<T, E = crate::error::DumperError> = std::result::Result<T, E>;

pub use config::Config;
pub use export::{export, ExportSummary, Exporter, Outcome, RestoreRecord};
pub use protocol::{Cursor, Dump, Key};

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::internal::Error;
    pub(crate) type ErrorKind = crate::error::internal::ErrorKind;

    pub use crate::error::DumperError;

    pub use tracing::{debug, error, info, trace, warn};
}
