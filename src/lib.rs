pub mod cleanup;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod paginate;
pub mod report;
pub mod snapper;
pub mod snapshot;

pub use error::{Error, Result};
