pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod format;
pub mod git;
pub mod logging;
pub mod ui;

pub use analyzer::{Outcome, ResolvedVersion, VersionResolver};
pub use error::{Result, VersionError};
