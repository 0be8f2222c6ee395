//! Process-wide logger setup.
//!
//! Engine code logs through the `log` macros only; binaries install the
//! `env_logger` backend with [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
