//! Logging utilities.
//!
//! One place to set up the `env_logger` backend behind the `log` facade.
//! Library crates (`anchora-xr`) only ever log; binaries call
//! [`init_logging`] once at startup.

mod init;

pub use init::{LoggingConfig, init_logging, resolve_filter};
