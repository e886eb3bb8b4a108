//! CLI, UDP invocation channel, and monitor session
//!
//! This crate provides the `slotbook` command-line interface for the
//! facility booking service.

pub mod channel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod monitor;
pub mod request_id;

pub use channel::{InvocationChannel, RetryPolicy, Semantics};
pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use monitor::{MonitorSession, MonitorStats};
