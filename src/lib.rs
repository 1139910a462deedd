//! Library root for `mirai-bot`.
//!
//! Mirai is a small Discord bot that:
//! - Registers `/ping`, `/health`, `/status`, and `/hello` slash commands
//! - Rotates its displayed presence every fifteen minutes
//! - Serves a JSON liveness endpoint at `GET /healthz`
//!
//! The gateway sits behind a trait so the router, the presence rotator, and
//! the lifecycle can be driven without a live Discord connection.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Opens the Discord session, registers commands, starts the background
/// tasks, and runs until SIGINT or SIGTERM.
pub async fn start(config: Config) -> Void {
    info!("Starting mirai-bot v{} ...", base::types::VERSION);

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config);

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
