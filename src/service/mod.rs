//! Service integrations and background tasks.
//!
//! This module contains:
//! - The chat platform gateway (e.g., Discord)
//! - The HTTP health endpoint
//! - The presence rotator
//!
//! The gateway defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod gateway;
pub mod health;
pub mod presence;
