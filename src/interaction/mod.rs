//! Slash command handling.
//!
//! This module provides:
//! - The fixed command descriptors registered with the platform
//! - The router that turns an invocation into exactly one reply

pub mod commands;
pub mod router;
