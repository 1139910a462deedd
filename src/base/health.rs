//! Health snapshot model, shared by `/health` and `GET /healthz`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{
    context::BotContext,
    quips::QUIPS,
    types::{BOT_NAME, VERSION},
};

/// A point-in-time view of the process.
///
/// Built fresh for every request; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Display name of the bot.
    pub name: String,
    /// Always `true`: this is a liveness signal only.
    pub ready: bool,
    /// Whole seconds since process start.
    pub uptime_secs: i64,
    /// Wall clock at capture time, in Unix milliseconds.
    pub last_http_ok_unix_ms: i64,
    /// Crate version.
    pub version: String,
    /// Size of the quip table.
    pub quips_available: usize,
}

impl HealthSnapshot {
    /// Capture the current state. Reads the clock and nothing else.
    pub fn capture(context: &BotContext) -> Self {
        Self {
            name: BOT_NAME.to_string(),
            ready: true,
            uptime_secs: i64::try_from(context.uptime().as_secs()).unwrap_or(i64::MAX),
            last_http_ok_unix_ms: Utc::now().timestamp_millis(),
            version: VERSION.to_string(),
            quips_available: QUIPS.len(),
        }
    }
}
