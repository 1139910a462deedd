//! Process-wide state shared by the router and the presence rotator.

use std::{
    ops::Deref,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    quips::{ACTIVITIES, QUIPS},
    types::StatusActivity,
};

/// Shared bot context.
///
/// Holds the process start time and the single random generator. It is
/// trivially cloneable, so it can be handed to every task that needs it.
#[derive(Clone)]
pub struct BotContext {
    inner: Arc<BotContextInner>,
}

/// State behind a [`BotContext`].
pub struct BotContextInner {
    started_at: Instant,
    rng: Mutex<StdRng>,
}

impl Deref for BotContext {
    type Target = BotContextInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl BotContext {
    /// Create a context starting now, with an OS-seeded generator.
    pub fn new() -> Self {
        Self::with_parts(Instant::now(), StdRng::from_os_rng())
    }

    /// Create a context with a fixed start time and a deterministic generator.
    pub fn seeded(started_at: Instant, seed: u64) -> Self {
        Self::with_parts(started_at, StdRng::seed_from_u64(seed))
    }

    fn with_parts(started_at: Instant, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(BotContextInner {
                started_at,
                rng: Mutex::new(rng),
            }),
        }
    }
}

impl Default for BotContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BotContextInner {
    /// When the process started.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time elapsed since start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Uniformly pick an index in `0..len`.
    ///
    /// `len` must be non-zero.
    pub fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    /// A uniformly random quip.
    pub fn random_quip(&self) -> &'static str {
        QUIPS[self.pick_index(QUIPS.len())]
    }

    /// A uniformly random presence entry.
    pub fn random_activity(&self) -> &'static StatusActivity {
        &ACTIVITIES[self.pick_index(ACTIVITIES.len())]
    }
}

/// Render a duration at whole-second precision, e.g. `1h2m3s`, `4m0s`, `12s`.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
