//! Rotates the bot's displayed activity on a fixed interval.

use std::time::Duration;

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info};

use super::gateway::GatewayClient;
use crate::base::context::BotContext;

/// Time between presence updates.
pub const PRESENCE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Background task that pushes a random activity once at start, then every interval.
pub struct PresenceRotator {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PresenceRotator {
    /// Start rotating. Returns immediately; the first update is pushed right away.
    pub fn start(gateway: GatewayClient, context: BotContext, interval: Duration) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let activity = context.random_activity();
                        debug!("Updating presence to {:?} `{}`.", activity.kind, activity.text);

                        // Failures are logged and the rotation keeps going.
                        if let Err(e) = gateway.update_presence(activity).await {
                            error!("Presence update error: {}", e);
                        }
                    }
                }
            }

            info!("Presence rotation stopped.");
        });

        Self { stop_tx, task }
    }

    /// Signal the task to stop and wait until it has exited.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());

        if let Err(e) = self.task.await {
            error!("Presence rotation task failed: {}", e);
        }
    }
}
