//! Runtime lifecycle and shared state for the bot.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        context::BotContext,
        types::{Res, Void},
    },
    interaction::{commands::COMMANDS, router::InteractionRouter},
    service::{
        gateway::{CommandScope, GatewayClient, RegisteredCommand},
        health::{HealthServer, SHUTDOWN_GRACE},
        presence::{PRESENCE_INTERVAL, PresenceRotator},
    },
};

/// Whether registered commands are deleted on shutdown.
///
/// Off: commands persist across restarts, and re-registering overwrites them.
pub const CLEANUP_COMMANDS_ON_EXIT: bool = false;

/// Where the bot is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    CommandsRegistered,
    Running,
    ShuttingDown,
    Stopped,
}

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the process context, and the gateway
/// client. It is designed to be trivially cloneable.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// Start time and random generator.
    pub context: BotContext,
    /// The gateway client instance.
    pub gateway: GatewayClient,
    state: Arc<watch::Sender<LifecycleState>>,
}

impl Runtime {
    /// Create a new runtime instance backed by Discord.
    pub fn new(config: Config) -> Self {
        let gateway = GatewayClient::discord(&config);
        Self::with_gateway(config, BotContext::new(), gateway)
    }

    /// Create a runtime instance with an explicit context and gateway.
    pub fn with_gateway(config: Config, context: BotContext, gateway: GatewayClient) -> Self {
        let (state, _) = watch::channel(LifecycleState::Starting);

        Self {
            config,
            context,
            gateway,
            state: Arc::new(state),
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Watch lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Run until SIGINT or SIGTERM.
    pub async fn start(&self) -> Void {
        self.run_until(shutdown_signal()).await
    }

    /// Run the full lifecycle, shutting down once `shutdown` resolves.
    ///
    /// Returns an error only for fatal startup failures; everything after
    /// startup is logged and absorbed.
    #[instrument(skip_all)]
    pub async fn run_until<F>(&self, shutdown: F) -> Void
    where
        F: Future<Output = ()> + Send,
    {
        self.transition(LifecycleState::Starting).await;

        // Open the session.

        let router = InteractionRouter::new(self.context.clone(), self.gateway.clone());
        let session = self.gateway.connect(Arc::new(router)).await.context("Cannot open the gateway connection")?;

        // Register commands.

        let application_id = self.config.application_id().map(str::to_string).unwrap_or_else(|| session.user_id.clone());
        let scope = CommandScope::from_guild_id(self.config.guild_id());

        let registered = self.register_commands(&application_id, &scope).await?;

        info!("Slash commands registered ({}).", scope);
        self.transition(LifecycleState::CommandsRegistered).await;

        // Start the background tasks.

        let rotator = PresenceRotator::start(self.gateway.clone(), self.context.clone(), PRESENCE_INTERVAL);

        let health = match HealthServer::start(&self.config.health_addr, self.context.clone()).await {
            Ok(server) => Some(server),
            Err(e) => {
                error!("Health server error on {}: {}", self.config.health_addr, e);
                None
            }
        };

        self.transition(LifecycleState::Running).await;

        shutdown.await;

        // Shut down.

        self.transition(LifecycleState::ShuttingDown).await;

        rotator.stop().await;

        if let Some(health) = health
            && let Err(e) = health.shutdown(SHUTDOWN_GRACE).await
        {
            error!("Health server shutdown error: {}", e);
        }

        if CLEANUP_COMMANDS_ON_EXIT {
            self.cleanup_commands(&application_id, &scope, &registered).await;
        }

        if let Err(e) = self.gateway.close().await {
            error!("Gateway close error: {}", e);
        }

        self.transition(LifecycleState::Stopped).await;
        info!("Mirai bot stopped gracefully.");

        Ok(())
    }

    /// Register every command in `scope`. The first failure aborts; nothing is rolled back.
    #[instrument(skip(self))]
    pub async fn register_commands(&self, application_id: &str, scope: &CommandScope) -> Res<Vec<RegisteredCommand>> {
        let mut registered = Vec::with_capacity(COMMANDS.len());

        for command in COMMANDS {
            let created = self
                .gateway
                .register_command(application_id, scope, command)
                .await
                .with_context(|| format!("Cannot create {} command `{}`", scope, command.name))?;

            registered.push(created);
        }

        Ok(registered)
    }

    /// Delete previously registered commands, logging failures.
    #[instrument(skip(self, registered))]
    pub async fn cleanup_commands(&self, application_id: &str, scope: &CommandScope, registered: &[RegisteredCommand]) {
        for command in registered {
            if let Err(e) = self.gateway.delete_command(application_id, scope, command).await {
                error!("Cannot delete command `{}`: {}", command.name, e);
            }
        }
    }

    async fn transition(&self, state: LifecycleState) {
        info!("Lifecycle: {:?}", state);
        self.state.send_replace(state);

        // Watchers only see the latest value; give them a turn before moving on.
        tokio::task::yield_now().await;
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT; shutting down ..."),
        _ = terminate => info!("Received SIGTERM; shutting down ..."),
    }
}
