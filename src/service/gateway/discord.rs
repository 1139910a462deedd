//! Discord implementation of the gateway, on top of `serenity`.

use std::{
    num::NonZeroU64,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use anyhow::{Context as _, anyhow};
use async_trait::async_trait;
use serenity::all::{
    ActivityData, ApplicationId, Client, Command, CommandId, CommandOptionType, Context, CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, GuildId, Http, Interaction, InteractionId, OnlineStatus, Ready, ShardManager,
};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{info, instrument, warn};

use super::{
    CommandInvocation, CommandScope, EventConsumer, GatewayClient, GenericGatewayClient, InteractionEvent, InteractionKind, RegisteredCommand,
    SessionInfo,
};
use crate::{
    base::{
        config::Config,
        types::{ActivityKind, Reply, Res, StatusActivity, Void},
    },
    interaction::commands::CommandSpec,
};

// Type aliases.

type Runner = JoinHandle<Result<(), serenity::Error>>;

// Extra methods on `GatewayClient` applied by the discord implementation.

impl GatewayClient {
    /// Creates a new Discord gateway client. Nothing connects until `connect`.
    pub fn discord(config: &Config) -> Self {
        Self::new(Arc::new(DiscordGatewayClient::new(config)))
    }
}

// Structs.

/// Discord client implementation.
struct DiscordGatewayClient {
    config: Config,
    http: OnceLock<Arc<Http>>,
    shard_manager: OnceLock<Arc<ShardManager>>,
    runner: tokio::sync::Mutex<Option<Runner>>,
}

impl DiscordGatewayClient {
    fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            http: OnceLock::new(),
            shard_manager: OnceLock::new(),
            runner: tokio::sync::Mutex::new(None),
        }
    }

    fn http(&self) -> Res<&Http> {
        self.http.get().map(|http| http.as_ref()).ok_or_else(|| anyhow!("The Discord session is not open."))
    }
}

#[async_trait]
impl GenericGatewayClient for DiscordGatewayClient {
    #[instrument(name = "DiscordGatewayClient::connect", skip_all)]
    async fn connect(&self, consumer: Arc<dyn EventConsumer>) -> Res<SessionInfo> {
        let (ready_tx, ready_rx) = oneshot::channel();

        let handler = DiscordHandler {
            consumer,
            ready_tx: Mutex::new(Some(ready_tx)),
        };

        let mut client = Client::builder(self.config.token(), GatewayIntents::GUILDS)
            .event_handler(handler)
            .await
            .context("Failed to create the Discord client")?;

        let _ = self.http.set(client.http.clone());
        let _ = self.shard_manager.set(client.shard_manager.clone());

        // Run the shard in the background; it only returns on shutdown or a fatal gateway error.
        let mut runner: Runner = tokio::spawn(async move { client.start().await });

        let session = tokio::select! {
            ready = ready_rx => match ready {
                Ok(session) => session,
                Err(_) => {
                    runner.abort();
                    return Err(anyhow!("The Discord session closed before it became ready."));
                }
            },
            result = &mut runner => {
                return Err(match result {
                    Ok(Ok(())) => anyhow!("The Discord session stopped before it became ready."),
                    Ok(Err(e)) => anyhow::Error::new(e).context("Cannot open the Discord connection"),
                    Err(e) => e.into(),
                });
            }
        };

        *self.runner.lock().await = Some(runner);

        Ok(session)
    }

    #[instrument(skip(self, command), fields(name = command.name))]
    async fn register_command(&self, application_id: &str, scope: &CommandScope, command: &CommandSpec) -> Res<RegisteredCommand> {
        let http = self.http()?;
        http.set_application_id(ApplicationId::new(parse_id(application_id)?.get()));

        let builder = build_command(command);

        let created = match scope {
            CommandScope::Global => Command::create_global_command(http, builder).await?,
            CommandScope::Guild(guild_id) => GuildId::new(parse_id(guild_id)?.get()).create_command(http, builder).await?,
        };

        Ok(RegisteredCommand {
            id: created.id.to_string(),
            name: created.name,
        })
    }

    #[instrument(skip(self, command), fields(name = command.name))]
    async fn delete_command(&self, application_id: &str, scope: &CommandScope, command: &RegisteredCommand) -> Void {
        let http = self.http()?;
        http.set_application_id(ApplicationId::new(parse_id(application_id)?.get()));

        let command_id = CommandId::new(parse_id(&command.id)?.get());

        match scope {
            CommandScope::Global => Command::delete_global_command(http, command_id).await?,
            CommandScope::Guild(guild_id) => GuildId::new(parse_id(guild_id)?.get()).delete_command(http, command_id).await?,
        }

        Ok(())
    }

    async fn respond(&self, event: &InteractionEvent, reply: &Reply) -> Void {
        let http = self.http()?;
        let interaction_id = NonZeroU64::new(event.id).ok_or_else(|| anyhow!("Interaction ID must be non-zero."))?;

        let mut message = CreateInteractionResponseMessage::new().content(reply.content.clone());
        if reply.is_private() {
            message = message.ephemeral(true);
        }

        let response = CreateInteractionResponse::Message(message);

        http.create_interaction_response(InteractionId::new(interaction_id.get()), &event.token, &response, Vec::new())
            .await
            .map_err(|e| anyhow!("Failed to send interaction response: {}", e))?;

        Ok(())
    }

    async fn update_presence(&self, activity: &StatusActivity) -> Void {
        let manager = self.shard_manager.get().ok_or_else(|| anyhow!("The Discord session is not open."))?;
        let runners = manager.runners.lock().await;

        if runners.is_empty() {
            return Err(anyhow!("No Discord shard is running."));
        }

        for info in runners.values() {
            info.runner_tx.set_presence(Some(activity_data(activity)), OnlineStatus::Online);
        }

        Ok(())
    }

    #[instrument(name = "DiscordGatewayClient::close", skip_all)]
    async fn close(&self) -> Void {
        if let Some(manager) = self.shard_manager.get() {
            manager.shutdown_all().await;
        }

        let runner = self.runner.lock().await.take();

        if let Some(runner) = runner {
            runner.await?.context("The Discord session ended with an error")?;
        }

        info!("Discord session closed.");

        Ok(())
    }
}

// Event handler for serenity.

/// Forwards serenity events to the bot's consumer.
struct DiscordHandler {
    consumer: Arc<dyn EventConsumer>,
    ready_tx: Mutex<Option<oneshot::Sender<SessionInfo>>>,
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let session = SessionInfo {
            user_id: ready.user.id.to_string(),
            user_name: ready.user.name.clone(),
        };

        self.consumer.on_ready(&session).await;

        // Only the first ready resolves `connect`; later ones are reconnects.
        let ready_tx = self.ready_tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        match ready_tx {
            Some(tx) => {
                let _ = tx.send(session);
            }
            None => warn!("Discord session re-identified."),
        }
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        self.consumer.on_interaction(to_event(&interaction)).await;
    }
}

// Helpers.

/// Parse a Discord snowflake.
fn parse_id(raw: &str) -> Res<NonZeroU64> {
    raw.trim().parse::<NonZeroU64>().with_context(|| format!("`{raw}` is not a valid Discord ID"))
}

/// Build the serenity command builder for a descriptor.
fn build_command(spec: &CommandSpec) -> CreateCommand {
    spec.subcommands.iter().fold(CreateCommand::new(spec.name).description(spec.description), |builder, sub| {
        builder.add_option(CreateCommandOption::new(CommandOptionType::SubCommand, sub.name, sub.description))
    })
}

/// Map a presence entry onto serenity's activity.
fn activity_data(activity: &StatusActivity) -> ActivityData {
    match activity.kind {
        ActivityKind::Watching => ActivityData::watching(activity.text),
        ActivityKind::Playing => ActivityData::playing(activity.text),
        ActivityKind::Listening => ActivityData::listening(activity.text),
        ActivityKind::Custom => ActivityData::custom(activity.text),
    }
}

/// Convert a serenity interaction into the bot's event.
fn to_event(interaction: &Interaction) -> InteractionEvent {
    let kind = match interaction {
        Interaction::Command(command) => InteractionKind::Command(CommandInvocation {
            name: command.data.name.clone(),
            subcommand: command.data.options.first().map(|option| option.name.clone()),
        }),
        _ => InteractionKind::Other,
    };

    InteractionEvent {
        id: interaction.id().get(),
        token: interaction.token().to_string(),
        kind,
    }
}

// Tests.
