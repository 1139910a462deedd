pub mod discord;

use std::{fmt, ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{
    base::types::{Reply, Res, StatusActivity, Void},
    interaction::commands::CommandSpec,
};

// Types.

/// Identity of the authenticated bot, as reported when the session becomes ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: String,
    pub user_name: String,
}

/// Where slash commands are registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandScope {
    /// Visible in every guild the bot is in.
    Global,
    /// Visible only in the given guild.
    Guild(String),
}

impl CommandScope {
    /// Guild-scoped when a guild ID is given, global otherwise.
    pub fn from_guild_id(guild_id: Option<&str>) -> Self {
        match guild_id {
            Some(id) => Self::Guild(id.to_string()),
            None => Self::Global,
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Guild(id) => write!(f, "guild:{id}"),
        }
    }
}

/// A command as the platform acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    /// The first option's name, which for `/hello` is the chosen sub-command.
    pub subcommand: Option<String>,
}

impl CommandInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcommand: None,
        }
    }

    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }
}

/// What kind of interaction arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    Command(CommandInvocation),
    /// Components, autocomplete, modals, pings: never answered.
    Other,
}

/// An incoming interaction, with what is needed to answer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    pub id: u64,
    pub token: String,
    pub kind: InteractionKind,
}

impl InteractionEvent {
    pub fn command(id: u64, token: impl Into<String>, invocation: CommandInvocation) -> Self {
        Self {
            id,
            token: token.into(),
            kind: InteractionKind::Command(invocation),
        }
    }
}

// Traits.

/// Receives gateway events.
///
/// The gateway calls these as events arrive; invocations may overlap.
#[async_trait]
pub trait EventConsumer: Send + Sync + 'static {
    /// The session is authenticated and ready.
    async fn on_ready(&self, session: &SessionInfo);

    /// A user interacted with the bot.
    async fn on_interaction(&self, event: InteractionEvent);
}

/// Generic "gateway" trait that chat platform clients must implement.
///
/// This is the whole surface the bot needs from the platform: a session,
/// command registration, interaction replies, and presence updates.
#[async_trait]
pub trait GenericGatewayClient: Send + Sync + 'static {
    /// Open the authenticated session and start delivering events to `consumer`.
    ///
    /// Resolves once the session is ready.
    async fn connect(&self, consumer: Arc<dyn EventConsumer>) -> Res<SessionInfo>;

    /// Register one command under `application_id` in `scope`.
    async fn register_command(&self, application_id: &str, scope: &CommandScope, command: &CommandSpec) -> Res<RegisteredCommand>;

    /// Delete a previously registered command.
    async fn delete_command(&self, application_id: &str, scope: &CommandScope, command: &RegisteredCommand) -> Void;

    /// Answer an interaction. Called at most once per interaction.
    async fn respond(&self, event: &InteractionEvent, reply: &Reply) -> Void;

    /// Replace the bot's displayed activity.
    async fn update_presence(&self, activity: &StatusActivity) -> Void;

    /// Close the session.
    async fn close(&self) -> Void;
}

// Structs.

/// Gateway client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<dyn GenericGatewayClient>,
}

impl Deref for GatewayClient {
    type Target = dyn GenericGatewayClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl GatewayClient {
    pub fn new(inner: Arc<dyn GenericGatewayClient>) -> Self {
        Self { inner }
    }
}
