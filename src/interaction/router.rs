//! Dispatches command invocations to their replies.

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use super::commands::{HEALTH, HELLO, HELLO_LIST, HELLO_RANDOM, PING, STATUS};
use crate::{
    base::{
        context::{BotContext, format_uptime},
        health::HealthSnapshot,
        quips::QUIPS,
        types::{Reply, Res, VERSION, Void},
    },
    service::gateway::{CommandInvocation, EventConsumer, GatewayClient, InteractionEvent, InteractionKind, SessionInfo},
};

/// Reply to `/hello` without a sub-command.
pub const HELLO_GUIDANCE: &str = "Use `/hello random` or `/hello list`.";

/// Reply to an unrecognized `/hello` sub-command.
pub const UNKNOWN_SUBCOMMAND: &str = "Unknown subcommand.";

/// Message length the platform accepts. Longer replies are sent anyway and fail upstream.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

/// Routes interactions to one of the command behaviors and sends the reply.
#[derive(Clone)]
pub struct InteractionRouter {
    context: BotContext,
    gateway: GatewayClient,
}

impl InteractionRouter {
    pub fn new(context: BotContext, gateway: GatewayClient) -> Self {
        Self { context, gateway }
    }

    /// Build the reply for an invocation.
    ///
    /// Returns `None` for command names the bot does not own.
    pub fn reply_for(&self, invocation: &CommandInvocation) -> Res<Option<Reply>> {
        let reply = match invocation.name.as_str() {
            PING => Reply::public(format!("Pong! (`{}` up {})", VERSION, format_uptime(self.context.uptime()))),
            HEALTH => {
                let snapshot = serde_json::to_string_pretty(&HealthSnapshot::capture(&self.context))?;
                Reply::private(format!("```json\n{snapshot}\n```"))
            }
            STATUS => Reply::private(format!(
                "**Status:** green ✅\nUptime: `{}`\nGreetings: `{}`\nVersion: `{}`",
                format_uptime(self.context.uptime()),
                QUIPS.len(),
                VERSION
            )),
            HELLO => Reply::public(self.hello(invocation.subcommand.as_deref())),
            _ => return Ok(None),
        };

        Ok(Some(reply))
    }

    fn hello(&self, subcommand: Option<&str>) -> String {
        match subcommand {
            None => HELLO_GUIDANCE.to_string(),
            Some(HELLO_RANDOM) => self.context.random_quip().to_string(),
            Some(HELLO_LIST) => list_quips(),
            Some(_) => UNKNOWN_SUBCOMMAND.to_string(),
        }
    }

    #[instrument(skip_all)]
    async fn handle_interaction(&self, event: &InteractionEvent) -> Void {
        let InteractionKind::Command(invocation) = &event.kind else {
            debug!("Ignoring non-command interaction.");
            return Ok(());
        };

        let Some(reply) = self.reply_for(invocation)? else {
            warn!("Received unhandled command `{}`.", invocation.name);
            return Ok(());
        };

        let length = reply.content.chars().count();
        if length > MESSAGE_CHAR_LIMIT {
            warn!("Reply to `/{}` is {} characters; the platform may reject it.", invocation.name, length);
        }

        self.gateway.respond(event, &reply).await
    }
}

#[async_trait]
impl EventConsumer for InteractionRouter {
    async fn on_ready(&self, session: &SessionInfo) {
        info!("Logged in as {} ({}).", session.user_name, session.user_id);
    }

    async fn on_interaction(&self, event: InteractionEvent) {
        // Process the event.
        let result = self.handle_interaction(&event).await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while responding to interaction {}: {}", event.id, err);
        }
    }
}

/// All quips, one per line, as `<ordinal>. <quip>`.
pub fn list_quips() -> String {
    QUIPS.iter().enumerate().map(|(idx, quip)| format!("{}. {}", idx + 1, quip)).collect::<Vec<_>>().join("\n")
}
