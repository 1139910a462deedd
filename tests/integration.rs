#![cfg(test)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use mirai_bot::{
    base::{
        config::{Config, ConfigInner},
        context::BotContext,
        quips::QUIPS,
        types::{Reply, Res, StatusActivity, Void},
    },
    interaction::{
        commands::{COMMANDS, CommandSpec},
        router::{HELLO_GUIDANCE, InteractionRouter},
    },
    runtime::{LifecycleState, Runtime},
    service::gateway::{
        CommandInvocation, CommandScope, EventConsumer, GatewayClient, GenericGatewayClient, InteractionEvent, InteractionKind, RegisteredCommand,
        SessionInfo,
    },
};
use mockall::mock;
use secrecy::SecretString;
use tokio::sync::oneshot;

// Mocks.

// Mock gateway client for testing.

mock! {
    pub Gateway {}

    #[async_trait]
    impl GenericGatewayClient for Gateway {
        async fn connect(&self, consumer: Arc<dyn EventConsumer>) -> Res<SessionInfo>;
        async fn register_command(&self, application_id: &str, scope: &CommandScope, command: &CommandSpec) -> Res<RegisteredCommand>;
        async fn delete_command(&self, application_id: &str, scope: &CommandScope, command: &RegisteredCommand) -> Void;
        async fn respond(&self, event: &InteractionEvent, reply: &Reply) -> Void;
        async fn update_presence(&self, activity: &StatusActivity) -> Void;
        async fn close(&self) -> Void;
    }
}

fn session() -> SessionInfo {
    SessionInfo {
        user_id: "4242".to_string(),
        user_name: "mirai".to_string(),
    }
}

fn config(app_id: Option<&str>, guild_id: Option<&str>) -> Config {
    Config::from_inner(ConfigInner {
        discord_token: Some(SecretString::new("test-token".to_string())),
        app_id: app_id.map(str::to_string),
        guild_id: guild_id.map(str::to_string),
        health_addr: "127.0.0.1:0".to_string(),
    })
    .expect("valid config")
}

/// A gateway that accepts everything the running bot does.
fn get_mock_gateway() -> MockGateway {
    let mut mock = MockGateway::new();

    mock.expect_connect().times(1).returning(|_| Ok(session()));
    mock.expect_update_presence().returning(|_| Ok(()));
    mock.expect_close().times(1).returning(|| Ok(()));
    mock.expect_delete_command().never();

    mock
}

fn runtime(config: Config, mock: MockGateway) -> Runtime {
    Runtime::with_gateway(config, BotContext::new(), GatewayClient::new(Arc::new(mock)))
}

fn router(mock: MockGateway) -> InteractionRouter {
    InteractionRouter::new(BotContext::new(), GatewayClient::new(Arc::new(mock)))
}

/// Run the runtime until it is `Running`, then trigger shutdown and wait for it.
///
/// Returns every lifecycle state observed along the way.
async fn run_to_completion(runtime: Runtime) -> Res<Vec<LifecycleState>> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut shutdown_tx = Some(shutdown_tx);
    let mut states = runtime.subscribe();
    let mut seen = Vec::new();

    let mut task = tokio::spawn({
        let runtime = runtime.clone();
        async move {
            runtime
                .run_until(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        }
    });

    let result = loop {
        tokio::select! {
            biased;
            Ok(()) = states.changed() => {
                let state = *states.borrow_and_update();
                seen.push(state);

                if state == LifecycleState::Running
                    && let Some(tx) = shutdown_tx.take()
                {
                    let _ = tx.send(());
                }
            }
            result = &mut task => break result.expect("runtime task joins"),
        }
    };

    result.map(|()| seen)
}

// Lifecycle.

#[tokio::test]
async fn test_guild_scoped_lifecycle() {
    let mut mock = get_mock_gateway();

    // Without an APP_ID, the session's own user ID is the application.
    mock.expect_register_command()
        .withf(|application_id, scope, _| application_id == "4242" && *scope == CommandScope::Guild("123".to_string()))
        .times(COMMANDS.len())
        .returning(|_, _, command| {
            Ok(RegisteredCommand {
                id: "1".to_string(),
                name: command.name.to_string(),
            })
        });

    let runtime = runtime(config(None, Some("123")), mock);

    let states = run_to_completion(runtime.clone()).await.expect("graceful shutdown");

    assert_eq!(
        states,
        vec![
            LifecycleState::Starting,
            LifecycleState::CommandsRegistered,
            LifecycleState::Running,
            LifecycleState::ShuttingDown,
            LifecycleState::Stopped,
        ]
    );
    assert_eq!(runtime.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_global_lifecycle_with_configured_app_id() {
    let mut mock = get_mock_gateway();

    mock.expect_register_command()
        .withf(|application_id, scope, _| application_id == "999" && *scope == CommandScope::Global)
        .times(COMMANDS.len())
        .returning(|_, _, command| {
            Ok(RegisteredCommand {
                id: "2".to_string(),
                name: command.name.to_string(),
            })
        });

    let runtime = runtime(config(Some("999"), None), mock);

    run_to_completion(runtime.clone()).await.expect("graceful shutdown");

    assert_eq!(runtime.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_commands_are_registered_in_order() {
    let mut mock = get_mock_gateway();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let recorder = seen.clone();
    mock.expect_register_command().times(COMMANDS.len()).returning(move |_, _, command| {
        recorder.lock().unwrap().push(command.name);
        Ok(RegisteredCommand {
            id: "3".to_string(),
            name: command.name.to_string(),
        })
    });

    run_to_completion(runtime(config(None, None), mock)).await.expect("graceful shutdown");

    assert_eq!(*seen.lock().unwrap(), vec!["ping", "health", "status", "hello"]);
}

#[tokio::test]
async fn test_unbindable_health_address_is_not_fatal() {
    let mut mock = get_mock_gateway();
    mock.expect_register_command().returning(|_, _, command| {
        Ok(RegisteredCommand {
            id: "4".to_string(),
            name: command.name.to_string(),
        })
    });

    let config = Config::from_inner(ConfigInner {
        discord_token: Some(SecretString::new("test-token".to_string())),
        health_addr: "not-an-address".to_string(),
        ..Default::default()
    })
    .expect("valid config");

    run_to_completion(runtime(config, mock)).await.expect("graceful shutdown");
}

#[tokio::test]
async fn test_connect_failure_is_fatal() {
    let mut mock = MockGateway::new();
    mock.expect_connect().times(1).returning(|_| Err(anyhow::anyhow!("invalid token")));
    mock.expect_register_command().never();

    let runtime = runtime(config(None, None), mock);
    let result = runtime.run_until(std::future::pending()).await;

    assert!(result.is_err());
    assert_eq!(runtime.state(), LifecycleState::Starting);
}

#[tokio::test]
async fn test_registration_failure_is_fatal_and_stops_early() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mock = MockGateway::new();
    mock.expect_connect().times(1).returning(|_| Ok(session()));

    let counter = calls.clone();
    mock.expect_register_command().returning(move |_, _, command| {
        if counter.fetch_add(1, Ordering::SeqCst) == 1 {
            return Err(anyhow::anyhow!("missing access"));
        }
        Ok(RegisteredCommand {
            id: "5".to_string(),
            name: command.name.to_string(),
        })
    });

    let runtime = runtime(config(None, Some("123")), mock);
    let result = runtime.run_until(std::future::pending()).await;

    let message = format!("{:#}", result.expect_err("registration failure is fatal"));
    assert!(message.contains("health"), "{message}");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(runtime.state(), LifecycleState::Starting);
}

#[tokio::test]
async fn test_cleanup_deletes_every_command_and_absorbs_failures() {
    let mut mock = MockGateway::new();
    mock.expect_delete_command()
        .withf(|application_id, scope, _| application_id == "999" && *scope == CommandScope::Guild("123".to_string()))
        .times(2)
        .returning(|_, _, command| if command.name == "ping" { Err(anyhow::anyhow!("unknown command")) } else { Ok(()) });

    let runtime = runtime(config(Some("999"), Some("123")), mock);
    let registered = vec![
        RegisteredCommand {
            id: "10".to_string(),
            name: "ping".to_string(),
        },
        RegisteredCommand {
            id: "11".to_string(),
            name: "hello".to_string(),
        },
    ];

    runtime.cleanup_commands("999", &CommandScope::Guild("123".to_string()), &registered).await;
}

// Interactions.

fn command_event(invocation: CommandInvocation) -> InteractionEvent {
    InteractionEvent::command(77, "interaction-token", invocation)
}

#[tokio::test]
async fn test_unknown_hello_subcommand_is_answered_once() {
    let mut mock = MockGateway::new();
    mock.expect_respond()
        .withf(|event, reply| event.id == 77 && event.token == "interaction-token" && *reply == Reply::public("Unknown subcommand."))
        .times(1)
        .returning(|_, _| Ok(()));

    router(mock).on_interaction(command_event(CommandInvocation::new("hello").with_subcommand("sing"))).await;
}

#[tokio::test]
async fn test_hello_without_subcommand_gets_guidance() {
    let mut mock = MockGateway::new();
    mock.expect_respond().withf(|_, reply| *reply == Reply::public(HELLO_GUIDANCE)).times(1).returning(|_, _| Ok(()));

    router(mock).on_interaction(command_event(CommandInvocation::new("hello"))).await;
}

#[tokio::test]
async fn test_hello_random_replies_with_a_known_quip() {
    let mut mock = MockGateway::new();
    mock.expect_respond()
        .withf(|_, reply| !reply.is_private() && QUIPS.contains(&reply.content.as_str()))
        .times(1)
        .returning(|_, _| Ok(()));

    router(mock).on_interaction(command_event(CommandInvocation::new("hello").with_subcommand("random"))).await;
}

#[tokio::test]
async fn test_health_and_status_are_private() {
    let mut mock = MockGateway::new();
    mock.expect_respond()
        .withf(|_, reply| reply.is_private() && reply.content.starts_with("```json\n"))
        .times(1)
        .returning(|_, _| Ok(()));
    mock.expect_respond()
        .withf(|_, reply| reply.is_private() && reply.content.starts_with("**Status:** green"))
        .times(1)
        .returning(|_, _| Ok(()));

    let router = router(mock);
    router.on_interaction(command_event(CommandInvocation::new("health"))).await;
    router.on_interaction(command_event(CommandInvocation::new("status"))).await;
}

#[tokio::test]
async fn test_ping_is_public() {
    let mut mock = MockGateway::new();
    mock.expect_respond()
        .withf(|_, reply| !reply.is_private() && reply.content.starts_with("Pong! (`"))
        .times(1)
        .returning(|_, _| Ok(()));

    router(mock).on_interaction(command_event(CommandInvocation::new("ping"))).await;
}

#[tokio::test]
async fn test_non_command_interactions_are_ignored() {
    let mut mock = MockGateway::new();
    mock.expect_respond().never();

    let event = InteractionEvent {
        id: 78,
        token: "component-token".to_string(),
        kind: InteractionKind::Other,
    };

    let router = router(mock);
    router.on_interaction(event).await;
    router.on_interaction(command_event(CommandInvocation::new("not-ours"))).await;
}

#[tokio::test]
async fn test_reply_failures_are_absorbed() {
    let mut mock = MockGateway::new();
    mock.expect_respond().times(1).returning(|_, _| Err(anyhow::anyhow!("Unknown interaction")));

    // Must not panic or retry.
    router(mock).on_interaction(command_event(CommandInvocation::new("hello").with_subcommand("list"))).await;
}

#[tokio::test]
async fn test_ready_does_not_touch_the_gateway() {
    // No expectations: any gateway call would panic.
    router(MockGateway::new()).on_ready(&session()).await;
}
