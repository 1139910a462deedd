//! The fixed slash command set.

/// Command names.
pub const PING: &str = "ping";
pub const HEALTH: &str = "health";
pub const STATUS: &str = "status";
pub const HELLO: &str = "hello";

/// `/hello` sub-command names.
pub const HELLO_RANDOM: &str = "random";
pub const HELLO_LIST: &str = "list";

/// A sub-command under a top-level command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// A platform-independent slash command descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub subcommands: &'static [SubcommandSpec],
}

/// Every command the bot registers, in registration order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: PING,
        description: "Quick reachability check.",
        subcommands: &[],
    },
    CommandSpec {
        name: HEALTH,
        description: "Bot health (ephemeral).",
        subcommands: &[],
    },
    CommandSpec {
        name: STATUS,
        description: "Operational status (ephemeral).",
        subcommands: &[],
    },
    CommandSpec {
        name: HELLO,
        description: "Mirai's greetings (accessible by all).",
        subcommands: &[
            SubcommandSpec {
                name: HELLO_RANDOM,
                description: "Serve a random greeting.",
            },
            SubcommandSpec {
                name: HELLO_LIST,
                description: "List all greetings.",
            },
        ],
    },
];
