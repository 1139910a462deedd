//! Shared result aliases, constants, and small value types.

/// Error type used across the crate.
pub type Err = anyhow::Error;
/// Result alias over [`Err`].
pub type Res<T> = Result<T, Err>;
/// Result with no value.
pub type Void = Res<()>;

/// Version reported by `/ping`, `/status`, and the health snapshot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name reported in the health snapshot.
pub const BOT_NAME: &str = "Mirai";

/// The category a presence entry is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// "Watching ...".
    Watching,
    /// "Playing ...".
    Playing,
    /// "Listening to ...".
    Listening,
    /// Free-form custom status.
    Custom,
}

/// One entry of the presence rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusActivity {
    /// Text shown next to the bot's name.
    pub text: &'static str,
    /// How the text is presented.
    pub kind: ActivityKind,
}

impl StatusActivity {
    /// Build an entry; usable in `const` tables.
    pub const fn new(text: &'static str, kind: ActivityKind) -> Self {
        Self { text, kind }
    }
}

/// Who can see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible to the whole channel.
    Public,
    /// Visible only to the invoking user.
    Private,
}

/// A single reply to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub content: String,
    /// Who can see it.
    pub visibility: Visibility,
}

impl Reply {
    /// A reply the whole channel can see.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visibility: Visibility::Public,
        }
    }

    /// A reply only the invoking user can see.
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visibility: Visibility::Private,
        }
    }

    /// Whether only the invoking user can see this reply.
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }
}
