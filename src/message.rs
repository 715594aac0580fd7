//! Chat messages and their presentation metadata.
//!
//! A [`Message`] is created once (on submission or when a reply arrives) and
//! never mutated after it has been handed to a renderer.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Greeting shown when the message list is empty and after a reset.
pub const GREETING: &str = "Hello! I am PoBot, your legal AI assistant. \
Which language would you like to continue the conversation with?";

/// Shown when a turn fails for any reason.
pub const ERROR_REPLY: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Shown one second after the server reports the conversation complete.
pub const REDIRECT_NOTICE: &str = "Redirecting to dashboard...";

/// Format used for message timestamps (two-digit hour and minute).
const TIME_FORMAT: &str = "%H:%M";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the widget.
    User,
    /// The server-side assistant.
    Bot,
}

impl Sender {
    /// CSS class applied to the message element.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Bot => "bot-message",
        }
    }

    /// Font Awesome icon class shown next to the sender label.
    #[must_use]
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::User => "fas fa-user",
            Self::Bot => "fas fa-robot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

/// A single rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub sender: Sender,
    /// Message body, exactly as submitted or received.
    pub text: String,
    /// Local time of creation, formatted as `HH:MM`.
    pub timestamp: String,
}

impl Message {
    /// Create a user message stamped with the given clock's current time.
    pub fn user(text: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new(Sender::User, text, clock)
    }

    /// Create a bot message stamped with the given clock's current time.
    pub fn bot(text: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new(Sender::Bot, text, clock)
    }

    /// Create a message stamped with the given clock's current time.
    pub fn new(sender: Sender, text: impl Into<String>, clock: &dyn Clock) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: format_time(&clock.now()),
        }
    }
}

/// Format a local time the way message headers show it.
#[must_use]
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Source of the current local time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    /// Pin the clock to the given instant.
    #[must_use]
    pub fn new(time: DateTime<Local>) -> Self {
        Self(time)
    }

    /// Pin the clock to a wall-clock time today.
    ///
    /// Falls back to the current time if the local timezone makes the
    /// requested time ambiguous or nonexistent.
    #[must_use]
    pub fn at(hour: u32, minute: u32) -> Self {
        let today = Local::now().date_naive();
        let time = today
            .and_hms_opt(hour, minute, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .unwrap_or_else(Local::now);
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
