//! Rendering surface for the chat widget.
//!
//! The widget never touches markup or a terminal directly. It drives a
//! [`Renderer`], which owns the message list, the typing indicator, the scroll
//! position and the input field.
//!
//! - [`HtmlRenderer`]: keeps the message list as HTML fragments
//! - [`TerminalRenderer`]: append-only text output

mod html;
mod terminal;

pub use html::{ContentMode, HtmlRenderer, Node, escape_html};
pub use terminal::TerminalRenderer;

use crate::message::{Message, Sender};

/// Display names shown in message headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderLabels {
    /// Label for the person typing.
    pub user: String,
    /// Label for the assistant.
    pub bot: String,
}

impl SenderLabels {
    /// Label for the given sender.
    #[must_use]
    pub fn label(&self, sender: Sender) -> &str {
        match sender {
            Sender::User => &self.user,
            Sender::Bot => &self.bot,
        }
    }
}

impl Default for SenderLabels {
    fn default() -> Self {
        Self {
            user: "You".to_string(),
            bot: "PoBot".to_string(),
        }
    }
}

/// Display operations the widget depends on.
///
/// All methods take `&self`; implementations are shared between concurrently
/// running turns and handle their own synchronization.
pub trait Renderer: Send + Sync + std::fmt::Debug {
    /// Append a message element to the end of the list.
    fn append_message(&self, message: &Message);

    /// Append a typing indicator to the end of the list.
    fn show_typing_indicator(&self);

    /// Remove every typing indicator from the list.
    fn hide_typing_indicator(&self);

    /// Remove everything from the list.
    fn clear_messages(&self);

    /// Whether the list has no elements at all, indicators included.
    fn is_empty(&self) -> bool;

    /// Scroll the list container to its end.
    fn scroll_to_bottom(&self);

    /// Empty the text input.
    fn clear_input(&self);

    /// Move keyboard focus to the text input.
    fn focus_input(&self);
}
