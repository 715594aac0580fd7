//! HTML renderer.
//!
//! Mirrors the page's `#messages` list, `#user-input` field and
//! `#chat-container` scroll state. Each message is rendered once into the
//! fragment the page expects; the list can be serialized with
//! [`HtmlRenderer::render`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Renderer, SenderLabels};
use crate::message::Message;

const TYPING_INDICATOR_HTML: &str =
    r#"<div class="typing-indicator bot-message"><span></span><span></span><span></span></div>"#;

/// How message text is inserted into the `message-content` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// HTML special characters are entity-encoded.
    #[default]
    Escaped,
    /// Text is inserted as markup, unmodified.
    Raw,
}

/// One element of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A rendered chat message.
    Message {
        /// The message data.
        message: Message,
        /// The fragment produced for it.
        html: String,
    },
    /// The transient "bot is typing" placeholder.
    TypingIndicator,
}

impl Node {
    fn html(&self) -> &str {
        match self {
            Self::Message { html, .. } => html,
            Self::TypingIndicator => TYPING_INDICATOR_HTML,
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    nodes: Vec<Node>,
    input: String,
    input_focused: bool,
    scroll_top: usize,
}

/// Renders the widget into HTML fragments held in memory.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    labels: SenderLabels,
    mode: ContentMode,
    state: Mutex<PageState>,
}

impl HtmlRenderer {
    /// Create a renderer with the given labels and content mode.
    #[must_use]
    pub fn new(labels: SenderLabels, mode: ContentMode) -> Self {
        Self {
            labels,
            mode,
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build the fragment for one message.
    #[must_use]
    pub fn message_html(&self, message: &Message) -> String {
        let content = match self.mode {
            ContentMode::Escaped => escape_html(&message.text),
            ContentMode::Raw => message.text.clone(),
        };
        format!(
            r#"<div class="message {class}"><div class="message-header"><div class="message-sender"><i class="{icon} message-icon"></i><span class="sender-name">{label}</span></div><span class="message-time">{time}</span></div><div class="message-content">{content}</div></div>"#,
            class = message.sender.css_class(),
            icon = message.sender.icon_class(),
            label = escape_html(self.labels.label(message.sender)),
            time = escape_html(&message.timestamp),
        )
    }

    /// Serialize the whole list as the inner HTML of `#messages`.
    #[must_use]
    pub fn render(&self) -> String {
        self.state().nodes.iter().map(Node::html).collect()
    }

    /// Snapshot of the list.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.state().nodes.clone()
    }

    /// Messages currently in the list, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.state()
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Message { message, .. } => Some(message.clone()),
                Node::TypingIndicator => None,
            })
            .collect()
    }

    /// Number of typing indicators in the list.
    #[must_use]
    pub fn typing_indicator_count(&self) -> usize {
        self.state()
            .nodes
            .iter()
            .filter(|node| matches!(node, Node::TypingIndicator))
            .count()
    }

    /// Type into the input field.
    pub fn set_input(&self, value: impl Into<String>) {
        self.state().input = value.into();
    }

    /// Current value of the input field.
    #[must_use]
    pub fn input_value(&self) -> String {
        self.state().input.clone()
    }

    /// Whether the input field has focus.
    #[must_use]
    pub fn is_input_focused(&self) -> bool {
        self.state().input_focused
    }

    /// Current scroll offset of the container, in list elements.
    #[must_use]
    pub fn scroll_top(&self) -> usize {
        self.state().scroll_top
    }

    /// Total scrollable height of the container, in list elements.
    #[must_use]
    pub fn scroll_height(&self) -> usize {
        self.state().nodes.len()
    }
}

impl Renderer for HtmlRenderer {
    fn append_message(&self, message: &Message) {
        let html = self.message_html(message);
        self.state().nodes.push(Node::Message {
            message: message.clone(),
            html,
        });
    }

    fn show_typing_indicator(&self) {
        self.state().nodes.push(Node::TypingIndicator);
    }

    fn hide_typing_indicator(&self) {
        let mut state = self.state();
        state
            .nodes
            .retain(|node| !matches!(node, Node::TypingIndicator));
        let height = state.nodes.len();
        state.scroll_top = state.scroll_top.min(height);
    }

    fn clear_messages(&self) {
        let mut state = self.state();
        state.nodes.clear();
        state.scroll_top = 0;
    }

    fn is_empty(&self) -> bool {
        self.state().nodes.is_empty()
    }

    fn scroll_to_bottom(&self) {
        let mut state = self.state();
        state.scroll_top = state.nodes.len();
    }

    fn clear_input(&self) {
        self.state().input.clear();
    }

    fn focus_input(&self) {
        self.state().input_focused = true;
    }
}

/// Entity-encode the characters that are significant in HTML text and
/// attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FixedClock;

    #[test]
    fn bot_message_markup() {
        let renderer = HtmlRenderer::default();
        let msg = Message::bot("Hi there!", &FixedClock::at(14, 5));

        let html = renderer.message_html(&msg);
        assert!(html.starts_with(r#"<div class="message bot-message">"#));
        assert!(html.contains(r#"<i class="fas fa-robot message-icon"></i>"#));
        assert!(html.contains(r#"<span class="sender-name">PoBot</span>"#));
        assert!(html.contains(r#"<span class="message-time">14:05</span>"#));
        assert!(html.contains(r#"<div class="message-content">Hi there!</div>"#));
    }

    #[test]
    fn message_markup_is_a_single_fragment() {
        let renderer = HtmlRenderer::default();
        let msg = Message::user("Hello", &FixedClock::at(9, 30));

        assert_eq!(
            renderer.message_html(&msg),
            r#"<div class="message user-message"><div class="message-header"><div class="message-sender"><i class="fas fa-user message-icon"></i><span class="sender-name">You</span></div><span class="message-time">09:30</span></div><div class="message-content">Hello</div></div>"#
        );
    }

    #[test]
    fn user_message_markup() {
        let renderer = HtmlRenderer::default();
        let msg = Message::user("Hello", &FixedClock::at(8, 0));

        let html = renderer.message_html(&msg);
        assert!(html.contains("user-message"));
        assert!(html.contains("fas fa-user"));
        assert!(html.contains(r#"<span class="sender-name">You</span>"#));
    }

    #[test]
    fn content_is_escaped_by_default() {
        let renderer = HtmlRenderer::default();
        let msg = Message::user("<b>hi</b> & 'bye'", &FixedClock::at(8, 0));

        let html = renderer.message_html(&msg);
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt; &amp; &#39;bye&#39;"));
    }

    #[test]
    fn raw_mode_keeps_markup() {
        let renderer = HtmlRenderer::new(SenderLabels::default(), ContentMode::Raw);
        let msg = Message::bot("line one<br>line two", &FixedClock::at(8, 0));

        assert!(renderer.message_html(&msg).contains("line one<br>line two"));
    }

    #[test]
    fn hide_removes_every_indicator() {
        let renderer = HtmlRenderer::default();
        renderer.show_typing_indicator();
        renderer.append_message(&Message::user("a", &FixedClock::at(8, 0)));
        renderer.show_typing_indicator();
        assert_eq!(renderer.typing_indicator_count(), 2);

        renderer.hide_typing_indicator();
        assert_eq!(renderer.typing_indicator_count(), 0);
        assert_eq!(renderer.messages().len(), 1);
    }

    #[test]
    fn render_concatenates_fragments() {
        let renderer = HtmlRenderer::default();
        renderer.show_typing_indicator();
        assert_eq!(renderer.render(), TYPING_INDICATOR_HTML);

        renderer.clear_messages();
        assert!(renderer.is_empty());
        assert_eq!(renderer.render(), "");
    }

    #[test]
    fn scroll_follows_list_end() {
        let renderer = HtmlRenderer::default();
        renderer.append_message(&Message::bot("one", &FixedClock::at(8, 0)));
        renderer.append_message(&Message::bot("two", &FixedClock::at(8, 0)));
        assert_eq!(renderer.scroll_top(), 0);

        renderer.scroll_to_bottom();
        assert_eq!(renderer.scroll_top(), renderer.scroll_height());
    }

    #[test]
    fn input_state() {
        let renderer = HtmlRenderer::default();
        renderer.set_input("draft");
        assert_eq!(renderer.input_value(), "draft");

        renderer.clear_input();
        assert_eq!(renderer.input_value(), "");

        assert!(!renderer.is_input_focused());
        renderer.focus_input();
        assert!(renderer.is_input_focused());
    }
}
