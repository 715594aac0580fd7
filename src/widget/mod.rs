//! The chat widget controller.
//!
//! [`ChatWidget`] relays user input to a [`Transport`], renders both sides of
//! the conversation through a [`Renderer`], and remembers in a
//! [`SessionFlagStore`] whether this browsing session already started a
//! conversation. When the server reports the conversation complete it
//! schedules a redirect to the dashboard.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pobot_chat::navigation::RecordingNavigator;
//! use pobot_chat::render::HtmlRenderer;
//! use pobot_chat::transport::HttpTransport;
//! use pobot_chat::widget::ChatWidget;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("http://127.0.0.1:8000/chat/message/".parse()?, None)?;
//! let widget = ChatWidget::builder()
//!     .renderer(Arc::new(HtmlRenderer::default()))
//!     .transport(Arc::new(transport))
//!     .navigator(Arc::new(RecordingNavigator::new()))
//!     .dashboard_url("http://127.0.0.1:8000/dashboard/".parse()?)
//!     .build()?;
//!
//! widget.init()?;
//! let outcome = widget.submit("Hello").await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod redirect;

pub use redirect::RedirectHandle;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Result, WidgetError};
use crate::message::{
    Clock, ERROR_REPLY, GREETING, Message, REDIRECT_NOTICE, Sender, SystemClock,
};
use crate::navigation::Navigator;
use crate::protocol::{TurnRequest, TurnResponse};
use crate::render::Renderer;
use crate::session::{MemoryFlagStore, SESSION_FLAG_KEY, SessionFlagStore};
use crate::transport::{Transport, TransportError};

/// Delay between a completing reply and the redirect notice.
pub const REDIRECT_NOTICE_DELAY: Duration = Duration::from_secs(1);

/// Delay between the redirect notice and navigation.
pub const REDIRECT_NAVIGATE_DELAY: Duration = Duration::from_secs(2);

/// What a single submission led to.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The input was empty after trimming; nothing happened.
    Ignored,
    /// The server replied and the conversation continues.
    Replied(TurnResponse),
    /// The server replied and ended the conversation; a redirect is pending.
    Completed {
        /// The final reply.
        reply: TurnResponse,
        /// The scheduled redirect.
        redirect: RedirectHandle,
    },
    /// The turn failed. The apology message was shown unless the chat was
    /// reset while the request was in flight.
    Failed(TransportError),
    /// The reply belonged to a conversation that was reset while the request
    /// was in flight. Nothing was rendered and no redirect was scheduled.
    Stale(TurnResponse),
}

impl TurnOutcome {
    /// The server's reply, if one arrived.
    #[must_use]
    pub fn reply(&self) -> Option<&TurnResponse> {
        match self {
            Self::Replied(reply) | Self::Completed { reply, .. } | Self::Stale(reply) => {
                Some(reply)
            }
            Self::Ignored | Self::Failed(_) => None,
        }
    }
}

/// Chat widget controller.
///
/// Cloning is cheap; clones drive the same conversation. Submissions are not
/// serialized: overlapping calls to [`submit`](Self::submit) each send their
/// own request and render their replies in arrival order.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

#[derive(Debug)]
struct WidgetInner {
    renderer: Arc<dyn Renderer>,
    transport: Arc<dyn Transport>,
    flags: Arc<dyn SessionFlagStore>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    dashboard_url: Url,
    new_session: AtomicBool,
    // Bumped on every reset; replies to older conversations are dropped.
    generation: AtomicU64,
    redirects: Mutex<Vec<AbortHandle>>,
}

impl WidgetInner {
    fn say(&self, sender: Sender, text: &str) {
        let message = Message::new(sender, text, self.clock.as_ref());
        self.renderer.append_message(&message);
        self.renderer.scroll_to_bottom();
    }

    fn redirects(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.redirects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatWidget {
    /// Start building a widget.
    pub fn builder() -> ChatWidgetBuilder {
        ChatWidgetBuilder::default()
    }

    /// Run the on-load sequence.
    ///
    /// Reads the session flag to decide whether the next request starts a
    /// new server-side conversation, marks the session active, greets the
    /// user if the list is empty and focuses the input.
    pub fn init(&self) -> Result<()> {
        let inner = &self.inner;
        let is_new = !inner.flags.contains(SESSION_FLAG_KEY)?;
        inner.new_session.store(is_new, Ordering::SeqCst);
        if is_new {
            inner.flags.set(SESSION_FLAG_KEY, "true")?;
        }

        if inner.renderer.is_empty() {
            inner.say(Sender::Bot, GREETING);
        }
        inner.renderer.focus_input();

        info!(name: "chat.widget.init", new_session = is_new, "Chat widget initialized");
        Ok(())
    }

    /// Submit user input.
    ///
    /// Whitespace-only input is ignored. Otherwise the user's message and a
    /// typing indicator are shown, the turn is sent, and the reply (or the
    /// apology on failure) replaces the indicator.
    pub async fn submit(&self, raw_input: &str) -> TurnOutcome {
        let text = raw_input.trim();
        if text.is_empty() {
            debug!("ignoring empty submission");
            return TurnOutcome::Ignored;
        }

        let inner = &self.inner;
        inner.say(Sender::User, text);
        inner.renderer.clear_input();
        inner.renderer.show_typing_indicator();
        inner.renderer.scroll_to_bottom();

        let generation = inner.generation.load(Ordering::SeqCst);
        let request = TurnRequest::new(text, inner.new_session.load(Ordering::SeqCst));
        info!(
            name: "chat.turn.sent",
            new_session = request.new_session,
            chars = text.chars().count(),
            "Sending chat turn"
        );

        let result = inner.transport.send_turn(&request).await;

        if inner.generation.load(Ordering::SeqCst) != generation {
            info!(
                name: "chat.turn.stale",
                ok = result.is_ok(),
                "Dropping reply to a conversation that was reset"
            );
            return match result {
                Ok(reply) => TurnOutcome::Stale(reply),
                Err(error) => TurnOutcome::Failed(error),
            };
        }

        match result {
            Ok(reply) => {
                inner.renderer.hide_typing_indicator();
                inner.say(Sender::Bot, &reply.message);
                inner.new_session.store(false, Ordering::SeqCst);

                if reply.complete {
                    info!(name: "chat.turn.complete", "Conversation complete, redirect scheduled");
                    let redirect = self.schedule_redirect();
                    TurnOutcome::Completed { reply, redirect }
                } else {
                    TurnOutcome::Replied(reply)
                }
            }
            Err(error) => {
                warn!(name: "chat.turn.failed", error = %error, "Chat turn failed");
                inner.renderer.hide_typing_indicator();
                inner.say(Sender::Bot, ERROR_REPLY);
                TurnOutcome::Failed(error)
            }
        }
    }

    /// Start over: forget the session flag, clear the list and greet again.
    ///
    /// Any redirect still pending from a completed conversation is cancelled,
    /// and replies to requests still in flight are dropped when they arrive.
    pub fn start_new_chat(&self) -> Result<()> {
        let inner = &self.inner;
        inner.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_redirects();

        inner.flags.remove(SESSION_FLAG_KEY)?;
        inner.renderer.clear_messages();
        inner.say(Sender::Bot, GREETING);
        inner.new_session.store(true, Ordering::SeqCst);

        info!(name: "chat.widget.reset", "Started a new chat");
        Ok(())
    }

    /// Cancel every pending redirect.
    pub fn shutdown(&self) {
        self.cancel_redirects();
    }

    /// Whether the next request will ask the server for a new conversation.
    #[must_use]
    pub fn is_new_session(&self) -> bool {
        self.inner.new_session.load(Ordering::SeqCst)
    }

    /// Number of redirects that have neither navigated nor been cancelled.
    #[must_use]
    pub fn pending_redirects(&self) -> usize {
        let mut redirects = self.inner.redirects();
        redirects.retain(|handle| !handle.is_finished());
        redirects.len()
    }

    /// Dashboard the widget redirects to.
    #[must_use]
    pub fn dashboard_url(&self) -> &Url {
        &self.inner.dashboard_url
    }

    fn schedule_redirect(&self) -> RedirectHandle {
        let inner = Arc::clone(&self.inner);
        let handle = RedirectHandle::new(tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_NOTICE_DELAY).await;
            inner.say(Sender::Bot, REDIRECT_NOTICE);

            tokio::time::sleep(REDIRECT_NAVIGATE_DELAY).await;
            info!(name: "chat.redirect", url = %inner.dashboard_url, "Navigating to dashboard");
            inner.navigator.navigate(&inner.dashboard_url);
        }));

        let mut redirects = self.inner.redirects();
        redirects.retain(|h| !h.is_finished());
        redirects.push(handle.abort_handle());
        handle
    }

    fn cancel_redirects(&self) {
        let mut redirects = self.inner.redirects();
        for handle in redirects.drain(..) {
            if !handle.is_finished() {
                debug!("cancelling pending redirect");
                handle.abort();
            }
        }
    }
}

/// Builder for [`ChatWidget`].
///
/// The renderer, transport, navigator and dashboard URL are required. The
/// flag store defaults to an in-memory store and the clock to the system
/// clock.
#[derive(Debug, Default)]
pub struct ChatWidgetBuilder {
    renderer: Option<Arc<dyn Renderer>>,
    transport: Option<Arc<dyn Transport>>,
    flags: Option<Arc<dyn SessionFlagStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    clock: Option<Arc<dyn Clock>>,
    dashboard_url: Option<Url>,
}

impl ChatWidgetBuilder {
    /// Set the renderer.
    #[must_use]
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Set the transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the session flag store.
    #[must_use]
    pub fn flags(mut self, flags: Arc<dyn SessionFlagStore>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Set the navigator.
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Set the clock used to stamp messages.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the dashboard URL.
    #[must_use]
    pub fn dashboard_url(mut self, url: Url) -> Self {
        self.dashboard_url = Some(url);
        self
    }

    /// Build the widget. Does not run [`ChatWidget::init`].
    pub fn build(self) -> Result<ChatWidget> {
        let renderer = self
            .renderer
            .ok_or(WidgetError::MissingComponent("renderer"))?;
        let transport = self
            .transport
            .ok_or(WidgetError::MissingComponent("transport"))?;
        let navigator = self
            .navigator
            .ok_or(WidgetError::MissingComponent("navigator"))?;
        let dashboard_url = self
            .dashboard_url
            .ok_or(WidgetError::MissingComponent("dashboard_url"))?;

        Ok(ChatWidget {
            inner: Arc::new(WidgetInner {
                renderer,
                transport,
                flags: self
                    .flags
                    .unwrap_or_else(|| Arc::new(MemoryFlagStore::new())),
                navigator,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                dashboard_url,
                new_session: AtomicBool::new(true),
                generation: AtomicU64::new(0),
                redirects: Mutex::new(Vec::new()),
            }),
        })
    }
}
