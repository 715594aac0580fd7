//! PoBot chat client
//!
//! Terminal front end for the chat widget: every stdin line is submitted as
//! one turn. `/new` starts a new chat, `/quit` exits.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use pobot_chat::config::{LogConfig, WidgetConfig};
use pobot_chat::navigation::Navigator;
use pobot_chat::render::TerminalRenderer;
use pobot_chat::session::{FileFlagStore, MemoryFlagStore, SessionFlagStore};
use pobot_chat::transport::HttpTransport;
use pobot_chat::widget::ChatWidget;

/// Ends the session when the widget navigates to the dashboard.
#[derive(Debug)]
struct ExitNavigator {
    done: CancellationToken,
}

impl Navigator for ExitNavigator {
    fn navigate(&self, url: &Url) {
        println!("Conversation finished. Continue at {url}");
        self.done.cancel();
    }
}

fn init_tracing(log: &LogConfig) {
    // Logs go to stderr; stdout carries the conversation.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if log.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = WidgetConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    let chat_url = config.server.chat_url()?;
    let dashboard_url = config.server.dashboard_url()?;
    info!(
        name: "chat.config.loaded",
        chat_url = %chat_url,
        dashboard_url = %dashboard_url,
        "Chat client configuration loaded"
    );

    let transport = HttpTransport::new(chat_url, config.server.request_timeout())
        .context("Failed to build HTTP client")?;
    let flags: Arc<dyn SessionFlagStore> = match &config.session.state_file {
        Some(path) => Arc::new(FileFlagStore::new(path)),
        None => Arc::new(MemoryFlagStore::new()),
    };
    let done = CancellationToken::new();

    let widget = ChatWidget::builder()
        .renderer(Arc::new(TerminalRenderer::stdout(config.ui.labels())))
        .transport(Arc::new(transport))
        .flags(flags)
        .navigator(Arc::new(ExitNavigator { done: done.clone() }))
        .dashboard_url(dashboard_url)
        .build()?;
    widget.init()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut turns = JoinSet::new();

    loop {
        tokio::select! {
            () = done.cancelled() => break,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "/quit" => {
                        widget.shutdown();
                        return Ok(());
                    }
                    "/new" => widget.start_new_chat()?,
                    _ => {
                        let widget = widget.clone();
                        turns.spawn(async move { widget.submit(&line).await });
                    }
                }
            }
            Some(joined) = turns.join_next(), if !turns.is_empty() => {
                if let Err(e) = joined {
                    warn!(name: "chat.turn.panicked", error = %e, "Turn task failed");
                }
            }
        }
    }

    // Input closed: let in-flight turns land, then any redirect they scheduled.
    while turns.join_next().await.is_some() {}
    if widget.pending_redirects() > 0 {
        done.cancelled().await;
    }
    widget.shutdown();
    Ok(())
}
