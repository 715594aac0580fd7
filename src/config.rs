//! Layered configuration for the chat client.
//!
//! Priority, lowest first: built-in defaults, YAML file, `POBOT_*`
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

use crate::render::SenderLabels;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "pobot.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chat server
    #[arg(long, env = "POBOT_BASE_URL")]
    pub base_url: Option<String>,

    /// File used to remember the active chat session
    #[arg(long, env = "POBOT_STATE_FILE")]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub chat_path: String,
    pub dashboard_path: String,
    /// Per-request timeout; `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Persist the session flag here; in memory when unset.
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub user_name: String,
    pub bot_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `text` or `json`.
    pub format: String,
}

impl ServerConfig {
    fn join(&self, path: &str) -> Result<Url, config::ConfigError> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            config::ConfigError::Message(format!("invalid server.base_url: {e}"))
        })?;
        base.join(path)
            .map_err(|e| config::ConfigError::Message(format!("invalid path {path:?}: {e}")))
    }

    /// Absolute URL turns are posted to.
    pub fn chat_url(&self) -> Result<Url, config::ConfigError> {
        self.join(&self.chat_path)
    }

    /// Absolute URL of the dashboard.
    pub fn dashboard_url(&self) -> Result<Url, config::ConfigError> {
        self.join(&self.dashboard_path)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl UiConfig {
    #[must_use]
    pub fn labels(&self) -> SenderLabels {
        SenderLabels {
            user: self.user_name.clone(),
            bot: self.bot_name.clone(),
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl WidgetConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.base_url", "http://127.0.0.1:8000")?
            .set_default("server.chat_path", "/chat/message/")?
            .set_default("server.dashboard_path", "/dashboard/")?
            .set_default("ui.user_name", "You")?
            .set_default("ui.bot_name", "PoBot")?
            .set_default("log.format", "text")?;

        // An explicit file must exist; the working-directory fallback is optional.
        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::new(path, FileFormat::Yaml).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml));
            }
            None => {}
        }

        // E.g. POBOT_SERVER__BASE_URL=http://chat.example.org
        builder = builder.add_source(
            Environment::with_prefix("POBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.base_url {
            builder = builder.set_override("server.base_url", url.as_str())?;
        }
        if let Some(path) = &cli.state_file {
            builder = builder
                .set_override("session.state_file", path.to_string_lossy().into_owned())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Fail early on unusable URLs.
        cfg.server.chat_url()?;
        cfg.server.dashboard_url()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let server = ServerConfig {
            base_url: "http://chat.example.org".to_string(),
            chat_path: "/chat/message/".to_string(),
            dashboard_path: "/dashboard/".to_string(),
            request_timeout_secs: Some(30),
        };
        assert_eq!(
            server.chat_url().unwrap().as_str(),
            "http://chat.example.org/chat/message/"
        );
        assert_eq!(
            server.dashboard_url().unwrap().as_str(),
            "http://chat.example.org/dashboard/"
        );
        assert_eq!(server.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let server = ServerConfig {
            base_url: "not a url".to_string(),
            chat_path: "/chat/message/".to_string(),
            dashboard_path: "/dashboard/".to_string(),
            request_timeout_secs: None,
        };
        assert!(server.chat_url().is_err());
    }

    #[test]
    fn ui_settings() {
        let ui = UiConfig {
            user_name: "Worker".to_string(),
            bot_name: "PoBot".to_string(),
        };
        assert_eq!(ui.labels().user, "Worker");
        assert_eq!(ui.labels().bot, "PoBot");
    }
}
