use pobot_chat::config::WidgetConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    // SAFETY: tests touching the environment are serialized with #[serial].
    unsafe {
        env::remove_var("POBOT_SERVER__BASE_URL");
        env::remove_var("POBOT_SERVER__REQUEST_TIMEOUT_SECS");
        env::remove_var("POBOT_UI__BOT_NAME");
        env::remove_var("POBOT_BASE_URL");
        env::remove_var("POBOT_STATE_FILE");
        env::remove_var("CONFIG_FILE");
    }
}

fn load(args: &[&str]) -> WidgetConfig {
    let argv = std::iter::once("pobot-chat").chain(args.iter().copied());
    WidgetConfig::load_from_args(argv).expect("Failed to load config")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
    assert_eq!(
        config.server.chat_url().unwrap().as_str(),
        "http://127.0.0.1:8000/chat/message/"
    );
    assert_eq!(
        config.server.dashboard_url().unwrap().as_str(),
        "http://127.0.0.1:8000/dashboard/"
    );
    assert!(config.server.request_timeout().is_none());
    assert!(config.session.state_file.is_none());
    assert_eq!(config.ui.user_name, "You");
    assert_eq!(config.ui.bot_name, "PoBot");
    assert!(!config.log.is_json());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    // SAFETY: serialized test.
    unsafe {
        env::set_var("POBOT_SERVER__BASE_URL", "http://chat.example.org");
        env::set_var("POBOT_SERVER__REQUEST_TIMEOUT_SECS", "15");
        env::set_var("POBOT_UI__BOT_NAME", "Helper");
    }

    let config = load(&[]);
    assert_eq!(
        config.server.chat_url().unwrap().as_str(),
        "http://chat.example.org/chat/message/"
    );
    assert_eq!(config.server.request_timeout_secs, Some(15));
    assert_eq!(config.ui.bot_name, "Helper");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("chat.yaml");
    fs::write(
        &file_path,
        r#"
server:
  base_url: "http://files.example.org"
  dashboard_path: "/home/"
log:
  format: json
"#,
    )
    .expect("Failed to write temp config");

    // SAFETY: serialized test.
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = load(&[]);
    assert_eq!(
        config.server.dashboard_url().unwrap().as_str(),
        "http://files.example.org/home/"
    );
    // Unset keys keep their defaults.
    assert_eq!(config.server.chat_path, "/chat/message/");
    assert!(config.log.is_json());

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env_and_file() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("chat.yaml");
    fs::write(&file_path, "server:\n  base_url: \"http://file.example.org\"\n").unwrap();

    // SAFETY: serialized test.
    unsafe {
        env::set_var("POBOT_SERVER__BASE_URL", "http://env.example.org");
    }

    let config = load(&[
        "--config",
        file_path.to_str().unwrap(),
        "--base-url",
        "http://cli.example.org",
        "--state-file",
        "/tmp/pobot-session.json",
    ]);
    assert_eq!(config.server.base_url, "http://cli.example.org");
    assert_eq!(
        config.session.state_file,
        Some(PathBuf::from("/tmp/pobot-session.json"))
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_fails() {
    clear_env_vars();

    let result = WidgetConfig::load_from_args(["pobot-chat", "--config", "/nonexistent/pobot.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_base_url_fails() {
    clear_env_vars();

    let result = WidgetConfig::load_from_args(["pobot-chat", "--base-url", "not a url"]);
    assert!(result.is_err());
}
