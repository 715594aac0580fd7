//! Session-scoped flag storage.
//!
//! The widget remembers whether the current browsing session has already
//! started a conversation by keeping a single presence marker in a
//! key/value store scoped to that session. Only presence matters; the stored
//! value is never interpreted.
//!
//! # Architecture
//!
//! - [`SessionFlagStore`]: key/value interface the widget depends on
//! - [`MemoryFlagStore`]: lives as long as the process
//! - [`FileFlagStore`]: JSON file, survives restarts that share the file
//!
//! # Example
//!
//! ```rust
//! use pobot_chat::session::{MemoryFlagStore, SessionFlagStore, SESSION_FLAG_KEY};
//!
//! let store = MemoryFlagStore::new();
//! assert!(store.get(SESSION_FLAG_KEY).unwrap().is_none());
//!
//! store.set(SESSION_FLAG_KEY, "true").unwrap();
//! assert!(store.get(SESSION_FLAG_KEY).unwrap().is_some());
//! ```

mod flag;

pub use flag::{FileFlagStore, MemoryFlagStore, SessionFlagStore, StoreError};

/// Key marking that a chat session is already active.
pub const SESSION_FLAG_KEY: &str = "chatSessionActive";
