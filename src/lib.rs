//! PoBot chat widget
//!
//! A chat widget controller that relays user input to a server chat
//! endpoint, renders both sides of the conversation, and hands the user off
//! to a dashboard once the server reports the conversation complete.
//!
//! # Architecture
//!
//! - **Widget**: host-independent controller driving injected collaborators
//! - **Transport**: JSON over HTTP via `reqwest`, cookie session preserved
//! - **Rendering**: HTML fragments mirroring the page markup, or terminal lines
//! - **Session flag**: presence marker in a session-scoped key/value store
//!
//! # Modules
//!
//! - [`widget`]: the [`ChatWidget`](widget::ChatWidget) controller
//! - [`transport`]: chat endpoint client
//! - [`render`]: renderer trait and implementations
//! - [`session`]: session flag stores
//! - [`navigation`]: dashboard navigation
//! - [`message`]: message model and clocks
//! - [`protocol`]: wire types
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]

pub mod config;
pub mod error;
pub mod message;
pub mod navigation;
pub mod protocol;
pub mod render;
pub mod session;
pub mod transport;
pub mod widget;

pub use error::WidgetError;
pub use widget::{ChatWidget, TurnOutcome};
