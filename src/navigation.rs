//! Page navigation.

use std::sync::{Arc, Mutex, PoisonError};

use url::Url;

/// Moves the host away from the chat page.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    /// Navigate to `url`.
    fn navigate(&self, url: &Url);
}

/// Navigator that only records where it was sent.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<Url>>>,
}

impl RecordingNavigator {
    /// Create a navigator with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL navigated to, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<Url> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &Url) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());
    }
}
