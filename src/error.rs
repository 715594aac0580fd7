//! Widget-level error type.

use thiserror::Error;

use crate::session::StoreError;

/// Errors returned by widget lifecycle operations.
///
/// Turn failures are not represented here: they are shown to the user and
/// reported through [`TurnOutcome::Failed`](crate::widget::TurnOutcome::Failed).
#[derive(Error, Debug)]
pub enum WidgetError {
    /// The session flag store failed.
    #[error("Session flag store error: {0}")]
    Store(#[from] StoreError),

    /// A required collaborator was not supplied to the builder.
    #[error("Missing widget component: {0}")]
    MissingComponent(&'static str),
}

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
