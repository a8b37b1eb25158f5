use std::sync::PoisonError;

use thiserror::Error;

/// Errors reported by a [`WholeBodyModel`](super::WholeBodyModel) or while
/// accessing it through a [`ModelHandle`](super::ModelHandle).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// A query was issued before any robot was loaded.
    #[error("whole-body model is not loaded")]
    NotLoaded,

    /// No robot description exists under the requested name.
    #[error("unknown robot: {robot}")]
    UnknownRobot { robot: String },

    /// The kinematic tree has no frame with the requested name or index.
    #[error("unknown frame: {frame}")]
    UnknownFrame { frame: String },

    /// A previous caller panicked while holding the model lock.
    #[error("whole-body model lock poisoned")]
    Poisoned,

    /// The backend call itself failed.
    #[error("whole-body model call failed: {context}")]
    Failed {
        /// Operation context for the failure.
        context: String,

        /// Underlying backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BackendError {
    /// Wraps an implementation-specific error with operation context.
    pub fn failed(
        context: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            context: context.into(),
            source: Box::new(err),
        }
    }
}

impl<T> From<PoisonError<T>> for BackendError {
    fn from(_: PoisonError<T>) -> Self {
        BackendError::Poisoned
    }
}
