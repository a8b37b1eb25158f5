use thiserror::Error;

use crate::support::{
    backend::BackendError,
    host::{ArrayKind, Shape},
};

use super::ComponentKind;

/// Errors returned by component lifecycle and invocation calls.
///
/// Nothing is retried internally. Callers recover by re-invoking with
/// corrected arguments, or by deleting and re-creating the instance.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The component instance could not be created.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// The allocate/compute protocol was violated.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The host passed arguments the component cannot accept.
    #[error("argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// The whole-body model failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// The broad class of a [`ComponentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Lifecycle,
    Protocol,
    Argument,
    Backend,
}

impl ComponentError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            ComponentError::Lifecycle(_) => ErrorCategory::Lifecycle,
            ComponentError::Protocol(_) => ErrorCategory::Protocol,
            ComponentError::Argument(_) => ErrorCategory::Argument,
            ComponentError::Backend(_) => ErrorCategory::Backend,
        }
    }
}

/// Errors raised while creating a component instance.
///
/// A failed construction never leaves an instance behind.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No whole-body model is attached to the registry.
    #[error("no whole-body model attached for {kind}")]
    BackendUnavailable { kind: ComponentKind },

    /// The component's one-time setup against the backend failed.
    #[error("setup of {kind} failed")]
    Setup {
        kind: ComponentKind,

        #[source]
        source: BackendError,
    },
}

/// Violations of the two-phase allocate/compute protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Compute was called without a prior return-space allocation.
    #[error("return space must be allocated before compute")]
    NotReserved,

    /// Compute already ran for this allocation.
    #[error("return space was already computed; allocate again for a new call")]
    AlreadyComputed,

    /// Outputs were requested before compute completed.
    #[error("outputs are not available until compute completes")]
    NotComputed,

    /// Compute was called on a space another component reserved.
    #[error("return space was allocated by {reserved_by}, not {kind}")]
    ForeignReservation {
        reserved_by: ComponentKind,
        kind: ComponentKind,
    },

    /// A write targeted a slot that was not reserved.
    #[error("output {index} is not reserved ({reserved} slots)")]
    Unreserved { index: usize, reserved: usize },

    /// A write did not match the shape reserved for its slot.
    #[error("output {index} was reserved as {expected}, got {found}")]
    ShapeMismatch {
        index: usize,
        expected: Shape,
        found: Shape,
    },
}

/// Malformed output requests or input arrays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("requested {requested} outputs, at most {max} are available")]
    TooManyOutputs { requested: usize, max: usize },

    #[error("expected {min} to {max} inputs, got {found}")]
    InputCount {
        min: usize,
        max: usize,
        found: usize,
    },

    #[error("input {index} is missing")]
    MissingInput { index: usize },

    #[error("input {index} must be a {expected} array, got {found}")]
    InputKind {
        index: usize,
        expected: ArrayKind,
        found: ArrayKind,
    },

    #[error("input {index} must be {expected}, got {found}")]
    InputShape {
        index: usize,
        expected: Shape,
        found: Shape,
    },

    #[error("input {index} must have {expected} elements, got {found}")]
    InputLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("input {index} contains non-finite values")]
    NonFinite { index: usize },

    #[error("input {index} is not a valid frame index")]
    InvalidIndex { index: usize },
}
