use crate::support::host::{HostArray, Shape};

use super::{ComponentKind, ProtocolError};

/// Where a single invocation stands in the allocate/compute protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Unreserved,
    Reserved,
    Computed,
}

/// Per-invocation output storage.
///
/// A `ReturnSpace` starts empty. [`allocate_return_space`] reserves one
/// zero-filled placeholder per requested output and records its shape;
/// [`compute`] then overwrites the placeholders. Writes are checked against
/// the recorded shapes, and compute refuses to run on a space that was never
/// reserved, was already computed, or was reserved by another component.
///
/// A failed compute leaves the space reserved with its placeholders intact,
/// so the same call can be retried with corrected inputs.
///
/// [`allocate_return_space`]: super::ModelComponent::allocate_return_space
/// [`compute`]: super::ModelComponent::compute
#[derive(Debug, Clone, Default)]
pub struct ReturnSpace {
    phase: Phase,
    reserved_by: Option<ComponentKind>,
    shapes: Vec<Shape>,
    slots: Vec<HostArray>,
    written: Vec<bool>,
}

impl ReturnSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once return space is reserved and not yet computed.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.phase == Phase::Reserved
    }

    /// Returns `true` once compute has completed.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.phase == Phase::Computed
    }

    /// The component whose allocation installed the current slots.
    #[must_use]
    pub fn reserved_by(&self) -> Option<ComponentKind> {
        self.reserved_by
    }

    /// Number of reserved output slots.
    #[must_use]
    pub fn nargout(&self) -> usize {
        self.shapes.len()
    }

    /// Reserved shape of every slot.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Current slot contents: placeholders until compute writes them.
    #[must_use]
    pub fn outputs(&self) -> &[HostArray] {
        &self.slots
    }

    /// Returns `true` if compute wrote slot `index`.
    #[must_use]
    pub fn is_written(&self, index: usize) -> bool {
        self.written.get(index).copied().unwrap_or(false)
    }

    /// Takes the computed outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotComputed`] unless compute completed.
    pub fn into_outputs(self) -> Result<Vec<HostArray>, ProtocolError> {
        if self.phase != Phase::Computed {
            return Err(ProtocolError::NotComputed);
        }
        Ok(self.slots)
    }

    /// Returns `true` if the caller asked for output `index`.
    ///
    /// Components skip work for outputs that were not requested.
    #[must_use]
    pub fn requested(&self, index: usize) -> bool {
        index < self.shapes.len()
    }

    /// Installs placeholders for `shapes`, starting a new invocation.
    pub(crate) fn reserve(&mut self, kind: ComponentKind, shapes: Vec<Shape>) {
        self.reserved_by = Some(kind);
        self.slots = shapes.iter().map(|shape| HostArray::zeros(*shape)).collect();
        self.written = vec![false; shapes.len()];
        self.shapes = shapes;
        self.phase = Phase::Reserved;
    }

    /// Checks that compute may run on this space.
    pub(crate) fn ensure_reserved(&self) -> Result<(), ProtocolError> {
        match self.phase {
            Phase::Reserved => Ok(()),
            Phase::Unreserved => Err(ProtocolError::NotReserved),
            Phase::Computed => Err(ProtocolError::AlreadyComputed),
        }
    }

    /// Checks that `kind` may compute into this space.
    pub(crate) fn ensure_reserved_for(&self, kind: ComponentKind) -> Result<(), ProtocolError> {
        self.ensure_reserved()?;
        match self.reserved_by {
            Some(reserved_by) if reserved_by != kind => {
                Err(ProtocolError::ForeignReservation { reserved_by, kind })
            }
            _ => Ok(()),
        }
    }

    /// Writes one output into its reserved slot.
    pub(crate) fn write(
        &mut self,
        index: usize,
        value: impl Into<HostArray>,
    ) -> Result<(), ProtocolError> {
        self.ensure_reserved()?;

        let Some(expected) = self.shapes.get(index).copied() else {
            return Err(ProtocolError::Unreserved {
                index,
                reserved: self.shapes.len(),
            });
        };

        let value = value.into();
        let found = value.shape();
        if found != expected {
            return Err(ProtocolError::ShapeMismatch {
                index,
                expected,
                found,
            });
        }

        self.slots[index] = value;
        self.written[index] = true;
        Ok(())
    }

    /// Marks the invocation as computed.
    pub(crate) fn complete(&mut self) {
        self.phase = Phase::Computed;
    }
}
