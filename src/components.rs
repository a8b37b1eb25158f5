//! Host-facing adapters over the shared whole-body model.
//!
//! # Component structure
//!
//! Every component implements [`ModelComponent`]. The trait splits a host
//! call into two phases:
//!
//! 1. [`allocate_return_space`](ModelComponent::allocate_return_space) sizes
//!    the outputs and reserves placeholders in a per-call [`ReturnSpace`].
//! 2. [`compute`](ModelComponent::compute) (or the reduced-validation
//!    [`compute_fast`](ModelComponent::compute_fast)) validates the inputs,
//!    calls the backend, and writes into the reserved slots.
//!
//! Concrete components only describe *what* they need and produce
//! ([`input_specs`](ModelComponent::input_specs),
//! [`output_shapes`](ModelComponent::output_shapes)) and how to serve a
//! validated call ([`run`](ModelComponent::run)). The protocol checks live in
//! the provided methods, so no component can skip them.
//!
//! Instances are created and torn down by a [`ComponentRegistry`], which keeps
//! at most one live instance per [`ComponentKind`].

mod error;
mod forward_kinematics;
mod generalised_forces;
mod get_state;
mod initialise;
mod jacobian;
mod joint_limits;
mod kind;
mod mass_matrix;
mod model;
mod registry;
mod return_space;
mod update_state;
mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ArgumentError, ComponentError, ErrorCategory, LifecycleError, ProtocolError};
pub use forward_kinematics::ForwardKinematics;
pub use generalised_forces::GeneralisedForces;
pub use get_state::GetState;
pub use initialise::ModelInitialise;
pub use jacobian::Jacobian;
pub use joint_limits::JointLimitsQuery;
pub use kind::{ComponentKind, Signature};
pub use mass_matrix::MassMatrix;
pub use model::ComponentModel;
pub use registry::{ComponentInstance, ComponentRegistry, InstanceId, RegistryConfig};
pub use return_space::ReturnSpace;
pub use update_state::UpdateState;
pub use validation::{FastPathChecks, InputSpec, ValidationConfig};

use tracing::debug;

use crate::support::{
    backend::{ModelHandle, SharedModel},
    host::{HostArray, Shape},
};

use validation::Mode;

/// State every component carries: the shared model and its validation settings.
#[derive(Debug)]
pub struct ComponentBase<B> {
    handle: ModelHandle<B>,
    validation: ValidationConfig,
}

impl<B> ComponentBase<B> {
    #[must_use]
    pub fn new(handle: ModelHandle<B>, validation: ValidationConfig) -> Self {
        Self { handle, validation }
    }

    /// The shared whole-body model this component adapts.
    #[must_use]
    pub fn handle(&self) -> &ModelHandle<B> {
        &self.handle
    }

    #[must_use]
    pub fn validation(&self) -> ValidationConfig {
        self.validation
    }
}

/// A unit of work invocable from the host environment.
///
/// Implementors provide the component-specific parts; the allocate/compute
/// protocol itself is implemented once, in the provided methods.
pub trait ModelComponent<B> {
    /// Which component this is.
    fn kind(&self) -> ComponentKind;

    /// Shared bookkeeping: the model handle and validation settings.
    fn base(&self) -> &ComponentBase<B>;

    /// Expected input at each position, for the currently loaded model.
    ///
    /// # Errors
    ///
    /// Returns an error if the specs depend on backend state that is not
    /// available (typically [`BackendError::NotLoaded`](crate::support::backend::BackendError::NotLoaded)).
    fn input_specs(&self, model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError>;

    /// Shape of every output this component can produce, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if sizing requires backend state that is not available.
    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError>;

    /// Serves a call whose inputs have already been validated.
    ///
    /// Implementations write only the outputs for which
    /// [`ReturnSpace::requested`] holds.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the inputs, the backend call, or writing
    /// the outputs fails.
    fn run(
        &self,
        model: &mut SharedModel<B>,
        inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError>;

    /// Reserves `nargout` output placeholders in `space`.
    ///
    /// Does not run the computation. Calling it again before compute installs
    /// the same shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TooManyOutputs`] if `nargout` exceeds the
    /// component's outputs, or a backend error if sizing needs a model that is
    /// not loaded.
    fn allocate_return_space(
        &self,
        nargout: usize,
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let kind = self.kind();
        let max = kind.signature().max_outputs;
        if nargout > max {
            return Err(ArgumentError::TooManyOutputs {
                requested: nargout,
                max,
            }
            .into());
        }

        let mut shapes = {
            let model = self.base().handle().lock()?;
            self.output_shapes(&model)?
        };
        shapes.truncate(nargout);

        debug!(%kind, nargout, "reserved return space");
        space.reserve(kind, shapes);
        Ok(())
    }

    /// Validates `inputs` fully and serves the call into `space`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if `space` is not freshly reserved by this
    /// component, an [`ArgumentError`] if the inputs are malformed (the backend
    /// is not touched), or a backend error if the backend call fails.
    fn compute(&self, inputs: &[HostArray], space: &mut ReturnSpace) -> Result<(), ComponentError> {
        execute::<B, Self>(self, inputs, space, Mode::Full)
    }

    /// Like [`compute`](Self::compute), with the reduced validation described
    /// in [`FastPathChecks`].
    ///
    /// # Errors
    ///
    /// Same as [`compute`](Self::compute), except that the optional checks
    /// disabled in the registry's [`ValidationConfig`] are skipped.
    fn compute_fast(
        &self,
        inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let mode = Mode::Fast(self.base().validation().fast);
        execute::<B, Self>(self, inputs, space, mode)
    }
}

fn execute<B, C>(
    component: &C,
    inputs: &[HostArray],
    space: &mut ReturnSpace,
    mode: Mode,
) -> Result<(), ComponentError>
where
    C: ModelComponent<B> + ?Sized,
{
    let kind = component.kind();
    space.ensure_reserved_for(kind)?;

    let signature = kind.signature();
    if !signature.accepts_inputs(inputs.len()) {
        return Err(ArgumentError::InputCount {
            min: signature.min_inputs,
            max: signature.max_inputs,
            found: inputs.len(),
        }
        .into());
    }

    let mut model = component.base().handle().lock()?;
    let specs = component.input_specs(&model)?;
    validation::check_inputs(&specs, inputs, mode)?;

    component.run(&mut model, inputs, space)?;
    space.complete();

    debug!(
        %kind,
        nargin = inputs.len(),
        fast = matches!(mode, Mode::Fast(_)),
        mutated = kind.mutates_model(),
        "computed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::support::backend::BackendError;

    use test_support::{ScriptedBackend, loaded_registry};

    #[test]
    fn compute_before_allocate_fails() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();

        let mut space = ReturnSpace::new();
        let error = component.compute(&[], &mut space).unwrap_err();

        assert!(matches!(
            error,
            ComponentError::Protocol(ProtocolError::NotReserved)
        ));
        assert_eq!(space.nargout(), 0);
    }

    #[test]
    fn compute_into_another_components_space_fails() {
        let mut registry = loaded_registry();
        let get_state = registry.get_instance(ComponentKind::GetState).unwrap();
        let initialise = registry.get_instance(ComponentKind::Initialise).unwrap();
        let mass_matrix = registry.get_instance(ComponentKind::MassMatrix).unwrap();

        let mut space = ReturnSpace::new();
        get_state.allocate_return_space(4, &mut space).unwrap();
        let error = initialise
            .compute(&[HostArray::text(test_support::OTHER_ROBOT)], &mut space)
            .unwrap_err();

        assert!(matches!(
            error,
            ComponentError::Protocol(ProtocolError::ForeignReservation {
                reserved_by: ComponentKind::GetState,
                kind: ComponentKind::Initialise,
            })
        ));
        assert!(space.is_reserved());
        assert_eq!(space.into_outputs(), Err(ProtocolError::NotComputed));

        let mut space = ReturnSpace::new();
        initialise.allocate_return_space(0, &mut space).unwrap();
        assert!(mass_matrix.compute(&[], &mut space).is_err());
        assert!(!space.is_computed());

        let model = registry.backend().unwrap().lock().unwrap();
        assert_eq!(model.backend.robot(), Some(test_support::ROBOT));
        assert_eq!(model.backend.loads(), 0);
    }

    #[test]
    fn compute_twice_without_reallocating_fails() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::JointLimits).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(2, &mut space).unwrap();
        component.compute(&[], &mut space).unwrap();

        let error = component.compute(&[], &mut space).unwrap_err();
        assert!(matches!(
            error,
            ComponentError::Protocol(ProtocolError::AlreadyComputed)
        ));
    }

    #[test]
    fn too_many_outputs_fails() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::JointLimits).unwrap();

        let mut space = ReturnSpace::new();
        let error = component.allocate_return_space(3, &mut space).unwrap_err();

        assert!(matches!(
            error,
            ComponentError::Argument(ArgumentError::TooManyOutputs {
                requested: 3,
                max: 2
            })
        ));
        assert!(!space.is_reserved());
    }

    #[test]
    fn allocation_installs_exactly_nargout_placeholders() {
        let mut registry = loaded_registry();
        let dof = registry.backend().unwrap().dof().unwrap();
        let component = registry.get_instance(ComponentKind::GetState).unwrap();

        for nargout in 0..=4 {
            let mut space = ReturnSpace::new();
            component.allocate_return_space(nargout, &mut space).unwrap();
            assert_eq!(space.nargout(), nargout);
            assert_eq!(space.outputs().len(), nargout);
        }

        let mut space = ReturnSpace::new();
        component.allocate_return_space(4, &mut space).unwrap();
        assert_eq!(
            space.shapes(),
            [
                Shape::column(dof),
                Shape::column(dof),
                Shape::column(6),
                Shape::column(3)
            ]
        );
    }

    #[test]
    fn allocation_is_idempotent() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        let first = space.shapes().to_vec();
        component.allocate_return_space(1, &mut space).unwrap();

        assert_eq!(space.shapes(), first);
        assert_eq!(space.outputs(), [HostArray::zeros(first[0])]);
    }

    #[test]
    fn allocation_needs_a_loaded_model_for_sizing() {
        let mut registry = test_support::registry(ScriptedBackend::new());
        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();

        let mut space = ReturnSpace::new();
        let error = component.allocate_return_space(1, &mut space).unwrap_err();
        assert!(matches!(
            error,
            ComponentError::Backend(BackendError::NotLoaded)
        ));
    }

    #[test]
    fn missing_inputs_fail_before_the_backend_is_touched() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::Jacobian).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        let error = component.compute(&[], &mut space).unwrap_err();

        assert!(matches!(
            error,
            ComponentError::Argument(ArgumentError::InputCount {
                min: 1,
                max: 1,
                found: 0
            })
        ));
        assert!(space.is_reserved());
        assert!(!space.is_written(0));
        assert_eq!(space.outputs()[0], HostArray::zeros(space.shapes()[0]));

        let model = registry.backend().unwrap().lock().unwrap();
        assert_eq!(model.backend.queries(), 0);
    }

    #[test]
    fn failed_compute_can_be_retried() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::Jacobian).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        assert!(component.compute(&[], &mut space).is_err());

        component
            .compute(&[HostArray::text("l_sole")], &mut space)
            .unwrap();
        assert!(space.is_written(0));
    }

    #[test]
    fn fast_path_skips_orientation_checks_only() {
        let mut registry = loaded_registry();
        let dof = registry.backend().unwrap().dof().unwrap();
        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();
        let row = HostArray::Real(nalgebra::DMatrix::zeros(1, dof));

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        assert!(component.compute(&[row.clone()], &mut space).is_err());
        component.compute_fast(&[row], &mut space).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        let short = HostArray::column(&vec![0.0; dof - 1]);
        let error = component.compute_fast(&[short], &mut space).unwrap_err();
        assert!(matches!(
            error,
            ComponentError::Argument(ArgumentError::InputLength { .. })
        ));
    }
}
