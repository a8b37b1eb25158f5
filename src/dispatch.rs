//! The host boundary.
//!
//! A host binding receives a command name, the number of outputs the caller
//! asked for and the caller's input arrays. [`Dispatcher`] maps the command to
//! its component, runs the allocate/compute protocol on a fresh
//! [`ReturnSpace`], and hands back the filled outputs.

use thiserror::Error;
use tracing::warn;

use crate::{
    components::{ComponentError, ComponentKind, ComponentRegistry, ReturnSpace},
    support::{backend::WholeBodyModel, host::HostArray},
};

/// Failure to serve a host command.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown command `{command}`")]
    UnknownCommand { command: String },

    #[error("`{command}` failed")]
    Component {
        command: &'static str,
        #[source]
        source: ComponentError,
    },
}

impl DispatchError {
    /// The component error behind this failure, if any.
    #[must_use]
    pub fn component_error(&self) -> Option<&ComponentError> {
        match self {
            DispatchError::Component { source, .. } => Some(source),
            DispatchError::UnknownCommand { .. } => None,
        }
    }
}

/// Routes host commands to the components of a registry.
///
/// # Example
///
/// ```
/// # use wbm_components::support::backend::{BackendError, FrameIndex, JointLimits, RobotState};
/// # use nalgebra::{DMatrix, DVector, Isometry3};
/// # struct Backend;
/// # impl wbm_components::WholeBodyModel for Backend {
/// #     fn load(&mut self, _: &str) -> Result<(), BackendError> { Ok(()) }
/// #     fn dof(&self) -> Option<usize> { Some(2) }
/// #     fn joint_limits(&self) -> Result<JointLimits, BackendError> {
/// #         Ok(JointLimits { lower: DVector::from_element(2, -1.0), upper: DVector::from_element(2, 1.0) })
/// #     }
/// #     fn frame_index(&self, _: &str) -> Result<FrameIndex, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn mass_matrix(&self, _: &RobotState) -> Result<DMatrix<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn generalised_bias_forces(&self, _: &RobotState) -> Result<DVector<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn jacobian(&self, _: &RobotState, _: FrameIndex) -> Result<DMatrix<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn forward_kinematics(&self, _: &RobotState, _: FrameIndex) -> Result<Isometry3<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// # }
/// use wbm_components::{ComponentRegistry, Dispatcher, RegistryConfig};
/// use wbm_components::support::backend::ModelHandle;
///
/// let registry = ComponentRegistry::with_backend(ModelHandle::new(Backend), RegistryConfig::default());
/// let mut dispatcher = Dispatcher::new(registry);
///
/// let limits = dispatcher.invoke("joint-limits", 2, &[]).unwrap();
/// assert_eq!(limits.len(), 2);
/// assert!(dispatcher.invoke("inverse-dynamics", 1, &[]).is_err());
/// ```
#[derive(Debug)]
pub struct Dispatcher<B> {
    registry: ComponentRegistry<B>,
}

impl<B: WholeBodyModel + 'static> Dispatcher<B> {
    #[must_use]
    pub fn new(registry: ComponentRegistry<B>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry<B> {
        &self.registry
    }

    /// Mutable access for lifecycle control (teardown, backend swaps).
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry<B> {
        &mut self.registry
    }

    #[must_use]
    pub fn into_registry(self) -> ComponentRegistry<B> {
        self.registry
    }

    /// Serves `command` with full input validation.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] for an unrecognised command,
    /// or [`DispatchError::Component`] if any phase of the call fails.
    pub fn invoke(
        &mut self,
        command: &str,
        nargout: usize,
        inputs: &[HostArray],
    ) -> Result<Vec<HostArray>, DispatchError> {
        self.dispatch(command, nargout, inputs, false)
    }

    /// Serves `command` through the reduced-validation path.
    ///
    /// # Errors
    ///
    /// Same as [`invoke`](Self::invoke).
    pub fn invoke_fast(
        &mut self,
        command: &str,
        nargout: usize,
        inputs: &[HostArray],
    ) -> Result<Vec<HostArray>, DispatchError> {
        self.dispatch(command, nargout, inputs, true)
    }

    fn dispatch(
        &mut self,
        command: &str,
        nargout: usize,
        inputs: &[HostArray],
        fast: bool,
    ) -> Result<Vec<HostArray>, DispatchError> {
        let Some(kind) = ComponentKind::from_command(command) else {
            warn!(command, "unknown command");
            return Err(DispatchError::UnknownCommand {
                command: command.to_string(),
            });
        };

        self.call(kind, nargout, inputs, fast).map_err(|source| {
            warn!(
                command = kind.command(),
                category = ?source.category(),
                error = %source,
                "command failed"
            );
            DispatchError::Component {
                command: kind.command(),
                source,
            }
        })
    }

    fn call(
        &mut self,
        kind: ComponentKind,
        nargout: usize,
        inputs: &[HostArray],
        fast: bool,
    ) -> Result<Vec<HostArray>, ComponentError> {
        let component = self.registry.get_instance(kind)?;

        let mut space = ReturnSpace::new();
        component.allocate_return_space(nargout, &mut space)?;
        if fast {
            component.compute_fast(inputs, &mut space)?;
        } else {
            component.compute(inputs, &mut space)?;
        }
        Ok(space.into_outputs()?)
    }
}
