//! # Whole-body model components
//!
//! Host-facing adapters over a shared whole-body robot dynamics model.
//!
//! A host numerical environment (a scripting language, a simulation front end)
//! calls into this crate with numeric arrays. Each call is served by a
//! *component*: an adapter that sizes its outputs, validates the host's
//! arguments, and forwards the request to a [`WholeBodyModel`] backend that
//! owns the actual kinematics and dynamics.
//!
//! ## Crate layout
//!
//! - [`components`]: The [`ModelComponent`] contract, the registry that keeps
//!   at most one live instance per component kind, and the concrete adapters
//!   ([`ModelInitialise`], state access and the dynamics queries).
//! - [`dispatch`]: The host boundary, mapping command names to components and
//!   driving the two-phase allocate/compute protocol.
//! - [`support`]: Host arrays and the backend capability consumed by the
//!   components.
//!
//! ## Invocation protocol
//!
//! Every call is split in two phases. The host first asks the component to
//! allocate its return space (the shapes of the outputs it will produce), and
//! only then asks it to compute. The per-call [`ReturnSpace`] records which
//! phase a call is in, so computing without a reservation is an error rather
//! than a write into unreserved memory.
//!
//! ```
//! use wbm_components::{ComponentKind, ComponentRegistry, ModelComponent, RegistryConfig, ReturnSpace};
//! # use wbm_components::support::backend::{BackendError, FrameIndex, JointLimits, WholeBodyModel, RobotState};
//! # use nalgebra::{DMatrix, DVector, Isometry3};
//! # struct Backend;
//! # impl WholeBodyModel for Backend {
//! #     fn load(&mut self, _: &str) -> Result<(), BackendError> { Ok(()) }
//! #     fn dof(&self) -> Option<usize> { Some(2) }
//! #     fn joint_limits(&self) -> Result<JointLimits, BackendError> {
//! #         Ok(JointLimits { lower: DVector::from_element(2, -1.0), upper: DVector::from_element(2, 1.0) })
//! #     }
//! #     fn frame_index(&self, _: &str) -> Result<FrameIndex, BackendError> { Ok(FrameIndex::new(0)) }
//! #     fn mass_matrix(&self, _: &RobotState) -> Result<DMatrix<f64>, BackendError> { Ok(DMatrix::identity(8, 8)) }
//! #     fn generalised_bias_forces(&self, _: &RobotState) -> Result<DVector<f64>, BackendError> { Ok(DVector::zeros(8)) }
//! #     fn jacobian(&self, _: &RobotState, _: FrameIndex) -> Result<DMatrix<f64>, BackendError> { Ok(DMatrix::zeros(6, 8)) }
//! #     fn forward_kinematics(&self, _: &RobotState, _: FrameIndex) -> Result<Isometry3<f64>, BackendError> { Ok(Isometry3::identity()) }
//! # }
//! use wbm_components::support::backend::ModelHandle;
//!
//! let handle = ModelHandle::new(Backend);
//! let mut registry = ComponentRegistry::with_backend(handle, RegistryConfig::default());
//!
//! let mass_matrix = registry.get_instance(ComponentKind::MassMatrix).unwrap();
//! let mut space = ReturnSpace::new();
//! mass_matrix.allocate_return_space(1, &mut space).unwrap();
//! mass_matrix.compute(&[], &mut space).unwrap();
//!
//! let outputs = space.into_outputs().unwrap();
//! assert_eq!(outputs[0].shape().to_string(), "8x8");
//! ```

pub mod components;
pub mod dispatch;
pub mod support;

pub use components::{
    ComponentError, ComponentInstance, ComponentKind, ComponentModel, ComponentRegistry,
    ModelComponent, ModelInitialise, RegistryConfig, ReturnSpace,
};
pub use dispatch::{DispatchError, Dispatcher};
pub use support::backend::WholeBodyModel;
