//! The whole-body model capability consumed by the components.
//!
//! A [`WholeBodyModel`] owns the kinematic tree of an articulated, floating-base
//! robot and answers dynamics queries about it. The components never build or
//! configure a backend; they share one through a [`ModelHandle`] created by
//! whoever owns the robot description.
//!
//! Generalised quantities use the floating-base convention: the first six
//! coordinates describe the base (linear then angular), followed by the `n`
//! joint coordinates, for a total of `n + 6`.

mod error;
mod handle;
mod state;

pub use error::BackendError;
pub use handle::{ModelHandle, SharedModel};
pub use state::RobotState;

use std::fmt;

use nalgebra::{DMatrix, DVector, Isometry3};

/// Number of floating-base coordinates preceding the joint coordinates.
pub const BASE_DOF: usize = 6;

/// Index of a frame (link or sensor) in the backend's kinematic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex(usize);

impl FrameIndex {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A frame as named by the host: either by link name or by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRef {
    Name(String),
    Index(usize),
}

impl FrameRef {
    /// Resolves the reference against the backend's kinematic tree.
    ///
    /// Names are looked up through [`WholeBodyModel::frame_index`]. Indices are
    /// passed through unchecked; the backend rejects unknown ones when queried.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend does not know the name.
    pub fn resolve(&self, model: &impl WholeBodyModel) -> Result<FrameIndex, BackendError> {
        match self {
            FrameRef::Name(name) => model.frame_index(name),
            FrameRef::Index(index) => Ok(FrameIndex::new(*index)),
        }
    }
}

/// Lower and upper position limits of every joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointLimits {
    pub lower: DVector<f64>,
    pub upper: DVector<f64>,
}

/// Kinematic and dynamic queries on a floating-base robot.
///
/// Implementations are expected to be stateful: [`load`](Self::load) replaces
/// the robot being modeled, and every query refers to the currently loaded
/// robot. Queries issued before any robot is loaded should fail with
/// [`BackendError::NotLoaded`].
///
/// Thread-safety is not required. [`ModelHandle`] serializes all access.
pub trait WholeBodyModel {
    /// Loads (or reloads) the model of the named robot.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::UnknownRobot`] if no description exists for
    /// `robot`, or another [`BackendError`] if loading fails.
    fn load(&mut self, robot: &str) -> Result<(), BackendError>;

    /// Number of actuated joints, or `None` if no robot is loaded.
    fn dof(&self) -> Option<usize>;

    /// Returns `true` once a robot has been loaded.
    fn is_loaded(&self) -> bool {
        self.dof().is_some()
    }

    /// Position limits of every joint.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the query fails.
    fn joint_limits(&self) -> Result<JointLimits, BackendError>;

    /// Looks up a frame by name.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::UnknownFrame`] if the name is not in the tree.
    fn frame_index(&self, name: &str) -> Result<FrameIndex, BackendError>;

    /// Floating-base mass matrix, `(n + 6) × (n + 6)`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the query fails.
    fn mass_matrix(&self, state: &RobotState) -> Result<DMatrix<f64>, BackendError>;

    /// Generalised bias forces (Coriolis, centrifugal and gravity), `n + 6`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the query fails.
    fn generalised_bias_forces(&self, state: &RobotState) -> Result<DVector<f64>, BackendError>;

    /// Jacobian of a frame, `6 × (n + 6)`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the frame is unknown or the query fails.
    fn jacobian(&self, state: &RobotState, frame: FrameIndex)
    -> Result<DMatrix<f64>, BackendError>;

    /// World pose of a frame.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the frame is unknown or the query fails.
    fn forward_kinematics(
        &self,
        state: &RobotState,
        frame: FrameIndex,
    ) -> Result<Isometry3<f64>, BackendError>;
}
