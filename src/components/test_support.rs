use std::cell::Cell;

use nalgebra::{DMatrix, DVector, Isometry3};

use crate::support::backend::{
    BASE_DOF, BackendError, FrameIndex, JointLimits, ModelHandle, RobotState, WholeBodyModel,
};

use super::{ComponentRegistry, RegistryConfig};

/// Robot loaded by [`ScriptedBackend::loaded`].
pub(crate) const ROBOT: &str = "icub";

/// Second known robot, with a different joint count.
pub(crate) const OTHER_ROBOT: &str = "walkman";

const ROBOTS: [(&str, usize); 2] = [(ROBOT, 4), (OTHER_ROBOT, 7)];

pub(crate) const FRAMES: [&str; 3] = ["root_link", "l_sole", "r_sole"];

/// Total mass used for the gravity term of the bias forces.
pub(crate) const MASS: f64 = 10.0;

/// An in-memory backend returning easily predictable values.
///
/// - Mass matrix: diagonal, `M[i][i] = 1 + i + sum(q_j)`.
/// - Bias forces: `h[i] = i * sum(dq_j)`, except `h[2] = -MASS * g_z`.
/// - Jacobian of frame `f`: identity in the leading `6 × 6` block, `f` elsewhere.
/// - Pose of frame `f`: translation `(f, sum(q_j), 0)`, no rotation.
/// - Joint limits: `±(i + 1)` for joint `i`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedBackend {
    loaded: Option<(String, usize)>,
    loads: usize,
    queries: Cell<usize>,
    fail_queries: bool,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn loaded() -> Self {
        let mut backend = Self::new();
        backend.loaded = Some((ROBOT.to_string(), ROBOTS[0].1));
        backend
    }

    /// A loaded backend whose queries all fail.
    pub(crate) fn failing() -> Self {
        Self {
            fail_queries: true,
            ..Self::loaded()
        }
    }

    pub(crate) fn robot(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(robot, _)| robot.as_str())
    }

    /// Number of successful `load` calls.
    pub(crate) fn loads(&self) -> usize {
        self.loads
    }

    /// Number of dynamics queries issued.
    pub(crate) fn queries(&self) -> usize {
        self.queries.get()
    }

    fn query(&self, state: &RobotState) -> Result<usize, BackendError> {
        self.queries.set(self.queries.get() + 1);
        if self.fail_queries {
            return Err(BackendError::failed(
                "scripted query",
                std::io::Error::other("scripted failure"),
            ));
        }
        let dof = self.dof().ok_or(BackendError::NotLoaded)?;
        assert_eq!(state.dof(), dof, "state does not match loaded robot");
        Ok(dof)
    }

    fn check_frame(frame: FrameIndex) -> Result<f64, BackendError> {
        if frame.get() < FRAMES.len() {
            Ok(frame.get() as f64)
        } else {
            Err(BackendError::UnknownFrame {
                frame: frame.to_string(),
            })
        }
    }
}

impl WholeBodyModel for ScriptedBackend {
    fn load(&mut self, robot: &str) -> Result<(), BackendError> {
        let (name, dof) = ROBOTS
            .iter()
            .find(|(name, _)| *name == robot)
            .ok_or_else(|| BackendError::UnknownRobot {
                robot: robot.to_string(),
            })?;
        self.loaded = Some(((*name).to_string(), *dof));
        self.loads += 1;
        Ok(())
    }

    fn dof(&self) -> Option<usize> {
        self.loaded.as_ref().map(|(_, dof)| *dof)
    }

    fn joint_limits(&self) -> Result<JointLimits, BackendError> {
        let dof = self.query(&RobotState::at_rest(self.dof().unwrap_or(0)))?;
        Ok(JointLimits {
            lower: DVector::from_fn(dof, |i, _| -(i as f64 + 1.0)),
            upper: DVector::from_fn(dof, |i, _| i as f64 + 1.0),
        })
    }

    fn frame_index(&self, name: &str) -> Result<FrameIndex, BackendError> {
        FRAMES
            .iter()
            .position(|frame| *frame == name)
            .map(FrameIndex::new)
            .ok_or_else(|| BackendError::UnknownFrame {
                frame: name.to_string(),
            })
    }

    fn mass_matrix(&self, state: &RobotState) -> Result<DMatrix<f64>, BackendError> {
        let n = self.query(state)? + BASE_DOF;
        let q_sum = state.joint_positions.sum();
        Ok(DMatrix::from_fn(n, n, |r, c| {
            if r == c { 1.0 + r as f64 + q_sum } else { 0.0 }
        }))
    }

    fn generalised_bias_forces(&self, state: &RobotState) -> Result<DVector<f64>, BackendError> {
        let n = self.query(state)? + BASE_DOF;
        let dq_sum = state.joint_velocities.sum();
        let mut forces = DVector::from_fn(n, |i, _| i as f64 * dq_sum);
        forces[2] = -MASS * state.gravity_vector().z;
        Ok(forces)
    }

    fn jacobian(
        &self,
        state: &RobotState,
        frame: FrameIndex,
    ) -> Result<DMatrix<f64>, BackendError> {
        let n = self.query(state)? + BASE_DOF;
        let value = Self::check_frame(frame)?;
        Ok(DMatrix::from_fn(BASE_DOF, n, |r, c| {
            if c < BASE_DOF {
                if r == c { 1.0 } else { 0.0 }
            } else {
                value
            }
        }))
    }

    fn forward_kinematics(
        &self,
        state: &RobotState,
        frame: FrameIndex,
    ) -> Result<Isometry3<f64>, BackendError> {
        self.query(state)?;
        let value = Self::check_frame(frame)?;
        Ok(Isometry3::translation(
            value,
            state.joint_positions.sum(),
            0.0,
        ))
    }
}

pub(crate) fn registry(backend: ScriptedBackend) -> ComponentRegistry<ScriptedBackend> {
    ComponentRegistry::with_backend(ModelHandle::new(backend), RegistryConfig::default())
}

/// A registry over a backend with [`ROBOT`] already loaded.
pub(crate) fn loaded_registry() -> ComponentRegistry<ScriptedBackend> {
    registry(ScriptedBackend::loaded())
}
