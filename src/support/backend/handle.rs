use std::sync::{Arc, Mutex, MutexGuard};

use super::{BackendError, RobotState, WholeBodyModel};

/// The backend together with the robot state all components share.
///
/// Both live behind the same lock so that a state update and the query that
/// follows it always see one consistent robot.
#[derive(Debug)]
pub struct SharedModel<B> {
    pub backend: B,
    pub state: RobotState,
}

impl<B: WholeBodyModel> SharedModel<B> {
    /// Number of joints of the loaded robot.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotLoaded`] if no robot is loaded yet.
    pub fn dof(&self) -> Result<usize, BackendError> {
        self.backend.dof().ok_or(BackendError::NotLoaded)
    }

    /// Loads `robot` and resets the shared state to rest for its joint count.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if loading fails; the state is left untouched.
    pub fn load(&mut self, robot: &str) -> Result<usize, BackendError> {
        self.backend.load(robot)?;
        let dof = self.dof()?;
        self.state = RobotState::at_rest(dof);
        Ok(dof)
    }
}

/// Shared, lockable access to a whole-body model.
///
/// The handle is the only way components reach the backend. Cloning it shares
/// the same backend; every clone keeps the backend alive, so no component can
/// outlive the model it adapts.
pub struct ModelHandle<B> {
    inner: Arc<Mutex<SharedModel<B>>>,
}

impl<B: WholeBodyModel> ModelHandle<B> {
    /// Wraps a backend, loaded or not.
    ///
    /// If the backend already has a robot loaded, the shared state starts at
    /// rest for its joint count; otherwise it starts empty.
    #[must_use]
    pub fn new(backend: B) -> Self {
        let state = RobotState::at_rest(backend.dof().unwrap_or(0));
        Self {
            inner: Arc::new(Mutex::new(SharedModel { backend, state })),
        }
    }

    /// Number of joints of the loaded robot.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotLoaded`] if no robot is loaded yet.
    pub fn dof(&self) -> Result<usize, BackendError> {
        self.lock()?.dof()
    }
}

impl<B> ModelHandle<B> {
    /// Locks the model for the duration of one call.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Poisoned`] if a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, SharedModel<B>>, BackendError> {
        Ok(self.inner.lock()?)
    }

    /// Returns `true` if both handles share the same backend.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<B> Clone for ModelHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B> std::fmt::Debug for ModelHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("shares", &Arc::strong_count(&self.inner))
            .finish()
    }
}
