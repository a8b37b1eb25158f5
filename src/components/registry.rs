use std::{collections::BTreeMap, fmt, ops::Deref, sync::Arc};

use tracing::info;

use crate::support::backend::{ModelHandle, WholeBodyModel};

use super::{
    ComponentBase, ComponentKind, ForwardKinematics, GeneralisedForces, GetState, Jacobian,
    JointLimitsQuery, LifecycleError, MassMatrix, ModelComponent, ModelInitialise, UpdateState,
    ValidationConfig,
};

/// Settings applied to every component a registry creates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Robot loaded when the initializer is created and no robot is loaded yet.
    ///
    /// `None` leaves the backend untouched until the host calls
    /// `model-initialise` explicitly.
    pub default_robot: Option<String>,

    /// Input validation settings.
    pub validation: ValidationConfig,
}

/// Identity of one live component instance.
///
/// Ids are handed out in increasing order and never reused by a registry, so
/// an instance created after a teardown is always distinguishable from the
/// one it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared reference to a live component.
///
/// Dereferences to the component, so the invocation methods are called on it
/// directly.
pub struct ComponentInstance<B> {
    id: InstanceId,
    component: Arc<dyn ModelComponent<B>>,
}

impl<B> ComponentInstance<B> {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns `true` if both refer to the same instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.component, &other.component)
    }
}

impl<B> Clone for ComponentInstance<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            component: Arc::clone(&self.component),
        }
    }
}

impl<B> Deref for ComponentInstance<B> {
    type Target = dyn ModelComponent<B>;

    fn deref(&self) -> &Self::Target {
        self.component.as_ref()
    }
}

impl<B> fmt::Debug for ComponentInstance<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Owns the component instances of one host session.
///
/// The registry stands in for per-component global singletons: it holds at
/// most one live instance per [`ComponentKind`], creates it lazily on first
/// access, and drops it only when told to. Lifecycle calls take `&mut self`,
/// so a host that shares the registry across threads has to wrap it in its
/// own lock.
///
/// # Example
///
/// ```
/// # use wbm_components::support::backend::{BackendError, FrameIndex, JointLimits, RobotState};
/// # use nalgebra::{DMatrix, DVector, Isometry3};
/// # struct Backend;
/// # impl wbm_components::WholeBodyModel for Backend {
/// #     fn load(&mut self, _: &str) -> Result<(), BackendError> { Ok(()) }
/// #     fn dof(&self) -> Option<usize> { Some(1) }
/// #     fn joint_limits(&self) -> Result<JointLimits, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn frame_index(&self, _: &str) -> Result<FrameIndex, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn mass_matrix(&self, _: &RobotState) -> Result<DMatrix<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn generalised_bias_forces(&self, _: &RobotState) -> Result<DVector<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn jacobian(&self, _: &RobotState, _: FrameIndex) -> Result<DMatrix<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// #     fn forward_kinematics(&self, _: &RobotState, _: FrameIndex) -> Result<Isometry3<f64>, BackendError> { Err(BackendError::NotLoaded) }
/// # }
/// use wbm_components::{ComponentKind, ComponentRegistry, RegistryConfig};
/// use wbm_components::support::backend::ModelHandle;
///
/// let mut registry = ComponentRegistry::with_backend(ModelHandle::new(Backend), RegistryConfig::default());
///
/// let a = registry.get_instance(ComponentKind::Initialise).unwrap();
/// let again = registry.get_instance(ComponentKind::Initialise).unwrap();
/// assert!(a.same_instance(&again));
///
/// registry.delete_instance(ComponentKind::Initialise);
/// let b = registry.get_instance(ComponentKind::Initialise).unwrap();
/// assert!(!a.same_instance(&b));
/// ```
pub struct ComponentRegistry<B> {
    config: RegistryConfig,
    handle: Option<ModelHandle<B>>,
    instances: BTreeMap<ComponentKind, ComponentInstance<B>>,
    next_id: u64,
}

impl<B: WholeBodyModel + 'static> ComponentRegistry<B> {
    /// Creates a registry with no backend attached.
    ///
    /// Every [`get_instance`](Self::get_instance) fails until a backend is
    /// attached with [`attach_backend`](Self::attach_backend).
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            handle: None,
            instances: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Creates a registry serving components over `handle`.
    #[must_use]
    pub fn with_backend(handle: ModelHandle<B>, config: RegistryConfig) -> Self {
        let mut registry = Self::new(config);
        registry.handle = Some(handle);
        registry
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The attached backend, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&ModelHandle<B>> {
        self.handle.as_ref()
    }

    /// Attaches `handle`, replacing any previous backend.
    ///
    /// Instances built over a different backend are torn down first.
    pub fn attach_backend(&mut self, handle: ModelHandle<B>) {
        if self
            .handle
            .as_ref()
            .is_some_and(|current| !current.ptr_eq(&handle))
        {
            self.delete_all();
        }
        self.handle = Some(handle);
    }

    /// Tears down every instance and releases the backend.
    ///
    /// Returns the released handle, if one was attached.
    pub fn detach_backend(&mut self) -> Option<ModelHandle<B>> {
        self.delete_all();
        self.handle.take()
    }

    /// Returns the live instance of `kind`, creating it if needed.
    ///
    /// Repeated calls return the same instance until
    /// [`delete_instance`](Self::delete_instance) runs for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::BackendUnavailable`] if no backend is
    /// attached, or [`LifecycleError::Setup`] if the component's one-time
    /// setup fails. Nothing is stored on failure.
    pub fn get_instance(
        &mut self,
        kind: ComponentKind,
    ) -> Result<ComponentInstance<B>, LifecycleError> {
        if let Some(instance) = self.instances.get(&kind) {
            return Ok(instance.clone());
        }

        let handle = self
            .handle
            .clone()
            .ok_or(LifecycleError::BackendUnavailable { kind })?;
        let component = self.build(kind, handle)?;

        self.next_id += 1;
        let instance = ComponentInstance {
            id: InstanceId(self.next_id),
            component,
        };
        info!(%kind, id = %instance.id, "created component instance");

        self.instances.insert(kind, instance.clone());
        Ok(instance)
    }

    /// Releases the instance of `kind`.
    ///
    /// Does nothing if no instance exists. Returns `true` if an instance was
    /// released. Callers still holding a [`ComponentInstance`] keep a working
    /// component, but the registry will build a fresh one on the next
    /// [`get_instance`](Self::get_instance).
    pub fn delete_instance(&mut self, kind: ComponentKind) -> bool {
        match self.instances.remove(&kind) {
            Some(instance) => {
                info!(%kind, id = %instance.id, "deleted component instance");
                true
            }
            None => false,
        }
    }

    /// Releases every live instance.
    pub fn delete_all(&mut self) {
        for kind in ComponentKind::ALL {
            self.delete_instance(kind);
        }
    }

    /// Returns `true` if an instance of `kind` is live.
    #[must_use]
    pub fn is_active(&self, kind: ComponentKind) -> bool {
        self.instances.contains_key(&kind)
    }

    fn build(
        &self,
        kind: ComponentKind,
        handle: ModelHandle<B>,
    ) -> Result<Arc<dyn ModelComponent<B>>, LifecycleError> {
        let base = ComponentBase::new(handle, self.config.validation);
        let component: Arc<dyn ModelComponent<B>> = match kind {
            ComponentKind::Initialise => Arc::new(ModelInitialise::new(
                base,
                self.config.default_robot.as_deref(),
            )?),
            ComponentKind::UpdateState => Arc::new(UpdateState::new(base)),
            ComponentKind::GetState => Arc::new(GetState::new(base)),
            ComponentKind::JointLimits => Arc::new(JointLimitsQuery::new(base)),
            ComponentKind::MassMatrix => Arc::new(MassMatrix::new(base)),
            ComponentKind::GeneralisedForces => Arc::new(GeneralisedForces::new(base)),
            ComponentKind::Jacobian => Arc::new(Jacobian::new(base)),
            ComponentKind::ForwardKinematics => Arc::new(ForwardKinematics::new(base)),
        };
        Ok(component)
    }
}

impl<B> fmt::Debug for ComponentRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("config", &self.config)
            .field("attached", &self.handle.is_some())
            .field("active", &self.instances.keys().collect::<Vec<_>>())
            .finish()
    }
}
