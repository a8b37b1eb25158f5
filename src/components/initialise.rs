//! The model initializer.
//!
//! Loads robots into the shared whole-body model. Creating the initializer
//! performs the model's one-time setup (loading the configured default robot
//! if nothing is loaded yet); computing it loads the robot the host names.

use tracing::info;

use crate::support::{
    backend::{SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{
    ComponentBase, ComponentError, ComponentInstance, ComponentKind, ComponentRegistry,
    InputSpec, LifecycleError, ModelComponent, ReturnSpace, validation,
};

/// Loads a robot description into the shared whole-body model.
///
/// Inputs: the robot name. Outputs: none.
///
/// Loading replaces the robot for every component of the registry and resets
/// the shared robot state to rest for the new joint count.
pub struct ModelInitialise<B> {
    base: ComponentBase<B>,
}

impl<B: WholeBodyModel> ModelInitialise<B> {
    /// Builds the initializer, performing the model's one-time setup.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Setup`] if the model cannot be accessed or
    /// the default robot fails to load.
    pub(crate) fn new(
        base: ComponentBase<B>,
        default_robot: Option<&str>,
    ) -> Result<Self, LifecycleError> {
        let setup_failed = |source| LifecycleError::Setup {
            kind: ComponentKind::Initialise,
            source,
        };

        let mut model = base.handle().lock().map_err(setup_failed)?;
        if let Some(robot) = default_robot
            && !model.backend.is_loaded()
        {
            let dof = model.load(robot).map_err(setup_failed)?;
            info!(robot, dof, "loaded default robot");
        }
        drop(model);

        Ok(Self { base })
    }
}

impl<B: WholeBodyModel + 'static> ModelInitialise<B> {
    /// Returns the registry's initializer, creating it on first access.
    ///
    /// # Errors
    ///
    /// Returns a [`LifecycleError`] if the initializer cannot be created.
    pub fn get_instance(
        registry: &mut ComponentRegistry<B>,
    ) -> Result<ComponentInstance<B>, LifecycleError> {
        registry.get_instance(ComponentKind::Initialise)
    }

    /// Releases the registry's initializer, if one exists.
    ///
    /// Returns `true` if an instance was released.
    pub fn delete_instance(registry: &mut ComponentRegistry<B>) -> bool {
        registry.delete_instance(ComponentKind::Initialise)
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for ModelInitialise<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Initialise
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(vec![InputSpec::Text])
    }

    fn output_shapes(&self, _model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        Ok(Vec::new())
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        inputs: &[HostArray],
        _space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let robot = validation::text_input(inputs, 0)?;
        let dof = model.load(robot)?;
        info!(robot, dof, "loaded robot");
        Ok(())
    }
}
