use crate::support::{
    backend::{BASE_DOF, SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace};

/// Generalised bias forces at the shared state.
///
/// Inputs: none. Outputs: `h` (`(n + 6) × 1`), the Coriolis, centrifugal and
/// gravity terms of the equations of motion.
pub struct GeneralisedForces<B> {
    base: ComponentBase<B>,
}

impl<B> GeneralisedForces<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for GeneralisedForces<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::GeneralisedForces
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(Vec::new())
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        Ok(vec![Shape::column(model.dof()? + BASE_DOF)])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        _inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        if space.requested(0) {
            let forces = model.backend.generalised_bias_forces(&model.state)?;
            space.write(0, forces)?;
        }
        Ok(())
    }
}
