use crate::support::{
    backend::{BASE_DOF, SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{
    ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace,
    validation,
};

/// Jacobian of a frame at the shared state.
///
/// Inputs: the frame, by name or zero-based index. Outputs: `J`
/// (`6 × (n + 6)`), mapping generalised velocities to the frame's twist.
pub struct Jacobian<B> {
    base: ComponentBase<B>,
}

impl<B> Jacobian<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for Jacobian<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Jacobian
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(vec![InputSpec::Frame])
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        Ok(vec![Shape::new(BASE_DOF, model.dof()? + BASE_DOF)])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let frame = validation::frame_input(inputs, 0)?.resolve(&model.backend)?;
        if space.requested(0) {
            let jacobian = model.backend.jacobian(&model.state, frame)?;
            space.write(0, jacobian)?;
        }
        Ok(())
    }
}
