use nalgebra::DVector;

use crate::support::{
    backend::{BASE_DOF, SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace};

/// Reads back the shared robot state.
///
/// Inputs: none. Outputs, in order and up to the requested count: `q`
/// (`n × 1`), `dq` (`n × 1`), `vb` (`6 × 1`) and `g` (`3 × 1`).
pub struct GetState<B> {
    base: ComponentBase<B>,
}

impl<B> GetState<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for GetState<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::GetState
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(Vec::new())
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        let dof = model.dof()?;
        Ok(vec![
            Shape::column(dof),
            Shape::column(dof),
            Shape::column(BASE_DOF),
            Shape::column(3),
        ])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        _inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let state = &model.state;
        if space.requested(0) {
            space.write(0, state.joint_positions.clone())?;
        }
        if space.requested(1) {
            space.write(1, state.joint_velocities.clone())?;
        }
        if space.requested(2) {
            space.write(2, DVector::from_column_slice(state.base_velocity.as_slice()))?;
        }
        if space.requested(3) {
            space.write(3, DVector::from_column_slice(state.gravity_vector().as_slice()))?;
        }
        Ok(())
    }
}
