use nalgebra::{Vector3, Vector6};
use tracing::trace;

use crate::support::{
    backend::{BASE_DOF, SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{
    ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace,
    validation,
};

/// Sets the shared robot state used by every subsequent query.
///
/// Inputs: joint positions `q` (`n × 1`), joint velocities `dq` (`n × 1`),
/// base velocity `vb` (`6 × 1`) and, optionally, gravity `g` (`3 × 1`).
/// Outputs: none.
///
/// The update is all-or-nothing: every input is validated before the state
/// changes.
pub struct UpdateState<B> {
    base: ComponentBase<B>,
}

impl<B> UpdateState<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for UpdateState<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::UpdateState
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        let dof = model.dof()?;
        Ok(vec![
            InputSpec::Column(dof),
            InputSpec::Column(dof),
            InputSpec::Column(BASE_DOF),
            InputSpec::Column(3),
        ])
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
        let joint_positions = validation::vector_input(inputs, 0)?;
        let joint_velocities = validation::vector_input(inputs, 1)?;
        let base_velocity = validation::vector_input(inputs, 2)?;
        let base_velocity = Vector6::from_column_slice(base_velocity.as_slice());
        let gravity = if inputs.len() > 3 {
            let gravity = validation::vector_input(inputs, 3)?;
            Some(Vector3::from_column_slice(gravity.as_slice()))
        } else {
            None
        };

        let state = &mut model.state;
        state.joint_positions = joint_positions;
        state.joint_velocities = joint_velocities;
        state.base_velocity = base_velocity;
        if let Some(gravity) = gravity {
            state.set_gravity(&gravity);
        }

        trace!(gravity = gravity.is_some(), "updated robot state");
        Ok(())
    }
}
