use std::borrow::Cow;

use crate::support::{
    backend::{BASE_DOF, SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{
    ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace,
    validation,
};

/// Floating-base mass matrix.
///
/// Inputs: optionally, joint positions `q` (`n × 1`) to evaluate at instead of
/// the shared state. Outputs: `M` (`(n + 6) × (n + 6)`).
///
/// Passing `q` does not modify the shared state.
pub struct MassMatrix<B> {
    base: ComponentBase<B>,
}

impl<B> MassMatrix<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for MassMatrix<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MassMatrix
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(vec![InputSpec::Column(model.dof()?)])
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        Ok(vec![Shape::square(model.dof()? + BASE_DOF)])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        if !space.requested(0) {
            return Ok(());
        }

        let state = if inputs.is_empty() {
            Cow::Borrowed(&model.state)
        } else {
            let joint_positions = validation::vector_input(inputs, 0)?;
            Cow::Owned(model.state.clone().with_joint_positions(joint_positions))
        };

        let matrix = model.backend.mass_matrix(&state)?;
        space.write(0, matrix)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::components::test_support::loaded_registry;

    #[test]
    fn evaluates_at_the_shared_state() {
        let mut registry = loaded_registry();
        registry
            .backend()
            .unwrap()
            .lock()
            .unwrap()
            .state
            .joint_positions
            .fill(0.25);

        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();
        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        assert_eq!(space.shapes(), [Shape::square(10)]);
        component.compute(&[], &mut space).unwrap();

        let outputs = space.into_outputs().unwrap();
        let matrix = outputs[0].as_real().unwrap();
        assert_relative_eq!(matrix[(0, 0)], 2.0);
        assert_relative_eq!(matrix[(9, 9)], 11.0);
        assert_relative_eq!(matrix[(0, 9)], 0.0);
    }

    #[test]
    fn explicit_positions_leave_the_state_alone() {
        let mut registry = loaded_registry();
        let component = registry.get_instance(ComponentKind::MassMatrix).unwrap();

        let mut space = ReturnSpace::new();
        component.allocate_return_space(1, &mut space).unwrap();
        component
            .compute(&[HostArray::column(&[1.0, 1.0, 1.0, 1.0])], &mut space)
            .unwrap();

        let outputs = space.into_outputs().unwrap();
        assert_relative_eq!(outputs[0].as_real().unwrap()[(0, 0)], 5.0);

        let model = registry.backend().unwrap().lock().unwrap();
        assert_relative_eq!(model.state.joint_positions.sum(), 0.0);
    }
}
