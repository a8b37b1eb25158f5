use crate::support::{
    backend::{SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace};

/// Reports the position limits of every joint.
///
/// Inputs: none. Outputs: lower limits (`n × 1`), upper limits (`n × 1`).
pub struct JointLimitsQuery<B> {
    base: ComponentBase<B>,
}

impl<B> JointLimitsQuery<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for JointLimitsQuery<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::JointLimits
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(Vec::new())
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        let dof = model.dof()?;
        Ok(vec![Shape::column(dof); 2])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        _inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        if space.requested(0) {
            let limits = model.backend.joint_limits()?;
            space.write(0, limits.lower)?;
            if space.requested(1) {
                space.write(1, limits.upper)?;
            }
        }
        Ok(())
    }
}
