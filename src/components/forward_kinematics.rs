use nalgebra::{DVector, Isometry3};

use crate::support::{
    backend::{SharedModel, WholeBodyModel},
    host::{HostArray, Shape},
};

use super::{
    ComponentBase, ComponentError, ComponentKind, InputSpec, ModelComponent, ReturnSpace,
    validation,
};

/// Number of elements in a pose: translation then unit quaternion.
const POSE_LEN: usize = 7;

/// World pose of a frame at the shared state.
///
/// Inputs: the frame, by name or zero-based index. Outputs: the pose as a
/// `7 × 1` column `[x, y, z, qx, qy, qz, qw]`.
pub struct ForwardKinematics<B> {
    base: ComponentBase<B>,
}

impl<B> ForwardKinematics<B> {
    pub(crate) fn new(base: ComponentBase<B>) -> Self {
        Self { base }
    }
}

impl<B: WholeBodyModel> ModelComponent<B> for ForwardKinematics<B> {
    fn kind(&self) -> ComponentKind {
        ComponentKind::ForwardKinematics
    }

    fn base(&self) -> &ComponentBase<B> {
        &self.base
    }

    fn input_specs(&self, _model: &SharedModel<B>) -> Result<Vec<InputSpec>, ComponentError> {
        Ok(vec![InputSpec::Frame])
    }

    fn output_shapes(&self, model: &SharedModel<B>) -> Result<Vec<Shape>, ComponentError> {
        // The pose size is fixed, but a pose only exists once a robot is loaded.
        model.dof()?;
        Ok(vec![Shape::column(POSE_LEN)])
    }

    fn run(
        &self,
        model: &mut SharedModel<B>,
        inputs: &[HostArray],
        space: &mut ReturnSpace,
    ) -> Result<(), ComponentError> {
        let frame = validation::frame_input(inputs, 0)?.resolve(&model.backend)?;
        if space.requested(0) {
            let pose = model.backend.forward_kinematics(&model.state, frame)?;
            space.write(0, pose_vector(&pose))?;
        }
        Ok(())
    }
}

fn pose_vector(pose: &Isometry3<f64>) -> DVector<f64> {
    let translation = &pose.translation.vector;
    let rotation = &pose.rotation.coords;
    DVector::from_iterator(POSE_LEN, translation.iter().chain(rotation.iter()).copied())
}
