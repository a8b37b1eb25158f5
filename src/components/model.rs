//! [`twine_core::Model`] adapter for components.

use twine_core::Model;

use crate::support::host::HostArray;

use super::{ComponentError, ComponentInstance, ReturnSpace};

/// Drives one component as a [`Model`].
///
/// Each call runs a full allocate/compute cycle with a fixed output count and
/// returns the filled outputs. The component keeps its shared model, so calls
/// see (and, for mutating components, change) the registry's robot state.
pub struct ComponentModel<B> {
    instance: ComponentInstance<B>,
    nargout: usize,
    fast: bool,
}

impl<B> ComponentModel<B> {
    /// Wraps `instance`, requesting `nargout` outputs on every call.
    #[must_use]
    pub fn new(instance: ComponentInstance<B>, nargout: usize) -> Self {
        Self {
            instance,
            nargout,
            fast: false,
        }
    }

    /// Uses [`compute_fast`](super::ModelComponent::compute_fast) instead of
    /// [`compute`](super::ModelComponent::compute).
    #[must_use]
    pub fn fast(self) -> Self {
        Self { fast: true, ..self }
    }

    #[must_use]
    pub fn instance(&self) -> &ComponentInstance<B> {
        &self.instance
    }
}

impl<B> Model for ComponentModel<B> {
    type Input = Vec<HostArray>;
    type Output = Vec<HostArray>;
    type Error = ComponentError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut space = ReturnSpace::new();
        self.instance.allocate_return_space(self.nargout, &mut space)?;
        if self.fast {
            self.instance.compute_fast(input, &mut space)?;
        } else {
            self.instance.compute(input, &mut space)?;
        }
        Ok(space.into_outputs()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    use crate::components::{ArgumentError, ComponentKind, test_support::loaded_registry};

    #[test]
    fn runs_a_full_cycle_per_call() {
        let mut registry = loaded_registry();
        let model = ComponentModel::new(
            registry.get_instance(ComponentKind::MassMatrix).unwrap(),
            1,
        );

        let at_rest = model.call(&Vec::new()).unwrap();
        let displaced = model.call(&vec![HostArray::column(&[0.5; 4])]).unwrap();

        assert_relative_eq!(at_rest[0].as_real().unwrap()[(0, 0)], 1.0);
        assert_relative_eq!(displaced[0].as_real().unwrap()[(0, 0)], 3.0);
    }

    #[test]
    fn fast_models_accept_rows() {
        let mut registry = loaded_registry();
        let instance = registry.get_instance(ComponentKind::MassMatrix).unwrap();
        let row = vec![HostArray::Real(DMatrix::from_element(1, 4, 0.5))];

        let error = ComponentModel::new(instance.clone(), 1)
            .call(&row)
            .unwrap_err();
        assert!(matches!(
            error,
            ComponentError::Argument(ArgumentError::InputShape { index: 0, .. })
        ));

        let outputs = ComponentModel::new(instance, 1).fast().call(&row).unwrap();
        assert_relative_eq!(outputs[0].as_real().unwrap()[(0, 0)], 3.0);
    }

    #[test]
    fn shares_state_with_the_registry() {
        let mut registry = loaded_registry();
        let update = ComponentModel::new(
            registry.get_instance(ComponentKind::UpdateState).unwrap(),
            0,
        );
        let state = ComponentModel::new(registry.get_instance(ComponentKind::GetState).unwrap(), 1);

        let outputs = update
            .call(&vec![
                HostArray::column(&[1.0, 2.0, 3.0, 4.0]),
                HostArray::column(&[0.0; 4]),
                HostArray::column(&[0.0; 6]),
            ])
            .unwrap();
        assert!(outputs.is_empty());

        let outputs = state.call(&Vec::new()).unwrap();
        assert_eq!(outputs, [HostArray::column(&[1.0, 2.0, 3.0, 4.0])]);
    }
}
