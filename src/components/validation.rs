//! Input checks shared by all components.
//!
//! [`compute`](super::ModelComponent::compute) runs every check.
//! [`compute_fast`](super::ModelComponent::compute_fast) always checks the
//! input count, the array kinds and the element count of numeric inputs,
//! since getting those wrong would hand the backend vectors of the wrong
//! length. Exact orientation and finiteness checks are optional on the fast
//! path and controlled by [`FastPathChecks`].

use nalgebra::DVector;

use crate::support::{
    backend::FrameRef,
    host::{ArrayKind, HostArray, Shape},
};

use super::ArgumentError;

/// What a component expects at one input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSpec {
    /// A character array, such as a robot name.
    Text,

    /// A real column vector of the given length.
    Column(usize),

    /// A frame, given by name or by a single zero-based index.
    Frame,
}

/// Optional checks performed by the fast compute path.
///
/// Both default to off: the fast path is meant for tight control loops where
/// the caller already guarantees stable, well-formed inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastPathChecks {
    /// Require vectors to be columns rather than accepting any orientation
    /// with the right element count.
    pub exact_shapes: bool,

    /// Reject NaN and infinite values.
    pub finite_values: bool,
}

/// Input validation settings for a registry's components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Checks run by `compute_fast` in addition to the mandatory ones.
    pub fast: FastPathChecks,
}

/// The validation level of one compute call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Full,
    Fast(FastPathChecks),
}

impl Mode {
    fn exact_shapes(self) -> bool {
        match self {
            Mode::Full => true,
            Mode::Fast(checks) => checks.exact_shapes,
        }
    }

    fn finite_values(self) -> bool {
        match self {
            Mode::Full => true,
            Mode::Fast(checks) => checks.finite_values,
        }
    }
}

/// Checks every supplied input against its spec.
///
/// Inputs beyond the end of `specs` are not checked; the caller validates the
/// input count separately.
pub(crate) fn check_inputs(
    specs: &[InputSpec],
    inputs: &[HostArray],
    mode: Mode,
) -> Result<(), ArgumentError> {
    specs
        .iter()
        .zip(inputs)
        .enumerate()
        .try_for_each(|(index, (spec, input))| check_input(index, *spec, input, mode))
}

fn check_input(
    index: usize,
    spec: InputSpec,
    input: &HostArray,
    mode: Mode,
) -> Result<(), ArgumentError> {
    match spec {
        InputSpec::Text => expect_kind(index, ArrayKind::Text, input),
        InputSpec::Column(len) => {
            expect_kind(index, ArrayKind::Real, input)?;
            let found = input.shape();
            if mode.exact_shapes() {
                let expected = Shape::column(len);
                if found != expected {
                    return Err(ArgumentError::InputShape {
                        index,
                        expected,
                        found,
                    });
                }
            } else if found.len() != len {
                return Err(ArgumentError::InputLength {
                    index,
                    expected: len,
                    found: found.len(),
                });
            }
            if mode.finite_values()
                && input
                    .as_real()
                    .is_some_and(|matrix| matrix.iter().any(|value| !value.is_finite()))
            {
                return Err(ArgumentError::NonFinite { index });
            }
            Ok(())
        }
        InputSpec::Frame => match input {
            HostArray::Text(_) => Ok(()),
            HostArray::Real(_) => {
                let found = input.shape();
                if mode.exact_shapes() && found != Shape::scalar() {
                    return Err(ArgumentError::InputShape {
                        index,
                        expected: Shape::scalar(),
                        found,
                    });
                }
                input
                    .as_index()
                    .map(|_| ())
                    .ok_or(ArgumentError::InvalidIndex { index })
            }
        },
    }
}

fn expect_kind(index: usize, expected: ArrayKind, input: &HostArray) -> Result<(), ArgumentError> {
    let found = input.kind();
    if found == expected {
        Ok(())
    } else {
        Err(ArgumentError::InputKind {
            index,
            expected,
            found,
        })
    }
}

fn input(inputs: &[HostArray], index: usize) -> Result<&HostArray, ArgumentError> {
    inputs.get(index).ok_or(ArgumentError::MissingInput { index })
}

/// Reads a text input.
pub(crate) fn text_input(inputs: &[HostArray], index: usize) -> Result<&str, ArgumentError> {
    let array = input(inputs, index)?;
    array.as_text().ok_or(ArgumentError::InputKind {
        index,
        expected: ArrayKind::Text,
        found: array.kind(),
    })
}

/// Reads a numeric input as a vector, in storage order.
pub(crate) fn vector_input(
    inputs: &[HostArray],
    index: usize,
) -> Result<DVector<f64>, ArgumentError> {
    let array = input(inputs, index)?;
    array.to_vector().ok_or(ArgumentError::InputKind {
        index,
        expected: ArrayKind::Real,
        found: array.kind(),
    })
}

/// Reads a frame reference.
pub(crate) fn frame_input(inputs: &[HostArray], index: usize) -> Result<FrameRef, ArgumentError> {
    match input(inputs, index)? {
        HostArray::Text(name) => Ok(FrameRef::Name(name.clone())),
        real => real
            .as_index()
            .map(FrameRef::Index)
            .ok_or(ArgumentError::InvalidIndex { index }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::DMatrix;

    const LENIENT: Mode = Mode::Fast(FastPathChecks {
        exact_shapes: false,
        finite_values: false,
    });

    fn row(values: &[f64]) -> HostArray {
        HostArray::Real(DMatrix::from_row_slice(1, values.len(), values))
    }

    #[test]
    fn full_mode_requires_columns() {
        let specs = [InputSpec::Column(3)];
        let error = check_inputs(&specs, &[row(&[1.0, 2.0, 3.0])], Mode::Full).unwrap_err();
        assert_eq!(
            error,
            ArgumentError::InputShape {
                index: 0,
                expected: Shape::column(3),
                found: Shape::new(1, 3),
            }
        );
    }

    #[test]
    fn fast_mode_accepts_any_orientation() {
        let specs = [InputSpec::Column(3)];
        assert!(check_inputs(&specs, &[row(&[1.0, 2.0, 3.0])], LENIENT).is_ok());
    }

    #[test]
    fn fast_mode_still_rejects_wrong_lengths() {
        let specs = [InputSpec::Column(3)];
        let error = check_inputs(&specs, &[HostArray::column(&[1.0, 2.0])], LENIENT).unwrap_err();
        assert_eq!(
            error,
            ArgumentError::InputLength {
                index: 0,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn fast_mode_still_rejects_wrong_kinds() {
        let specs = [InputSpec::Text];
        let error = check_inputs(&specs, &[HostArray::scalar(1.0)], LENIENT).unwrap_err();
        assert!(matches!(error, ArgumentError::InputKind { index: 0, .. }));
    }

    #[test]
    fn finiteness_is_configurable_on_the_fast_path() {
        let specs = [InputSpec::Column(2)];
        let inputs = [HostArray::column(&[0.0, f64::NAN])];

        assert_eq!(
            check_inputs(&specs, &inputs, Mode::Full),
            Err(ArgumentError::NonFinite { index: 0 })
        );
        assert!(check_inputs(&specs, &inputs, LENIENT).is_ok());

        let strict = Mode::Fast(FastPathChecks {
            finite_values: true,
            ..FastPathChecks::default()
        });
        assert!(check_inputs(&specs, &inputs, strict).is_err());
    }

    #[test]
    fn frames_accept_names_and_indices() {
        let specs = [InputSpec::Frame];
        assert!(check_inputs(&specs, &[HostArray::text("r_sole")], Mode::Full).is_ok());
        assert!(check_inputs(&specs, &[HostArray::scalar(4.0)], Mode::Full).is_ok());
        assert_eq!(
            check_inputs(&specs, &[HostArray::scalar(-1.0)], Mode::Full),
            Err(ArgumentError::InvalidIndex { index: 0 })
        );
    }

    #[test]
    fn readers_report_missing_inputs() {
        assert_eq!(
            text_input(&[], 0),
            Err(ArgumentError::MissingInput { index: 0 })
        );
        assert_eq!(
            frame_input(&[HostArray::scalar(2.0)], 0),
            Ok(FrameRef::Index(2))
        );
        assert_eq!(
            vector_input(&[HostArray::column(&[1.0])], 0).map(|v| v.len()),
            Ok(1)
        );
    }
}
