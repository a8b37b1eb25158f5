use nalgebra::{DVector, Vector3, Vector6};
use uom::si::{acceleration::meter_per_second_squared, f64::Acceleration};

/// Gravitational acceleration along the world z axis used for a fresh state.
const STANDARD_GRAVITY: f64 = -9.81;

/// The robot state every dynamics query is evaluated at.
///
/// The state is shared by all components: `update-state` writes it, the
/// queries read it. Gravity is kept as a typed acceleration so the host's
/// plain numbers are unambiguous once they cross into the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    /// Joint positions, `n`.
    pub joint_positions: DVector<f64>,

    /// Joint velocities, `n`.
    pub joint_velocities: DVector<f64>,

    /// Floating-base twist, linear then angular.
    pub base_velocity: Vector6<f64>,

    /// World-frame gravity.
    pub gravity: [Acceleration; 3],
}

impl RobotState {
    /// A robot with `dof` joints at rest in the zero configuration, under
    /// standard gravity.
    #[must_use]
    pub fn at_rest(dof: usize) -> Self {
        Self {
            joint_positions: DVector::zeros(dof),
            joint_velocities: DVector::zeros(dof),
            base_velocity: Vector6::zeros(),
            gravity: [
                Acceleration::new::<meter_per_second_squared>(0.0),
                Acceleration::new::<meter_per_second_squared>(0.0),
                Acceleration::new::<meter_per_second_squared>(STANDARD_GRAVITY),
            ],
        }
    }

    /// Number of joints this state describes.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.joint_positions.len()
    }

    /// Returns a new state with the given joint positions, keeping other fields unchanged.
    #[must_use]
    pub fn with_joint_positions(self, joint_positions: DVector<f64>) -> Self {
        Self {
            joint_positions,
            ..self
        }
    }

    /// Sets gravity from plain SI values (m/s²).
    pub fn set_gravity(&mut self, gravity: &Vector3<f64>) {
        self.gravity = [
            Acceleration::new::<meter_per_second_squared>(gravity.x),
            Acceleration::new::<meter_per_second_squared>(gravity.y),
            Acceleration::new::<meter_per_second_squared>(gravity.z),
        ];
    }

    /// Gravity as plain SI values (m/s²).
    #[must_use]
    pub fn gravity_vector(&self) -> Vector3<f64> {
        Vector3::new(
            self.gravity[0].get::<meter_per_second_squared>(),
            self.gravity[1].get::<meter_per_second_squared>(),
            self.gravity[2].get::<meter_per_second_squared>(),
        )
    }
}
