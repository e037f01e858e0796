use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Canonical Cartesian view of a state container.
///
/// Orbital-element types (Kepler, spherical, ...) implement this to be moved
/// between frames; the frame graph never looks at anything else.
pub trait CartesianView {
    fn position(&self) -> Vector3<f64>;
    fn velocity(&self) -> Vector3<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianState {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
}

impl CartesianState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }
}

impl CartesianView for CartesianState {
    fn position(&self) -> Vector3<f64> {
        self.position
    }

    fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Acceleration [m/s²]
    pub acceleration: Vector3<f64>,
}

impl KinematicState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, acceleration: Vector3<f64>) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }
}

impl CartesianView for KinematicState {
    fn position(&self) -> Vector3<f64> {
        self.position
    }

    fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }
}

/// Attitude of a body together with its angular rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationState {
    /// Rotation from body axes to frame axes
    pub orientation: UnitQuaternion<f64>,
    /// Body angular velocity relative to the frame, in frame axes [rad/s]
    pub rate: Vector3<f64>,
    /// Body angular acceleration relative to the frame, in frame axes [rad/s²]
    pub acceleration: Vector3<f64>,
}

impl OrientationState {
    pub fn new(
        orientation: UnitQuaternion<f64>,
        rate: Vector3<f64>,
        acceleration: Vector3<f64>,
    ) -> Self {
        Self {
            orientation,
            rate,
            acceleration,
        }
    }

    pub fn at_rest(orientation: UnitQuaternion<f64>) -> Self {
        Self::new(orientation, Vector3::zeros(), Vector3::zeros())
    }
}
