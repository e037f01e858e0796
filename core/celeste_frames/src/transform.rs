use crate::epoch::Epoch;
use crate::error::{FrameGraphError, FrameResult};
use crate::factory::{FactoryRef, TransformFactory, TransformFactoryExt};
use crate::parameters::TransformationParameters;
use crate::state::{CartesianState, CartesianView, KinematicState, OrientationState};
use log::debug;
use nalgebra::{UnitQuaternion, Vector3};

/// A frame-to-frame transformation frozen at one epoch.
///
/// Produced by a factory, it remembers where it came from so it can be inverted
/// or chained with another transform through the factory algebra.
#[derive(Debug, Clone)]
pub struct Transform {
    factory: FactoryRef,
    epoch: Epoch,
    parameters: TransformationParameters,
}

impl Transform {
    pub fn new(factory: FactoryRef, epoch: Epoch, parameters: TransformationParameters) -> Self {
        Self {
            factory,
            epoch,
            parameters,
        }
    }

    pub fn factory(&self) -> &FactoryRef {
        &self.factory
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn parameters(&self) -> &TransformationParameters {
        &self.parameters
    }

    /// The reverse transform at the same epoch.
    pub fn inverse(&self) -> Transform {
        Transform::new(self.factory.inverse(), self.epoch, self.parameters.inverse())
    }

    /// Chains `self` (F0 → F1) with `next` (F1 → F2) into F0 → F2.
    ///
    /// When `next` was produced at another epoch its factory is evaluated again
    /// at the epoch of `self`.
    pub fn add(&self, next: &Transform) -> Transform {
        let next_parameters = if next.epoch == self.epoch {
            next.parameters
        } else {
            debug!(
                "Re-evaluating {} at {} to chain it after {}",
                next.factory.name(),
                self.epoch,
                self.factory.name()
            );
            next.factory.parameters(&self.epoch)
        };
        Transform::new(
            self.factory.add(&next.factory),
            self.epoch,
            self.parameters.compose(&next_parameters),
        )
    }

    pub fn transform_position(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.parameters.transform_position(position)
    }

    pub fn transform_velocity(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Vector3<f64> {
        self.parameters.transform_velocity(position, velocity)
    }

    pub fn transform_acceleration(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) -> Vector3<f64> {
        self.parameters
            .transform_acceleration(position, velocity, acceleration)
    }

    pub fn transform_pos_vel(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        self.parameters.transform_pos_vel(position, velocity)
    }

    pub fn transform_pos_vel_acc(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        self.parameters
            .transform_pos_vel_acc(position, velocity, acceleration)
    }

    /// Moves any state exposing a Cartesian view.
    pub fn transform_state<S: CartesianView + ?Sized>(&self, state: &S) -> CartesianState {
        let (position, velocity) = self
            .parameters
            .transform_pos_vel(&state.position(), &state.velocity());
        CartesianState::new(position, velocity)
    }

    pub fn transform_kinematic(&self, state: &KinematicState) -> KinematicState {
        let (position, velocity, acceleration) = self.parameters.transform_pos_vel_acc(
            &state.position,
            &state.velocity,
            &state.acceleration,
        );
        KinematicState::new(position, velocity, acceleration)
    }

    pub fn transform_orientation(
        &self,
        orientation: &UnitQuaternion<f64>,
    ) -> FrameResult<UnitQuaternion<f64>> {
        self.check_orientation("transform_orientation")?;
        Ok(self.parameters.transform_orientation(orientation))
    }

    /// Orientation together with its angular velocity.
    pub fn transform_orientation_rate(
        &self,
        orientation: &UnitQuaternion<f64>,
        rate: &Vector3<f64>,
    ) -> FrameResult<(UnitQuaternion<f64>, Vector3<f64>)> {
        self.check_orientation("transform_orientation_rate")?;
        Ok((
            self.parameters.transform_orientation(orientation),
            self.parameters.transform_orientation_rate(rate),
        ))
    }

    pub fn transform_orientation_state(
        &self,
        state: &OrientationState,
    ) -> FrameResult<OrientationState> {
        self.check_orientation("transform_orientation_state")?;
        Ok(OrientationState::new(
            self.parameters.transform_orientation(&state.orientation),
            self.parameters.transform_orientation_rate(&state.rate),
            self.parameters
                .transform_orientation_acceleration(&state.rate, &state.acceleration),
        ))
    }

    fn check_orientation(&self, operation: &'static str) -> FrameResult<()> {
        if self.factory.supports_orientation() {
            Ok(())
        } else {
            Err(FrameGraphError::UnsupportedTransformOperation {
                operation,
                factory: self.factory.name(),
            })
        }
    }
}
