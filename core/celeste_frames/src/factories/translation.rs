use crate::epoch::Epoch;
use crate::factory::TransformFactory;
use crate::parameters::TransformationParameters;
use crate::state::KinematicState;
use nalgebra::{UnitQuaternion, Vector3};
use std::fmt;

/// Translation `T`, its rate `Ṫ` and second rate `T̈` at an epoch.
pub type TranslationJet = (Vector3<f64>, Vector3<f64>, Vector3<f64>);

type TranslationFn = dyn Fn(&Epoch) -> TranslationJet + Send + Sync;

/// Pure translation between two frames sharing the same axes, typically moving
/// the origin from one body to another.
///
/// The produced transforms cannot move orientations: a translation says nothing
/// about the attitude of the frames.
pub struct TranslationFactory {
    cost: f64,
    source: Box<TranslationFn>,
}

impl TranslationFactory {
    pub const COST: f64 = 9.0;

    pub fn from_fn<F>(cost: f64, source: F) -> Self
    where
        F: Fn(&Epoch) -> TranslationJet + Send + Sync + 'static,
    {
        Self {
            cost,
            source: Box::new(source),
        }
    }

    pub fn fixed(offset: Vector3<f64>) -> Self {
        Self::from_fn(Self::COST, move |_| (offset, Vector3::zeros(), Vector3::zeros()))
    }

    /// Constant translation moving with constant velocity and acceleration
    /// from `reference`.
    pub fn linear(
        reference: Epoch,
        offset: Vector3<f64>,
        velocity: Vector3<f64>,
        acceleration: Vector3<f64>,
    ) -> Self {
        Self::from_fn(Self::COST, move |epoch| {
            let dt = epoch.seconds_since(&reference);
            (
                offset + velocity * dt + acceleration * (0.5 * dt * dt),
                velocity + acceleration * dt,
                acceleration,
            )
        })
    }

    /// Moves the origin onto a body whose state in the source frame is given by
    /// `ephemeris`.
    pub fn centered_on<F>(ephemeris: F) -> Self
    where
        F: Fn(&Epoch) -> KinematicState + Send + Sync + 'static,
    {
        Self::from_fn(Self::COST, move |epoch| {
            let body = ephemeris(epoch);
            (-body.position, -body.velocity, -body.acceleration)
        })
    }
}

impl fmt::Debug for TranslationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationFactory")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl TransformFactory for TranslationFactory {
    fn cost(&self, _epoch: &Epoch) -> f64 {
        self.cost
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        let (translation, velocity, acceleration) = (self.source)(epoch);
        TransformationParameters::new(
            *epoch,
            translation,
            velocity,
            acceleration,
            UnitQuaternion::identity(),
            Vector3::zeros(),
            Vector3::zeros(),
        )
    }

    fn supports_orientation(&self) -> bool {
        false
    }
}
