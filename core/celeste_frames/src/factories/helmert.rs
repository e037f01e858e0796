use crate::epoch::{Epoch, JULIAN_YEAR_DAYS};
use crate::factory::TransformFactory;
use crate::parameters::TransformationParameters;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Length, Time};
use uom::si::length::{meter, millimeter};
use uom::si::time::{day, second};

/// Factory producing transforms from a set of Helmert parameters with a linear
/// drift in time.
///
/// - `T` translation offset between F0 and F1 [m], drifting with `dT` [m/s]
/// - `s` scale offset [-], drifting with `ds` [1/s]
/// - `R` rotation axis scaled by the rotation angle [rad], drifting with `dR` [rad/s]
///
/// All values are referenced to `helmert_epoch`: at epoch `t`,
/// `T(t) = T₀ + dT (t − t₀)` and likewise for `s` and `R`.
///
/// The transform stays a proper rigid motion: the scale is not folded into
/// the produced parameters and is available through [`HelmertFactory::scale_at`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmertFactory {
    helmert_epoch: Epoch,
    translation: Vector3<f64>,
    scale: f64,
    rotation: Vector3<f64>,
    translation_rate: Vector3<f64>,
    scale_rate: f64,
    rotation_rate: Vector3<f64>,
}

impl HelmertFactory {
    pub const COST: f64 = 45.0;

    pub fn new(
        helmert_epoch: Epoch,
        translation: Vector3<f64>,
        scale: f64,
        rotation: Vector3<f64>,
        translation_rate: Vector3<f64>,
        scale_rate: f64,
        rotation_rate: Vector3<f64>,
    ) -> Self {
        Self {
            helmert_epoch,
            translation,
            scale,
            rotation,
            translation_rate,
            scale_rate,
            rotation_rate,
        }
    }

    /// Builds the factory from parameters in the units published by the IERS:
    /// translations in mm, scale in ppb, rotations in milliarcseconds, and rates
    /// of all three per Julian year.
    pub fn from_iers_units(
        helmert_epoch: Epoch,
        translation_mm: Vector3<f64>,
        scale_ppb: f64,
        rotation_mas: Vector3<f64>,
        translation_rate_mm: Vector3<f64>,
        scale_rate_ppb: f64,
        rotation_rate_mas: Vector3<f64>,
    ) -> Self {
        let mm2m = Length::new::<millimeter>(1.0).get::<meter>();
        let mas2rad = Angle::new::<degree>(1e-3 / 3600.0).get::<radian>();
        let year = Time::new::<day>(JULIAN_YEAR_DAYS).get::<second>();
        let ppb = 1e-9;

        Self::new(
            helmert_epoch,
            translation_mm * mm2m,
            scale_ppb * ppb,
            rotation_mas * mas2rad,
            translation_rate_mm * (mm2m / year),
            scale_rate_ppb * (ppb / year),
            rotation_rate_mas * (mas2rad / year),
        )
    }

    pub fn helmert_epoch(&self) -> Epoch {
        self.helmert_epoch
    }

    /// Scale offset at `epoch` [-].
    pub fn scale_at(&self, epoch: &Epoch) -> f64 {
        self.scale + self.scale_rate * epoch.seconds_since(&self.helmert_epoch)
    }
}

impl TransformFactory for HelmertFactory {
    fn cost(&self, _epoch: &Epoch) -> f64 {
        // Parameter update: 4 vector + 3 scalar operations, rotation: 2 vector
        Self::COST
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        let dt = epoch.seconds_since(&self.helmert_epoch);

        let translation = self.translation + self.translation_rate * dt;
        let rotation = UnitQuaternion::from_scaled_axis(self.rotation + self.rotation_rate * dt);

        TransformationParameters::new(
            *epoch,
            translation,
            self.translation_rate,
            Vector3::zeros(),
            rotation,
            self.rotation_rate,
            Vector3::zeros(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_drift() {
        let factory = HelmertFactory::new(
            Epoch::J2000,
            Vector3::new(1.0, 0.0, 0.0),
            1e-9,
            Vector3::zeros(),
            Vector3::new(0.5, 0.0, 0.0),
            1e-10,
            Vector3::zeros(),
        );
        let epoch = Epoch::from_seconds_since_j2000(4.0);
        let p = factory.parameters(&epoch);
        assert_relative_eq!(p.translation, Vector3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(p.velocity, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(p.rotation, UnitQuaternion::identity());
        assert_relative_eq!(factory.scale_at(&epoch), 1.4e-9, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_rotation_is_identity_not_nan() {
        let factory = HelmertFactory::new(
            Epoch::J2000,
            Vector3::zeros(),
            0.0,
            Vector3::zeros(),
            Vector3::zeros(),
            0.0,
            Vector3::zeros(),
        );
        let p = factory.parameters(&Epoch::J2000);
        let r = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(p.transform_position(&r), r);
    }

    #[test]
    fn test_iers_unit_conversion() {
        // ITRF2014 -> ITRF2008 style numbers.
        let factory = HelmertFactory::from_iers_units(
            Epoch::from_julian_date(2_457_023.5),
            Vector3::new(1.6, 1.9, 2.4),
            -0.02,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -0.1),
            0.03,
            Vector3::new(0.0, 0.0, 0.0),
        );
        let p = factory.parameters(&factory.helmert_epoch());
        assert_relative_eq!(p.translation, Vector3::new(1.6e-3, 1.9e-3, 2.4e-3), epsilon = 1e-15);

        let seconds_per_year = 365.25 * 86_400.0;
        assert_relative_eq!(p.velocity.z, -0.1e-3 / seconds_per_year, max_relative = 1e-12);
        assert_relative_eq!(
            factory.scale_at(&factory.helmert_epoch()),
            -0.02e-9,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_milliarcsecond_rotation() {
        let factory = HelmertFactory::from_iers_units(
            Epoch::J2000,
            Vector3::zeros(),
            0.0,
            Vector3::new(0.0, 0.0, 1000.0),
            Vector3::zeros(),
            0.0,
            Vector3::zeros(),
        );
        let one_arcsecond = std::f64::consts::PI / (180.0 * 3600.0);
        let p = factory.parameters(&Epoch::J2000);
        assert_relative_eq!(p.rotation.angle(), one_arcsecond, max_relative = 1e-12);
    }
}
