//! Kinematic parameters of a rigid, time-varying relationship between two frames.
//!
//! A [`TransformationParameters`] set describes, at one epoch, the motion
//! `x1(t) = R(t) (x0(t) + T(t))` that takes coordinates in frame F0 to
//! coordinates in frame F1, together with its first and second time
//! derivatives:
//!
//! - `translation` `T`, `velocity` `Ṫ`, `acceleration` `T̈` (F0 axes, SI units)
//! - `rotation` `R` (proper rotation, F0 axes to F1 axes)
//! - `rotation_rate` `ω` and `rotation_acceleration` `α`, defined by
//!   `Ṙ = R [ω]×` and `α = ω̇` (F0 axes)
//!
//! Applying the parameters to a state gives the usual rotating-frame terms:
//!
//! ```text
//! r* = R (r + T)
//! v* = R (v + Ṫ + ω × (r + T))
//! a* = R (a + T̈ + 2ω × (v + Ṫ) + α × (r + T) + ω × (ω × (r + T)))
//! ```
//!
//! Composition and inversion are closed over this family: both are computed
//! directly on the parameters, so any factory that can produce a parameter set
//! gets chaining and inversion without re-deriving its own physics.

use crate::epoch::Epoch;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformationParameters {
    /// Epoch at which these parameters are valid
    pub epoch: Epoch,
    /// Translation from F0 to F1, expressed in F0 axes [m]
    pub translation: Vector3<f64>,
    /// Rate of change of the translation [m/s]
    pub velocity: Vector3<f64>,
    /// Second rate of change of the translation [m/s²]
    pub acceleration: Vector3<f64>,
    /// Rotation from F0 axes to F1 axes
    pub rotation: UnitQuaternion<f64>,
    /// Angular velocity of F0 with respect to F1, in F0 axes [rad/s]
    pub rotation_rate: Vector3<f64>,
    /// Angular acceleration of F0 with respect to F1, in F0 axes [rad/s²]
    pub rotation_acceleration: Vector3<f64>,
}

impl TransformationParameters {
    pub fn new(
        epoch: Epoch,
        translation: Vector3<f64>,
        velocity: Vector3<f64>,
        acceleration: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        rotation_rate: Vector3<f64>,
        rotation_acceleration: Vector3<f64>,
    ) -> Self {
        Self {
            epoch,
            translation,
            velocity,
            acceleration,
            rotation,
            rotation_rate,
            rotation_acceleration,
        }
    }

    /// Parameters that leave every state unchanged.
    pub fn identity(epoch: Epoch) -> Self {
        Self::new(
            epoch,
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::zeros(),
            UnitQuaternion::identity(),
            Vector3::zeros(),
            Vector3::zeros(),
        )
    }

    /// A fixed offset with no rotation and no rates.
    pub fn translation_only(epoch: Epoch, translation: Vector3<f64>) -> Self {
        Self {
            translation,
            ..Self::identity(epoch)
        }
    }

    /// Same parameters, tagged with another epoch.
    pub fn at_epoch(self, epoch: Epoch) -> Self {
        Self { epoch, ..self }
    }

    /// Parameters of `self` (F0 → F1) followed by `next` (F1 → F2).
    ///
    /// With `u = Rₐᵀ T_b` and `ω_b' = Rₐᵀ ω_b`, the composed motion is
    ///
    /// ```text
    /// R = R_b Rₐ                 T = Tₐ + u
    /// ω = ωₐ + ω_b'              Ṫ = Ṫₐ + Rₐᵀ Ṫ_b − ωₐ × u
    /// α = αₐ + Rₐᵀ α_b − ωₐ × ω_b'
    /// T̈ = T̈ₐ + Rₐᵀ T̈_b − αₐ × u − 2 ωₐ × Rₐᵀ Ṫ_b + ωₐ × (ωₐ × u)
    /// ```
    ///
    /// The result keeps the epoch of `self`.
    pub fn compose(&self, next: &TransformationParameters) -> TransformationParameters {
        let into_f0 = |v: &Vector3<f64>| self.rotation.inverse_transform_vector(v);
        let w = &self.rotation_rate;

        let u = into_f0(&next.translation);
        let u_rate = into_f0(&next.velocity);
        let u_accel = into_f0(&next.acceleration);
        let next_rate = into_f0(&next.rotation_rate);
        let next_accel = into_f0(&next.rotation_acceleration);

        TransformationParameters {
            epoch: self.epoch,
            translation: self.translation + u,
            velocity: self.velocity + u_rate - w.cross(&u),
            acceleration: self.acceleration + u_accel
                - self.rotation_acceleration.cross(&u)
                - 2.0 * w.cross(&u_rate)
                + w.cross(&w.cross(&u)),
            rotation: next.rotation * self.rotation,
            rotation_rate: w + next_rate,
            rotation_acceleration: self.rotation_acceleration + next_accel - w.cross(&next_rate),
        }
    }

    /// Parameters of the reverse motion (F1 → F0).
    ///
    /// ```text
    /// R' = R⁻¹        T' = −R T
    /// ω' = −R ω       Ṫ' = −R (Ṫ + ω × T)
    /// α' = −R α       T̈' = −R (T̈ + 2ω × Ṫ + α × T + ω × (ω × T))
    /// ```
    ///
    /// The `ω × T` style coupling terms vanish when the relationship does not
    /// rotate, leaving plain negated and rotated rates.
    pub fn inverse(&self) -> TransformationParameters {
        let t = &self.translation;
        let w = &self.rotation_rate;
        let to_f1 = |v: Vector3<f64>| -(self.rotation * v);

        TransformationParameters {
            epoch: self.epoch,
            translation: to_f1(*t),
            velocity: to_f1(self.velocity + w.cross(t)),
            acceleration: to_f1(
                self.acceleration
                    + 2.0 * w.cross(&self.velocity)
                    + self.rotation_acceleration.cross(t)
                    + w.cross(&w.cross(t)),
            ),
            rotation: self.rotation.inverse(),
            rotation_rate: to_f1(*w),
            rotation_acceleration: to_f1(self.rotation_acceleration),
        }
    }

    /// True when the parameters have no rotation rate or acceleration terms.
    pub fn is_static_rotation(&self) -> bool {
        self.rotation_rate == Vector3::zeros() && self.rotation_acceleration == Vector3::zeros()
    }

    pub fn transform_position(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * (position + self.translation)
    }

    pub fn transform_velocity(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Vector3<f64> {
        let offset = position + self.translation;
        self.rotation * (velocity + self.velocity + self.rotation_rate.cross(&offset))
    }

    pub fn transform_acceleration(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) -> Vector3<f64> {
        let offset = position + self.translation;
        let w = &self.rotation_rate;

        let observed = acceleration + self.acceleration;
        let coriolis = 2.0 * w.cross(&(velocity + self.velocity));
        let euler = self.rotation_acceleration.cross(&offset);
        let centripetal = w.cross(&w.cross(&offset));

        self.rotation * (observed + coriolis + euler + centripetal)
    }

    pub fn transform_pos_vel(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        (
            self.transform_position(position),
            self.transform_velocity(position, velocity),
        )
    }

    pub fn transform_pos_vel_acc(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        (
            self.transform_position(position),
            self.transform_velocity(position, velocity),
            self.transform_acceleration(position, velocity, acceleration),
        )
    }

    /// Orientation of a body (body axes to F0 axes) re-expressed against F1.
    pub fn transform_orientation(&self, orientation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        self.rotation * orientation
    }

    /// Body angular velocity relative to F0 (F0 axes) to the one relative to F1 (F1 axes).
    pub fn transform_orientation_rate(&self, rate: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * (rate + self.rotation_rate)
    }

    pub fn transform_orientation_acceleration(
        &self,
        rate: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) -> Vector3<f64> {
        self.rotation
            * (acceleration + self.rotation_acceleration + self.rotation_rate.cross(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn spinning(epoch: Epoch) -> TransformationParameters {
        TransformationParameters::new(
            epoch,
            Vector3::new(1.0, -2.0, 0.5),
            Vector3::new(0.1, 0.2, -0.3),
            Vector3::new(0.01, 0.0, 0.02),
            UnitQuaternion::from_scaled_axis(Vector3::new(0.3, -0.2, 0.9)),
            Vector3::new(0.0, 0.05, 0.2),
            Vector3::new(0.001, -0.002, 0.003),
        )
    }

    fn tumbling(epoch: Epoch) -> TransformationParameters {
        TransformationParameters::new(
            epoch,
            Vector3::new(-3.0, 0.5, 2.0),
            Vector3::new(-0.4, 0.0, 0.1),
            Vector3::new(0.0, 0.03, -0.01),
            UnitQuaternion::from_scaled_axis(Vector3::new(-1.1, 0.4, 0.2)),
            Vector3::new(0.3, -0.1, 0.0),
            Vector3::new(0.0, 0.004, -0.001),
        )
    }

    fn assert_params_eq(a: &TransformationParameters, b: &TransformationParameters) {
        assert_relative_eq!(a.translation, b.translation, epsilon = EPS);
        assert_relative_eq!(a.velocity, b.velocity, epsilon = EPS);
        assert_relative_eq!(a.acceleration, b.acceleration, epsilon = EPS);
        assert_relative_eq!(a.rotation, b.rotation, epsilon = EPS);
        assert_relative_eq!(a.rotation_rate, b.rotation_rate, epsilon = EPS);
        assert_relative_eq!(
            a.rotation_acceleration,
            b.rotation_acceleration,
            epsilon = EPS
        );
    }

    #[test]
    fn test_pure_translation() {
        let p = TransformationParameters::translation_only(Epoch::J2000, Vector3::new(2.0, 3.0, 4.0));
        let r = p.transform_position(&Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(r, Vector3::new(3.0, 4.0, 5.0));
        let v = p.transform_velocity(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotating_frame_terms() {
        // F1 sees F0 spinning at 1 rad/s around z; a point at rest on the x axis
        // moves along +y with a centripetal pull towards the origin.
        let p = TransformationParameters {
            rotation_rate: Vector3::new(0.0, 0.0, 1.0),
            ..TransformationParameters::identity(Epoch::J2000)
        };
        let r = Vector3::new(2.0, 0.0, 0.0);
        let (_, v, a) = p.transform_pos_vel_acc(&r, &Vector3::zeros(), &Vector3::zeros());
        assert_relative_eq!(v, Vector3::new(0.0, 2.0, 0.0), epsilon = EPS);
        assert_relative_eq!(a, Vector3::new(-2.0, 0.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_quarter_turn_rotation() {
        let p = TransformationParameters {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            ..TransformationParameters::identity(Epoch::J2000)
        };
        let r = p.transform_position(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(r, Vector3::new(0.0, 1.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_separate_calls_match_combined_call() {
        let p = spinning(Epoch::J2000);
        let r = Vector3::new(7000e3, -1200e3, 300e3);
        let v = Vector3::new(1.0e3, 7.5e3, -0.2e3);
        let a = Vector3::new(-8.0, 1.5, 0.3);

        let (r1, v1, a1) = p.transform_pos_vel_acc(&r, &v, &a);
        assert_eq!(p.transform_position(&r), r1);
        assert_eq!(p.transform_velocity(&r, &v), v1);
        assert_eq!(p.transform_acceleration(&r, &v, &a), a1);
        assert_eq!(p.transform_pos_vel(&r, &v), (r1, v1));
    }

    #[test]
    fn test_compose_with_inverse_is_identity() {
        let p = spinning(Epoch::J2000);
        let identity = TransformationParameters::identity(Epoch::J2000);
        assert_params_eq(&p.compose(&p.inverse()), &identity);
        assert_params_eq(&p.inverse().compose(&p), &identity);
    }

    #[test]
    fn test_double_inverse() {
        let p = tumbling(Epoch::J2000);
        assert_params_eq(&p.inverse().inverse(), &p);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let a = spinning(Epoch::J2000);
        let b = tumbling(Epoch::J2000);
        let ab = a.compose(&b);

        let r = Vector3::new(1.5, -0.7, 2.2);
        let v = Vector3::new(0.3, 0.1, -0.9);
        let acc = Vector3::new(0.02, -0.04, 0.01);

        let (r1, v1, a1) = a.transform_pos_vel_acc(&r, &v, &acc);
        let (r2, v2, a2) = b.transform_pos_vel_acc(&r1, &v1, &a1);
        let (r12, v12, a12) = ab.transform_pos_vel_acc(&r, &v, &acc);

        assert_relative_eq!(r12, r2, epsilon = EPS);
        assert_relative_eq!(v12, v2, epsilon = EPS);
        assert_relative_eq!(a12, a2, epsilon = EPS);
    }

    #[test]
    fn test_compose_is_associative() {
        let a = spinning(Epoch::J2000);
        let b = tumbling(Epoch::J2000);
        let c = spinning(Epoch::J2000).inverse();
        assert_params_eq(&a.compose(&b).compose(&c), &a.compose(&b.compose(&c)));
    }

    #[test]
    fn test_round_trip_state() {
        let p = tumbling(Epoch::J2000);
        let q = p.inverse();
        let r = Vector3::new(4.0, 5.0, -6.0);
        let v = Vector3::new(-0.5, 0.25, 1.0);
        let a = Vector3::new(0.1, 0.1, -0.2);

        let (r1, v1, a1) = p.transform_pos_vel_acc(&r, &v, &a);
        let (r0, v0, a0) = q.transform_pos_vel_acc(&r1, &v1, &a1);
        assert_relative_eq!(r0, r, epsilon = EPS);
        assert_relative_eq!(v0, v, epsilon = EPS);
        assert_relative_eq!(a0, a, epsilon = EPS);
    }

    #[test]
    fn test_orientation_round_trip() {
        let p = spinning(Epoch::J2000);
        let q = p.inverse();
        let attitude = UnitQuaternion::from_euler_angles(0.1, -0.4, 1.2);
        let rate = Vector3::new(0.01, 0.02, -0.03);
        let rate_dot = Vector3::new(0.0, 0.001, 0.002);

        let attitude_f1 = p.transform_orientation(&attitude);
        let rate_f1 = p.transform_orientation_rate(&rate);
        let rate_dot_f1 = p.transform_orientation_acceleration(&rate, &rate_dot);

        assert_relative_eq!(q.transform_orientation(&attitude_f1), attitude, epsilon = EPS);
        assert_relative_eq!(q.transform_orientation_rate(&rate_f1), rate, epsilon = EPS);
        assert_relative_eq!(
            q.transform_orientation_acceleration(&rate_f1, &rate_dot_f1),
            rate_dot,
            epsilon = EPS
        );
    }
}
