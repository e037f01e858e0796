use crate::epoch::Epoch;
use crate::factory::{FactoryRef, TransformFactory, INVERSE_COST_OVERHEAD};
use crate::parameters::TransformationParameters;

/// Generic F1 → F0 factory built from any F0 → F1 factory.
///
/// The wrapped factory computes its parameters as usual and they are inverted
/// in closed form, so no factory has to know how to run its own physics
/// backwards.
#[derive(Debug)]
pub struct InverseFactory {
    factory: FactoryRef,
    overhead: f64,
}

impl InverseFactory {
    pub fn new(factory: FactoryRef) -> Self {
        Self::with_overhead(factory, INVERSE_COST_OVERHEAD)
    }

    pub fn with_overhead(factory: FactoryRef, overhead: f64) -> Self {
        Self { factory, overhead }
    }
}

impl TransformFactory for InverseFactory {
    fn cost(&self, epoch: &Epoch) -> f64 {
        self.factory.cost(epoch) + self.overhead
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        self.factory.parameters(epoch).inverse()
    }

    fn supports_orientation(&self) -> bool {
        self.factory.supports_orientation()
    }

    fn name(&self) -> String {
        format!("Inverse({})", self.factory.name())
    }

    fn inverted(&self) -> Option<&FactoryRef> {
        Some(&self.factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::HelmertFactory;
    use crate::factory::TransformFactoryExt;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::sync::Arc;

    fn drifting_helmert() -> FactoryRef {
        Arc::new(HelmertFactory::new(
            Epoch::J2000,
            Vector3::new(10.0, -5.0, 2.0),
            1e-9,
            Vector3::new(1e-6, 2e-6, -3e-6),
            Vector3::new(0.01, 0.02, 0.0),
            1e-12,
            Vector3::new(0.0, 0.0, 7.292115e-5),
        ))
    }

    #[test]
    fn test_inverse_undoes_the_factory_at_any_epoch() {
        let factory = drifting_helmert();
        let inverse = factory.inverse();
        let r = Vector3::new(6378e3, 100e3, -2000e3);
        let v = Vector3::new(-1.0e3, 7.0e3, 0.5e3);
        let a = Vector3::new(-9.0, 0.1, 2.0);

        for seconds in [-3.0e8, 0.0, 1.0e5, 6.0e8] {
            let epoch = Epoch::from_seconds_since_j2000(seconds);
            let (r1, v1, a1) = factory.transform(&epoch).transform_pos_vel_acc(&r, &v, &a);
            let (r0, v0, a0) = inverse.transform(&epoch).transform_pos_vel_acc(&r1, &v1, &a1);
            assert_relative_eq!(r0, r, max_relative = 1e-9);
            assert_relative_eq!(v0, v, max_relative = 1e-9);
            assert_relative_eq!(a0, a, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_inverse_name_and_capabilities() {
        let factory = drifting_helmert();
        let inverse = factory.inverse();
        assert_eq!(inverse.name(), "Inverse(HelmertFactory)");
        assert!(inverse.supports_orientation());
        assert_eq!(inverse.parameters(&Epoch::J2000), factory.parameters(&Epoch::J2000).inverse());
    }
}
