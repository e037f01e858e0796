//! The factory abstraction connecting two frames in the graph.
//!
//! A [`TransformFactory`] knows how to produce the [`TransformationParameters`]
//! between its source frame F0 and destination frame F1 at any epoch. The
//! frame graph stores factories as edges and uses [`TransformFactory::cost`] to
//! rank alternative chains. Chaining ([`TransformFactoryExt::add`]) and
//! inversion ([`TransformFactoryExt::inverse`]) work on any factory because they
//! only need the parameters.

use crate::composite::CompositeFactory;
use crate::epoch::Epoch;
use crate::inverse::InverseFactory;
use crate::parameters::TransformationParameters;
use crate::transform::Transform;
use std::fmt::Debug;
use std::sync::Arc;

/// Extra cost charged for going through the generic inverse of a factory.
///
/// Roughly the number of scalar operations needed to invert one parameter set,
/// so an inverse edge only wins when no cheaper primal chain exists.
pub const INVERSE_COST_OVERHEAD: f64 = 198.0;

/// Shared, type-erased factory as stored on the graph edges.
pub type FactoryRef = Arc<dyn TransformFactory>;

pub trait TransformFactory: Debug + Send + Sync {
    /// Relative expense of crossing this edge at `epoch`. Only used to rank paths.
    fn cost(&self, epoch: &Epoch) -> f64;

    /// Parameters of the F0 → F1 relationship valid at `epoch`.
    fn parameters(&self, epoch: &Epoch) -> TransformationParameters;

    /// Whether produced transforms may be applied to orientations.
    fn supports_orientation(&self) -> bool {
        true
    }

    /// Diagnostic label used in logs and errors.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// The factory this one is the generic inverse of, if any.
    fn inverted(&self) -> Option<&FactoryRef> {
        None
    }
}

/// Operations every shared factory gets for free.
pub trait TransformFactoryExt {
    /// Materializes the transform valid at `epoch`.
    fn transform(&self, epoch: &Epoch) -> Transform;

    /// Factory of the reverse relationship. Inverting an inverse hands back the
    /// original factory instead of wrapping it twice.
    fn inverse(&self) -> FactoryRef;

    /// Factory applying `self` then `next`; costs add up.
    fn add(&self, next: &FactoryRef) -> FactoryRef;
}

impl TransformFactoryExt for FactoryRef {
    fn transform(&self, epoch: &Epoch) -> Transform {
        Transform::new(self.clone(), *epoch, self.parameters(epoch))
    }

    fn inverse(&self) -> FactoryRef {
        match self.inverted() {
            Some(original) => original.clone(),
            None => Arc::new(InverseFactory::new(self.clone())),
        }
    }

    fn add(&self, next: &FactoryRef) -> FactoryRef {
        Arc::new(CompositeFactory::new(self.clone(), next.clone()))
    }
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::KinematicFactory;
    use nalgebra::Vector3;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::HelmertFactory"), "HelmertFactory");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_double_inverse_returns_the_original() {
        let factory: FactoryRef = Arc::new(KinematicFactory::constant(
            TransformationParameters::translation_only(Epoch::J2000, Vector3::new(1.0, 0.0, 0.0)),
        ));
        let inverse = factory.inverse();
        assert!(!Arc::ptr_eq(&inverse, &factory));
        assert!(Arc::ptr_eq(&inverse.inverse(), &factory));
    }

    #[test]
    fn test_inverse_costs_more() {
        let factory: FactoryRef = Arc::new(KinematicFactory::constant(
            TransformationParameters::identity(Epoch::J2000),
        ));
        let epoch = Epoch::J2000;
        assert_eq!(
            factory.inverse().cost(&epoch),
            factory.cost(&epoch) + INVERSE_COST_OVERHEAD
        );
        assert_eq!(
            factory.add(&factory).cost(&epoch),
            2.0 * factory.cost(&epoch)
        );
    }
}
