use crate::epoch::Epoch;
use crate::factory::{FactoryRef, TransformFactory, TransformFactoryExt};
use crate::parameters::TransformationParameters;
use log::trace;
use std::sync::Arc;

/// Factory applying `first` (F0 → F1) and then `second` (F1 → F2).
#[derive(Debug)]
pub struct CompositeFactory {
    first: FactoryRef,
    second: FactoryRef,
}

impl CompositeFactory {
    pub fn new(first: FactoryRef, second: FactoryRef) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &FactoryRef {
        &self.first
    }

    pub fn second(&self) -> &FactoryRef {
        &self.second
    }
}

impl TransformFactory for CompositeFactory {
    fn cost(&self, epoch: &Epoch) -> f64 {
        self.first.cost(epoch) + self.second.cost(epoch)
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        self.first
            .parameters(epoch)
            .compose(&self.second.parameters(epoch))
    }

    fn supports_orientation(&self) -> bool {
        self.first.supports_orientation() && self.second.supports_orientation()
    }

    fn name(&self) -> String {
        format!("{} + {}", self.first.name(), self.second.name())
    }
}

/// Factory of a frame to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityFactory;

impl TransformFactory for IdentityFactory {
    fn cost(&self, _epoch: &Epoch) -> f64 {
        0.0
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        TransformationParameters::identity(*epoch)
    }
}

/// Folds a chain of factories left to right into one factory.
///
/// An empty chain is the identity, a single factory is returned as is.
pub fn compose_all(chain: &[FactoryRef]) -> FactoryRef {
    let mut hops = chain.iter();
    let Some(first) = hops.next() else {
        return Arc::new(IdentityFactory);
    };
    hops.fold(first.clone(), |acc, next| {
        trace!("Composing {} with {}", acc.name(), next.name());
        acc.add(next)
    })
}
