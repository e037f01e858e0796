//! Concrete factory families.
//!
//! Each family implements [`crate::TransformFactory`] directly; chaining and
//! inversion come from the generic composite and inverse factories.

mod helmert;
mod kinematic;
mod translation;

pub use helmert::HelmertFactory;
pub use kinematic::KinematicFactory;
pub use translation::{TranslationFactory, TranslationJet};
