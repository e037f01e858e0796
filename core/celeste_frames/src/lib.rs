//! Reference frame graph.
//!
//! Frames are attached to a [`FrameGraphBuilder`] and connected by transform
//! factories. Once frozen, the [`FrameGraph`] finds the cheapest chain of
//! factories between any two frames, fuses it into a single factory and
//! evaluates it at an epoch into a [`Transform`] that moves positions,
//! velocities, accelerations and orientations from one frame to the other.
//!
//! ```
//! use celeste_frames::{Epoch, FrameCategory, FrameGraphBuilder, HelmertFactory, ReferenceFrame};
//! use nalgebra::Vector3;
//! use std::sync::Arc;
//!
//! let earth = ReferenceFrame::new("Earth", FrameCategory::Inertial);
//! let sun = ReferenceFrame::new("Sun", FrameCategory::Inertial);
//!
//! let mut builder = FrameGraphBuilder::new();
//! builder.attach_frame(&earth);
//! builder.attach_frame(&sun);
//! builder.attach_transform_pair(
//!     &earth,
//!     &sun,
//!     Arc::new(HelmertFactory::new(
//!         Epoch::J2000,
//!         Vector3::new(1.495978707e11, 0.0, 0.0),
//!         0.0,
//!         Vector3::zeros(),
//!         Vector3::zeros(),
//!         0.0,
//!         Vector3::zeros(),
//!     )),
//! );
//! let graph = builder.freeze();
//!
//! let transform = graph.get_transform(&earth, &sun, &Epoch::J2000)?;
//! assert_eq!(
//!     transform.transform_position(&Vector3::zeros()),
//!     Vector3::new(1.495978707e11, 0.0, 0.0)
//! );
//! # Ok::<(), celeste_frames::FrameGraphError>(())
//! ```

pub mod composite;
pub mod config;
pub mod epoch;
pub mod error;
pub mod factories;
pub mod factory;
pub mod frames;
pub mod graph;
pub mod inverse;
pub mod parameters;
pub mod resolver;
pub mod state;
pub mod transform;

pub use composite::{compose_all, CompositeFactory, IdentityFactory};
pub use config::{read_configuration, read_configuration_str, FrameGraphConfig};
pub use epoch::Epoch;
pub use error::{FrameGraphError, FrameResult, FrameSide};
pub use factories::{HelmertFactory, KinematicFactory, TranslationFactory};
pub use factory::{FactoryRef, TransformFactory, TransformFactoryExt, INVERSE_COST_OVERHEAD};
pub use frames::{selectors, FrameCategory, FrameRef, FrameTag, ReferenceFrame};
pub use frames::{Eme2000, Gcrf, HeliocentricEcliptic, Icrf, Itrf};
pub use graph::{EdgeView, FrameGraph, FrameGraphBuilder, FrameHandle, GraphSettings};
pub use inverse::InverseFactory;
pub use parameters::TransformationParameters;
pub use resolver::ResolvedPath;
pub use state::{CartesianState, CartesianView, KinematicState, OrientationState};
pub use transform::Transform;
