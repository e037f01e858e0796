//! Declarative description of a frame graph.
//!
//! The description is written in RON and lists the frames first, then the
//! factories connecting them by frame name:
//!
//! ```ron
//! (
//!     reference_epoch: 0.0,
//!     frames: [
//!         (name: "ICRF", category: Inertial),
//!         (name: "ITRF", category: BodyFixed),
//!     ],
//!     transforms: [
//!         (
//!             src: "ICRF",
//!             dst: "ITRF",
//!             factory: Helmert((epoch: 0.0, rotation_rate: (0.0, 0.0, 7.292115e-5))),
//!         ),
//!     ],
//! )
//! ```
//!
//! Vectors are `(x, y, z)` tuples in SI units unless stated otherwise. Epochs
//! are seconds past J2000.

use crate::epoch::Epoch;
use crate::error::{FrameGraphError, FrameResult};
use crate::factories::{HelmertFactory, KinematicFactory, TranslationFactory};
use crate::factory::{FactoryRef, INVERSE_COST_OVERHEAD};
use crate::frames::{FrameCategory, FrameRef, ReferenceFrame};
use crate::graph::{FrameGraph, FrameGraphBuilder, GraphSettings};
use crate::parameters::TransformationParameters;
use log::debug;
use nalgebra::{UnitQuaternion, Vector3};
use ron::extensions::Extensions;
use ron::Options;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

pub type Vec3Config = (f64, f64, f64);

fn vector(v: Vec3Config) -> Vector3<f64> {
    Vector3::new(v.0, v.1, v.2)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameConfig {
    pub name: String,
    #[serde(default)]
    pub category: FrameCategory,
}

/// Units of the Helmert parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HelmertUnits {
    /// m, -, rad and their rates per second
    #[default]
    Si,
    /// mm, ppb, mas and their rates per Julian year
    Iers,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HelmertConfig {
    /// Reference epoch of the parameters
    pub epoch: f64,
    #[serde(default)]
    pub units: HelmertUnits,
    #[serde(default)]
    pub translation: Vec3Config,
    #[serde(default)]
    pub scale: f64,
    /// Rotation axis scaled by the angle
    #[serde(default)]
    pub rotation: Vec3Config,
    #[serde(default)]
    pub translation_rate: Vec3Config,
    #[serde(default)]
    pub scale_rate: f64,
    #[serde(default)]
    pub rotation_rate: Vec3Config,
}

/// Kinematic parameters that do not change with the epoch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub translation: Vec3Config,
    #[serde(default)]
    pub velocity: Vec3Config,
    #[serde(default)]
    pub acceleration: Vec3Config,
    /// Rotation axis scaled by the angle [rad]
    #[serde(default)]
    pub rotation: Vec3Config,
    #[serde(default)]
    pub rotation_rate: Vec3Config,
    #[serde(default)]
    pub rotation_acceleration: Vec3Config,
}

/// Origin shift moving with constant acceleration from `epoch`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<f64>,
    pub offset: Vec3Config,
    #[serde(default)]
    pub velocity: Vec3Config,
    #[serde(default)]
    pub acceleration: Vec3Config,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactoryConfig {
    Helmert(HelmertConfig),
    Constant(ConstantConfig),
    Translation(TranslationConfig),
}

impl FactoryConfig {
    pub fn instantiate(&self) -> FactoryRef {
        match self {
            FactoryConfig::Helmert(helmert) => {
                let epoch = Epoch::from_seconds_since_j2000(helmert.epoch);
                let factory = match helmert.units {
                    HelmertUnits::Si => HelmertFactory::new(
                        epoch,
                        vector(helmert.translation),
                        helmert.scale,
                        vector(helmert.rotation),
                        vector(helmert.translation_rate),
                        helmert.scale_rate,
                        vector(helmert.rotation_rate),
                    ),
                    HelmertUnits::Iers => HelmertFactory::from_iers_units(
                        epoch,
                        vector(helmert.translation),
                        helmert.scale,
                        vector(helmert.rotation),
                        vector(helmert.translation_rate),
                        helmert.scale_rate,
                        vector(helmert.rotation_rate),
                    ),
                };
                Arc::new(factory)
            }
            FactoryConfig::Constant(constant) => {
                let parameters = TransformationParameters::new(
                    Epoch::J2000,
                    vector(constant.translation),
                    vector(constant.velocity),
                    vector(constant.acceleration),
                    UnitQuaternion::from_scaled_axis(vector(constant.rotation)),
                    vector(constant.rotation_rate),
                    vector(constant.rotation_acceleration),
                );
                let cost = constant.cost.unwrap_or(KinematicFactory::DEFAULT_COST);
                Arc::new(KinematicFactory::new(cost, move |epoch: &Epoch| {
                    parameters.at_epoch(*epoch)
                }))
            }
            FactoryConfig::Translation(translation) => Arc::new(TranslationFactory::linear(
                translation
                    .epoch
                    .map(Epoch::from_seconds_since_j2000)
                    .unwrap_or(Epoch::J2000),
                vector(translation.offset),
                vector(translation.velocity),
                vector(translation.acceleration),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    pub src: String,
    pub dst: String,
    /// Also attach the generic inverse from `dst` to `src`. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
    pub factory: FactoryConfig,
}

impl TransformConfig {
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional.unwrap_or(true)
    }
}

/// Root of a frame graph description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameGraphConfig {
    /// Epoch at which edge costs are evaluated, seconds past J2000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_epoch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_cost_overhead: Option<f64>,
    pub frames: Vec<FrameConfig>,
    #[serde(default)]
    pub transforms: Vec<TransformConfig>,
}

impl FrameGraphConfig {
    fn get_options() -> Options {
        Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .with_default_extension(Extensions::UNWRAP_NEWTYPES)
    }

    pub fn serialize_ron(&self) -> FrameResult<String> {
        let ron = Self::get_options();
        let pretty = ron::ser::PrettyConfig::default();
        Ok(ron.to_string_pretty(&self, pretty)?)
    }

    pub fn deserialize_ron(ron: &str) -> FrameResult<Self> {
        Ok(Self::get_options().from_str(ron)?)
    }

    pub fn settings(&self) -> FrameResult<GraphSettings> {
        let reference_epoch = match self.reference_epoch {
            Some(seconds) if !seconds.is_finite() => {
                return Err(FrameGraphError::InvalidConfiguration(format!(
                    "reference_epoch must be finite, got {seconds}"
                )))
            }
            Some(seconds) => Epoch::from_seconds_since_j2000(seconds),
            None => Epoch::J2000,
        };
        let inverse_cost_overhead = self.inverse_cost_overhead.unwrap_or(INVERSE_COST_OVERHEAD);
        if inverse_cost_overhead.is_nan() || inverse_cost_overhead < 0.0 {
            return Err(FrameGraphError::InvalidConfiguration(format!(
                "inverse_cost_overhead must be a non-negative number, got {inverse_cost_overhead}"
            )));
        }
        Ok(GraphSettings {
            reference_epoch,
            inverse_cost_overhead,
        })
    }

    /// Builds and freezes the described graph.
    pub fn build(&self) -> FrameResult<FrameGraph> {
        let mut builder = FrameGraphBuilder::with_settings(self.settings()?);
        let mut frames: HashMap<&str, FrameRef> = HashMap::with_capacity(self.frames.len());

        for frame in &self.frames {
            if frames.contains_key(frame.name.as_str()) {
                return Err(FrameGraphError::InvalidConfiguration(format!(
                    "frame '{}' is declared twice",
                    frame.name
                )));
            }
            let instance = ReferenceFrame::new(frame.name.clone(), frame.category);
            builder.attach_frame(&instance);
            frames.insert(frame.name.as_str(), instance);
        }

        let lookup = |name: &str| {
            frames.get(name).cloned().ok_or_else(|| {
                FrameGraphError::InvalidConfiguration(format!(
                    "transform refers to undeclared frame '{name}'"
                ))
            })
        };

        for transform in &self.transforms {
            let src = lookup(&transform.src)?;
            let dst = lookup(&transform.dst)?;
            let factory = transform.factory.instantiate();
            if transform.is_bidirectional() {
                builder.attach_transform_pair(&src, &dst, factory);
            } else {
                builder.attach_transform(&src, &dst, factory);
            }
        }

        debug!(
            "Built frame graph from configuration: {} frame(s), {} transform(s)",
            self.frames.len(),
            self.transforms.len()
        );
        Ok(builder.freeze())
    }
}

/// Read a frame graph description from a file.
pub fn read_configuration<P: AsRef<Path>>(path: P) -> FrameResult<FrameGraphConfig> {
    let content = read_to_string(path.as_ref())?;
    read_configuration_str(&content)
}

/// Read a frame graph description from a string.
pub fn read_configuration_str(content: &str) -> FrameResult<FrameGraphConfig> {
    FrameGraphConfig::deserialize_ron(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::TransformFactory;
    use crate::frames::selectors;
    use approx::assert_relative_eq;

    const EARTH_SUN: &str = r#"
        (
            frames: [
                (name: "GCRF", category: Inertial),
                (name: "HCRF", category: Inertial),
                (name: "ITRF", category: BodyFixed),
            ],
            transforms: [
                (
                    src: "GCRF",
                    dst: "HCRF",
                    factory: Helmert((epoch: 0.0, translation: (1.495978707e11, 0.0, 0.0))),
                ),
                (
                    src: "GCRF",
                    dst: "ITRF",
                    bidirectional: false,
                    factory: Constant((rotation_rate: (0.0, 0.0, 7.292115e-5))),
                ),
            ],
        )
    "#;

    #[test]
    fn test_read_and_build() {
        let config = read_configuration_str(EARTH_SUN).unwrap();
        assert_eq!(config.frames.len(), 3);
        assert_eq!(config.frames[2].category, FrameCategory::BodyFixed);
        assert!(config.transforms[0].is_bidirectional());
        assert!(!config.transforms[1].is_bidirectional());

        let graph = config.build().unwrap();
        assert_eq!(graph.frame_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let to_sun = graph
            .get_transform_by(
                selectors::named("GCRF"),
                selectors::named("HCRF"),
                &Epoch::J2000,
            )
            .unwrap();
        assert_relative_eq!(
            to_sun.transform_position(&Vector3::zeros()),
            Vector3::new(1.495978707e11, 0.0, 0.0)
        );

        let err = graph
            .get_transform_by(
                selectors::named("ITRF"),
                selectors::named("GCRF"),
                &Epoch::J2000,
            )
            .unwrap_err();
        assert!(matches!(err, FrameGraphError::NoTransformPath { .. }));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = read_configuration_str(EARTH_SUN).unwrap();
        let serialized = config.serialize_ron().unwrap();
        let reread = read_configuration_str(&serialized).unwrap();
        assert_eq!(config, reread);
    }

    #[test]
    fn test_unknown_frame_is_rejected() {
        let config = read_configuration_str(
            r#"(
                frames: [(name: "A")],
                transforms: [(src: "A", dst: "B", factory: Translation((offset: (1.0, 0.0, 0.0))))],
            )"#,
        )
        .unwrap();
        assert_eq!(config.frames[0].category, FrameCategory::Other);
        match config.build() {
            Err(FrameGraphError::InvalidConfiguration(message)) => assert!(message.contains("'B'")),
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_frame_is_rejected() {
        let config = read_configuration_str(r#"(frames: [(name: "A"), (name: "A")])"#).unwrap();
        assert!(matches!(
            config.build(),
            Err(FrameGraphError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_settings_are_rejected() {
        let config = FrameGraphConfig {
            inverse_cost_overhead: Some(-1.0),
            ..FrameGraphConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(FrameGraphError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            read_configuration_str("(frames: [(name: )])"),
            Err(FrameGraphError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_iers_units() {
        let factory = FactoryConfig::Helmert(HelmertConfig {
            units: HelmertUnits::Iers,
            translation: (1000.0, 0.0, 0.0),
            ..HelmertConfig::default()
        })
        .instantiate();
        let p = factory.parameters(&Epoch::J2000);
        assert_relative_eq!(p.translation, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_configuration("/definitely/not/here.ron"),
            Err(FrameGraphError::Io(_))
        ));
    }
}
