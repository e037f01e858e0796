//! Reference frames and the selectors used to find them in a frame graph.
//!
//! A [`ReferenceFrame`] is an opaque vertex compared by identity only: two
//! frames with the same name are still two different frames. Frames are shared
//! as [`FrameRef`] and the frame graph keys them on the `Arc` allocation.
//!
//! Well-known frames can be given a compile-time [`FrameTag`] so selectors can
//! find them without string matching on names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle on a reference frame. Identity is the allocation.
pub type FrameRef = Arc<ReferenceFrame>;

/// Coarse classification of a frame, used by selectors and diagnostics only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameCategory {
    Inertial,
    BodyFixed,
    Rotating,
    Topocentric,
    #[default]
    Other,
}

/// Trait for compile-time frame identification
pub trait FrameTag: fmt::Debug + Clone + Copy + PartialEq + Eq + 'static {
    /// Human-readable name, also used as the frame name
    const NAME: &'static str;

    const CATEGORY: FrameCategory;
}

#[derive(Debug)]
pub struct ReferenceFrame {
    name: String,
    category: FrameCategory,
    tag: Option<&'static str>,
}

impl ReferenceFrame {
    pub fn new(name: impl Into<String>, category: FrameCategory) -> FrameRef {
        Arc::new(Self {
            name: name.into(),
            category,
            tag: None,
        })
    }

    /// Creates a new frame instance for a well-known frame tag.
    pub fn tagged<T: FrameTag>() -> FrameRef {
        Arc::new(Self {
            name: T::NAME.to_string(),
            category: T::CATEGORY,
            tag: Some(T::NAME),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> FrameCategory {
        self.category
    }

    pub fn is<T: FrameTag>(&self) -> bool {
        self.tag == Some(T::NAME)
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// International Celestial Reference Frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icrf;

impl FrameTag for Icrf {
    const NAME: &'static str = "ICRF";
    const CATEGORY: FrameCategory = FrameCategory::Inertial;
}

/// Geocentric Celestial Reference Frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gcrf;

impl FrameTag for Gcrf {
    const NAME: &'static str = "GCRF";
    const CATEGORY: FrameCategory = FrameCategory::Inertial;
}

/// Earth mean equator and equinox of J2000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eme2000;

impl FrameTag for Eme2000 {
    const NAME: &'static str = "EME2000";
    const CATEGORY: FrameCategory = FrameCategory::Inertial;
}

/// International Terrestrial Reference Frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Itrf;

impl FrameTag for Itrf {
    const NAME: &'static str = "ITRF";
    const CATEGORY: FrameCategory = FrameCategory::BodyFixed;
}

/// Heliocentric mean ecliptic of J2000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeliocentricEcliptic;

impl FrameTag for HeliocentricEcliptic {
    const NAME: &'static str = "HeliocentricEcliptic";
    const CATEGORY: FrameCategory = FrameCategory::Inertial;
}

/// Predicates over attached frames.
///
/// The graph scans frames in insertion order and stops at the first match, so a
/// selector should be written to match a single frame.
pub mod selectors {
    use super::{FrameCategory, FrameRef, FrameTag, ReferenceFrame};
    use std::sync::Arc;

    /// Matches exactly this frame instance.
    pub fn exact(frame: &FrameRef) -> impl Fn(&ReferenceFrame) -> bool {
        let target = Arc::as_ptr(frame);
        move |candidate| std::ptr::eq(candidate, target)
    }

    pub fn named(name: impl Into<String>) -> impl Fn(&ReferenceFrame) -> bool {
        let name = name.into();
        move |candidate| candidate.name() == name
    }

    pub fn in_category(category: FrameCategory) -> impl Fn(&ReferenceFrame) -> bool {
        move |candidate| candidate.category() == category
    }

    pub fn tagged<T: FrameTag>() -> impl Fn(&ReferenceFrame) -> bool {
        |candidate| candidate.is::<T>()
    }
}
