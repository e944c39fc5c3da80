//! Polishing recipes
//!
//! A [`Craft`] bundles the speeds, forces and path-style parameters of one
//! polishing operation. Recipes are edited by the configuration layer and
//! read-only while a run is executing.

use crate::error::CraftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Head control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolishMode {
    /// Constant force (moment) control
    Moment,
    /// Position control
    #[default]
    Position,
}

impl fmt::Display for PolishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moment => write!(f, "moment"),
            Self::Position => write!(f, "position"),
        }
    }
}

/// Which side of a cylinder the disc works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Outside of a barrel
    #[default]
    Convex,
    /// Inside of a bore
    Concave,
}

impl Surface {
    /// Sign applied to normals and axes
    pub fn sign(self) -> f64 {
        match self {
            Surface::Convex => 1.0,
            Surface::Concave => -1.0,
        }
    }
}

/// Path style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// Circular moves through midpoint pairs
    #[default]
    Arc,
    /// Linear moves through the midpoints
    Line,
    /// Concentric arc passes at growing radial offsets
    RegionArcHorizontal,
    /// Up/down strokes along an arc-length parameterized boundary
    RegionArcVertical,
    /// Vertical strokes revisited at every segment
    RegionArcVerticalRepeat,
    /// Ruled-surface sweeps with one shared offset vector
    RegionArc1,
    /// Ruled-surface sweeps with per-edge offset vectors
    RegionArc2,
    /// Full-arc passes around a barrel
    CylinderHorizontal(Surface),
    /// Strokes along a barrel's axis
    CylinderVertical(Surface),
    /// Zigzag between the begin→end line and the aux offset
    ZLine,
    /// Alternating small and large arcs from begin to end
    SpiralLine,
}

impl PathStyle {
    /// All styles, cylinder styles listed for both surfaces
    pub const ALL: [PathStyle; 13] = [
        PathStyle::Arc,
        PathStyle::Line,
        PathStyle::RegionArcHorizontal,
        PathStyle::RegionArcVertical,
        PathStyle::RegionArcVerticalRepeat,
        PathStyle::RegionArc1,
        PathStyle::RegionArc2,
        PathStyle::CylinderHorizontal(Surface::Convex),
        PathStyle::CylinderHorizontal(Surface::Concave),
        PathStyle::CylinderVertical(Surface::Convex),
        PathStyle::CylinderVertical(Surface::Concave),
        PathStyle::ZLine,
        PathStyle::SpiralLine,
    ];

    /// Region arc family
    pub fn is_region(self) -> bool {
        matches!(
            self,
            PathStyle::RegionArcHorizontal
                | PathStyle::RegionArcVertical
                | PathStyle::RegionArcVerticalRepeat
                | PathStyle::RegionArc1
                | PathStyle::RegionArc2
        )
    }

    /// Cylinder family
    pub fn is_cylinder(self) -> bool {
        matches!(
            self,
            PathStyle::CylinderHorizontal(_) | PathStyle::CylinderVertical(_)
        )
    }

    /// Styles whose midpoints are consumed as (aux, end) arc pairs
    pub fn needs_odd_mid_points(self) -> bool {
        self == PathStyle::Arc || self.is_region() || self.is_cylinder()
    }

    /// Styles that move onto the surface themselves instead of using the
    /// orchestrator's approach to the begin point
    pub fn has_own_entry(self) -> bool {
        matches!(
            self,
            PathStyle::RegionArcVertical | PathStyle::RegionArcVerticalRepeat
        ) || self.is_cylinder()
    }

    /// Styles that enter at the untilted begin point
    pub fn enters_untilted(self) -> bool {
        matches!(self, PathStyle::RegionArc1 | PathStyle::RegionArc2)
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arc => write!(f, "arc"),
            Self::Line => write!(f, "line"),
            Self::RegionArcHorizontal => write!(f, "region arc horizontal"),
            Self::RegionArcVertical => write!(f, "region arc vertical"),
            Self::RegionArcVerticalRepeat => write!(f, "region arc vertical repeat"),
            Self::RegionArc1 => write!(f, "region arc 1"),
            Self::RegionArc2 => write!(f, "region arc 2"),
            Self::CylinderHorizontal(s) => write!(f, "cylinder horizontal ({s:?})"),
            Self::CylinderVertical(s) => write!(f, "cylinder vertical ({s:?})"),
            Self::ZLine => write!(f, "z line"),
            Self::SpiralLine => write!(f, "spiral line"),
        }
    }
}

/// Named polishing recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Craft {
    /// Recipe name
    pub name: String,
    /// Head control mode
    pub mode: PolishMode,
    /// Path style
    pub way: PathStyle,
    /// Distance from the flange reference to the disc face while teaching, mm
    pub teach_reference_mm: f64,
    /// Speed used to enter and leave the surface
    pub cut_in_speed: f64,
    /// Speed along the path
    pub move_speed: f64,
    /// Head rotation speed in rpm
    pub rotate_speed: f64,
    /// Touch force in N
    pub contact_force: f64,
    /// Target force in N
    pub setting_force: f64,
    /// Head force ramp time in ms
    pub transition_time_ms: u32,
    /// Blend radius between consecutive moves, mm
    pub transition_radius: f64,
    /// Polishing disc radius, mm
    pub disc_radius: f64,
    /// Lean of the disc into the direction of travel, degrees
    pub grind_angle: f64,
    /// Number of coverage passes or segments
    pub offset_count: u32,
    /// Extra passes beyond the offset edge (region arc 1/2)
    pub add_offset_count: u32,
    /// Number of lift-and-float cycles along vertical strokes
    pub raise_count: u32,
    /// Float perturbations per lift cycle
    pub float_count: u32,
    /// Mirror the cylinder working direction
    pub mirror: bool,
}

impl Default for Craft {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            mode: PolishMode::Position,
            way: PathStyle::Arc,
            teach_reference_mm: 7.0,
            cut_in_speed: 20.0,
            move_speed: 80.0,
            rotate_speed: 4500.0,
            contact_force: 10.0,
            setting_force: 80.0,
            transition_time_ms: 1500,
            transition_radius: 0.0,
            disc_radius: 50.0,
            grind_angle: 0.0,
            offset_count: 0,
            add_offset_count: 0,
            raise_count: 0,
            float_count: 0,
            mirror: false,
        }
    }
}

impl Craft {
    /// Create a default recipe with a name and path style
    pub fn new(name: impl Into<String>, way: PathStyle) -> Self {
        Self {
            name: name.into(),
            way,
            ..Self::default()
        }
    }

    /// Validate recipe values
    pub fn validate(&self) -> Result<(), CraftError> {
        if self.name.trim().is_empty() {
            return Err(CraftError::EmptyName);
        }

        let invalid = |field: &str, reason: &str| CraftError::InvalidValue {
            craft: self.name.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let finite = [
            ("teach_reference_mm", self.teach_reference_mm),
            ("cut_in_speed", self.cut_in_speed),
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("contact_force", self.contact_force),
            ("setting_force", self.setting_force),
            ("transition_radius", self.transition_radius),
            ("disc_radius", self.disc_radius),
            ("grind_angle", self.grind_angle),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, "must be finite"));
        }

        if self.cut_in_speed <= 0.0 {
            return Err(invalid("cut_in_speed", "must be > 0"));
        }
        if self.move_speed <= 0.0 {
            return Err(invalid("move_speed", "must be > 0"));
        }
        if self.rotate_speed < 0.0 {
            return Err(invalid("rotate_speed", "must be >= 0"));
        }
        if self.disc_radius <= 0.0 {
            return Err(invalid("disc_radius", "must be > 0"));
        }
        if self.transition_radius < 0.0 {
            return Err(invalid("transition_radius", "must be >= 0"));
        }

        Ok(())
    }
}
