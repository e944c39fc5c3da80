//! Point labels
//!
//! Captured points are reported to the control panel as
//! `"<name><index?>：x、y、z、rx、ry、rz"`. The panel keeps these strings in
//! its history list and hands them back for "cover" and "move to point", so
//! both separators are part of the interchange format.

use polishkit_core::{PointError, Pose};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the point name and its coordinates
pub const NAME_SEPARATOR: char = '：';

/// Separator between coordinates
pub const FIELD_SEPARATOR: char = '、';

/// Kind of taught point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    /// Safe retract point
    Safe,
    /// Begin point
    Begin,
    /// End point
    End,
    /// Auxiliary point for z-line and spiral paths
    Aux,
    /// Begin-side offset point
    BeginOffset,
    /// End-side offset point
    EndOffset,
    /// Ordered midpoints
    Mid,
}

impl PointKind {
    /// Named (non-mid) kinds in label lookup order
    pub const NAMED: [PointKind; 6] = [
        PointKind::Safe,
        PointKind::BeginOffset,
        PointKind::EndOffset,
        PointKind::Begin,
        PointKind::End,
        PointKind::Aux,
    ];

    /// Display name used in labels and validation messages
    pub fn display_name(self) -> &'static str {
        match self {
            PointKind::Safe => "安全点",
            PointKind::Begin => "起始点",
            PointKind::End => "结束点",
            PointKind::Aux => "辅助点",
            PointKind::BeginOffset => "起始偏移点",
            PointKind::EndOffset => "结束偏移点",
            PointKind::Mid => "中间点",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which point a label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    /// Point kind
    pub kind: PointKind,
    /// 1-based midpoint index, `None` for named points
    pub index: Option<usize>,
}

impl PointRef {
    /// Reference to a named point
    pub fn named(kind: PointKind) -> Self {
        Self { kind, index: None }
    }

    /// Reference to the 1-based midpoint `index`
    pub fn mid(index: usize) -> Self {
        Self {
            kind: PointKind::Mid,
            index: Some(index),
        }
    }
}

/// Format a label for a captured point
pub fn format_label(point: PointRef, pose: &Pose) -> String {
    match point.index {
        Some(index) => format!(
            "{}{}{}{}",
            point.kind.display_name(),
            index,
            NAME_SEPARATOR,
            pose
        ),
        None => format!("{}{}{}", point.kind.display_name(), NAME_SEPARATOR, pose),
    }
}

/// Identify the point a label refers to.
pub fn parse_point_ref(label: &str) -> Result<PointRef, PointError> {
    let label = label.trim();
    let unknown = || PointError::UnknownLabel {
        label: label.to_string(),
    };

    if let Some(rest) = label.strip_prefix(PointKind::Mid.display_name()) {
        let digits = rest.split(NAME_SEPARATOR).next().unwrap_or_default();
        let index = digits.trim().parse::<usize>().map_err(|_| unknown())?;
        if index == 0 {
            return Err(unknown());
        }
        return Ok(PointRef::mid(index));
    }

    PointKind::NAMED
        .iter()
        .find(|kind| {
            label
                .strip_prefix(kind.display_name())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(NAME_SEPARATOR))
        })
        .map(|kind| PointRef::named(*kind))
        .ok_or_else(unknown)
}

/// Parse the six coordinates of a label.
///
/// Accepts a full label or a bare coordinate list. Besides `、`, commas and
/// whitespace are accepted between numbers.
pub fn parse_coordinates(text: &str) -> Result<Pose, PointError> {
    let malformed = |reason: String| PointError::MalformedCoordinates {
        label: text.to_string(),
        reason,
    };

    let coords = match text.split_once(NAME_SEPARATOR) {
        Some((_, coords)) => coords,
        None => text,
    };

    let values = coords
        .split(|c: char| c == FIELD_SEPARATOR || c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|e| malformed(format!("'{}': {}", field, e)))
        })
        .collect::<Result<Vec<f64>, PointError>>()?;

    if values.len() != 6 {
        return Err(malformed(format!(
            "expected 6 coordinates, found {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(malformed("coordinates must be finite".to_string()));
    }

    Ok(Pose::new(
        values[0], values[1], values[2], values[3], values[4], values[5],
    ))
}
