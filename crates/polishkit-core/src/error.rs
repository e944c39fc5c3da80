//! Error handling for PolishKit
//!
//! Provides error types for all layers of the planner:
//! - Geometry errors (degenerate circles, spheres and directions)
//! - Point errors (capture session, labels, validation)
//! - Adapter errors (robot arm and polishing head back-ends)
//! - Craft errors (recipe validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised by the geometry kernel when taught points do not define the
/// circle, sphere or direction an algorithm needs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Three points lie on one line, so no circle passes through them
    #[error("Points are collinear, no circumcenter exists")]
    Collinear,

    /// Four points lie in one plane, so no unique sphere passes through them
    #[error("Points are coplanar, no sphere center exists")]
    Coplanar,

    /// A direction or rotation axis has zero length
    #[error("Zero-length {what}")]
    ZeroLength {
        /// What the degenerate vector was meant to be.
        what: String,
    },

    /// Arc with zero radius or zero length
    #[error("Degenerate arc: {reason}")]
    DegenerateArc {
        /// Why the arc is unusable.
        reason: String,
    },
}

/// Point set error type
///
/// Represents failures of the capture session and of point validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointError {
    /// Required points have not been recorded
    #[error("{}未记录", names.join("、"))]
    Missing {
        /// Display names of the missing points.
        names: Vec<String>,
    },

    /// Arc based styles need an odd number of midpoints
    #[error("圆弧中间点数量不能为偶数个！")]
    EvenMidPointCount {
        /// The number of midpoints that were recorded.
        count: usize,
    },

    /// Label does not start with a known point name
    #[error("Unknown point label: {label}")]
    UnknownLabel {
        /// The offending label.
        label: String,
    },

    /// Label coordinates could not be parsed
    #[error("Malformed point coordinates in '{label}': {reason}")]
    MalformedCoordinates {
        /// The offending label.
        label: String,
        /// The reason parsing failed.
        reason: String,
    },

    /// Midpoint index outside the recorded range
    #[error("Midpoint {index} out of range ({count} recorded)")]
    MidPointOutOfRange {
        /// The 1-based index that was requested.
        index: usize,
        /// The number of recorded midpoints.
        count: usize,
    },
}

/// Adapter error type
///
/// Represents failures reported by the robot arm or polishing head back-ends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The device has not been connected
    #[error("{device} not connected")]
    NotConnected {
        /// The device name.
        device: String,
    },

    /// Connection attempt failed
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed {
        /// The address that was tried.
        address: String,
        /// The reason the connection failed.
        reason: String,
    },

    /// The current TCP pose could not be read
    #[error("Pose unavailable: {reason}")]
    PoseUnavailable {
        /// The reason the pose could not be read.
        reason: String,
    },

    /// The device rejected a command
    #[error("Command rejected by {device}: {reason}")]
    CommandRejected {
        /// The device name.
        device: String,
        /// The reason the command was rejected.
        reason: String,
    },
}

/// Craft error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CraftError {
    /// Craft has no name
    #[error("Craft name must not be empty")]
    EmptyName,

    /// A recipe value is out of range
    #[error("Invalid value for '{field}' in craft '{craft}': {reason}")]
    InvalidValue {
        /// The craft name.
        craft: String,
        /// The field name.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Main error type for PolishKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Point set error
    #[error(transparent)]
    Point(#[from] PointError),

    /// Adapter error
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Craft error
    #[error(transparent)]
    Craft(#[from] CraftError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a point validation error
    pub fn is_point_error(&self) -> bool {
        matches!(self, Error::Point(_))
    }

    /// Check if this is an adapter error
    pub fn is_adapter_error(&self) -> bool {
        matches!(self, Error::Adapter(_))
    }

    /// Check if this is a craft error
    pub fn is_craft_error(&self) -> bool {
        matches!(self, Error::Craft(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_points_message() {
        let err = PointError::Missing {
            names: vec!["安全点".to_string(), "中间点".to_string()],
        };
        assert_eq!(err.to_string(), "安全点、中间点未记录");
    }

    #[test]
    fn test_even_mid_point_message() {
        let err = PointError::EvenMidPointCount { count: 2 };
        assert_eq!(err.to_string(), "圆弧中间点数量不能为偶数个！");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GeometryError::Collinear.into();
        assert!(err.is_geometry_error());
        assert!(!err.is_adapter_error());

        let err: Error = AdapterError::NotConnected {
            device: "robot".to_string(),
        }
        .into();
        assert!(err.is_adapter_error());
        assert_eq!(err.to_string(), "robot not connected");
    }
}
