//! Captured reference poses and the toggle-based capture state machine.
//!
//! Every named point is either unrecorded (its pose is ignored) or recorded.
//! Capturing an unrecorded point reads the current pose and records it;
//! capturing a recorded point un-records it without touching the pose.
//! Midpoints form an ordered list that only grows at the end and shrinks
//! from the end.

use crate::label::{format_label, parse_coordinates, parse_point_ref, PointKind, PointRef};
use polishkit_core::{AdapterError, PathStyle, PointError, Pose, ToolAxis};
use tracing::{debug, warn};

/// Lift used to derive the aux begin/end points, mm along tool Z
pub const DEFAULT_LIFT_OFFSET: f64 = -30.0;

/// A named point and its recorded flag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaughtPoint {
    pose: Pose,
    recorded: bool,
}

impl TaughtPoint {
    /// The pose, if recorded
    pub fn get(&self) -> Option<&Pose> {
        self.recorded.then_some(&self.pose)
    }

    /// Whether the point is recorded
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}

/// Result of a named-point capture
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Recorded flag after the call
    pub recorded: bool,
    /// Label of the recorded point, empty when nothing was recorded
    pub label: String,
}

/// Result of a midpoint capture
#[derive(Debug, Clone, PartialEq)]
pub struct MidCapture {
    /// Number of midpoints after the call
    pub count: usize,
    /// Label of the appended midpoint, empty on delete or failure
    pub label: String,
}

/// One capture session
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    safe: TaughtPoint,
    begin: TaughtPoint,
    end: TaughtPoint,
    aux: TaughtPoint,
    begin_offset: TaughtPoint,
    end_offset: TaughtPoint,
    aux_begin: Pose,
    aux_end: Pose,
    mid_points: Vec<Pose>,
    lift_offset: f64,
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PointSet {
    /// Create an empty session
    pub fn new() -> Self {
        Self::with_lift_offset(DEFAULT_LIFT_OFFSET)
    }

    /// Create an empty session deriving aux begin/end with `lift_offset`
    pub fn with_lift_offset(lift_offset: f64) -> Self {
        Self {
            safe: TaughtPoint::default(),
            begin: TaughtPoint::default(),
            end: TaughtPoint::default(),
            aux: TaughtPoint::default(),
            begin_offset: TaughtPoint::default(),
            end_offset: TaughtPoint::default(),
            aux_begin: Pose::default(),
            aux_end: Pose::default(),
            mid_points: Vec::new(),
            lift_offset,
        }
    }

    fn slot(&self, kind: PointKind) -> Option<&TaughtPoint> {
        match kind {
            PointKind::Safe => Some(&self.safe),
            PointKind::Begin => Some(&self.begin),
            PointKind::End => Some(&self.end),
            PointKind::Aux => Some(&self.aux),
            PointKind::BeginOffset => Some(&self.begin_offset),
            PointKind::EndOffset => Some(&self.end_offset),
            PointKind::Mid => None,
        }
    }

    fn slot_mut(&mut self, kind: PointKind) -> Option<&mut TaughtPoint> {
        match kind {
            PointKind::Safe => Some(&mut self.safe),
            PointKind::Begin => Some(&mut self.begin),
            PointKind::End => Some(&mut self.end),
            PointKind::Aux => Some(&mut self.aux),
            PointKind::BeginOffset => Some(&mut self.begin_offset),
            PointKind::EndOffset => Some(&mut self.end_offset),
            PointKind::Mid => None,
        }
    }

    /// Recorded pose of a named point
    pub fn pose(&self, kind: PointKind) -> Option<&Pose> {
        self.slot(kind).and_then(TaughtPoint::get)
    }

    /// Recorded pose of a named point, or the missing-point error
    pub fn require(&self, kind: PointKind) -> Result<&Pose, PointError> {
        self.pose(kind).ok_or_else(|| PointError::Missing {
            names: vec![kind.display_name().to_string()],
        })
    }

    /// Whether a point is recorded; for [`PointKind::Mid`], whether any are
    pub fn is_recorded(&self, kind: PointKind) -> bool {
        match self.slot(kind) {
            Some(point) => point.is_recorded(),
            None => !self.mid_points.is_empty(),
        }
    }

    /// Recorded midpoints in capture order
    pub fn mid_points(&self) -> &[Pose] {
        &self.mid_points
    }

    /// Begin point lifted along tool Z
    pub fn aux_begin(&self) -> &Pose {
        &self.aux_begin
    }

    /// End point lifted along tool Z
    pub fn aux_end(&self) -> &Pose {
        &self.aux_end
    }

    /// Record `pose` for a point. Midpoints are appended.
    pub fn record(&mut self, kind: PointKind, pose: Pose) {
        match kind {
            PointKind::Mid => self.mid_points.push(pose),
            PointKind::Begin => {
                self.aux_begin = pose.offset_along_tool(ToolAxis::Z, self.lift_offset);
                self.begin = TaughtPoint {
                    pose,
                    recorded: true,
                };
            }
            PointKind::End => {
                self.aux_end = pose.offset_along_tool(ToolAxis::Z, self.lift_offset);
                self.end = TaughtPoint {
                    pose,
                    recorded: true,
                };
            }
            _ => {
                if let Some(slot) = self.slot_mut(kind) {
                    *slot = TaughtPoint {
                        pose,
                        recorded: true,
                    };
                }
            }
        }
    }

    /// Clear the recorded flag of a named point, keeping its pose
    pub fn unrecord(&mut self, kind: PointKind) {
        if let Some(slot) = self.slot_mut(kind) {
            slot.recorded = false;
        }
    }

    /// Toggle a named point.
    ///
    /// A recorded point is un-recorded and `read_pose` is not called. An
    /// unrecorded point is recorded with the pose `read_pose` returns; if the
    /// read fails the point stays unrecorded.
    pub fn capture<F>(&mut self, kind: PointKind, read_pose: F) -> Capture
    where
        F: FnOnce() -> Result<Pose, AdapterError>,
    {
        if kind == PointKind::Mid {
            let mid = self.capture_mid(0, u64::MAX, read_pose);
            return Capture {
                recorded: !mid.label.is_empty(),
                label: mid.label,
            };
        }

        if self.is_recorded(kind) {
            self.unrecord(kind);
            debug!("{} un-recorded", kind);
            return Capture {
                recorded: false,
                label: String::new(),
            };
        }

        match read_pose() {
            Ok(pose) => {
                self.record(kind, pose);
                let label = format_label(PointRef::named(kind), &pose);
                debug!("Captured {}", label);
                Capture {
                    recorded: true,
                    label,
                }
            }
            Err(e) => {
                warn!("Failed to capture {}: {}", kind, e);
                Capture {
                    recorded: false,
                    label: String::new(),
                }
            }
        }
    }

    /// Append a midpoint, or delete the last one on a long press.
    ///
    /// A press longer than `delete_threshold_ms` removes the last midpoint
    /// instead of capturing a new one.
    pub fn capture_mid<F>(
        &mut self,
        press_duration_ms: u64,
        delete_threshold_ms: u64,
        read_pose: F,
    ) -> MidCapture
    where
        F: FnOnce() -> Result<Pose, AdapterError>,
    {
        if press_duration_ms > delete_threshold_ms {
            let count = self.delete_last_mid();
            return MidCapture {
                count,
                label: String::new(),
            };
        }

        match read_pose() {
            Ok(pose) => {
                self.mid_points.push(pose);
                let count = self.mid_points.len();
                let label = format_label(PointRef::mid(count), &pose);
                debug!("Captured {}", label);
                MidCapture { count, label }
            }
            Err(e) => {
                warn!("Failed to capture midpoint: {}", e);
                MidCapture {
                    count: self.mid_points.len(),
                    label: String::new(),
                }
            }
        }
    }

    /// Replace the point a label refers to with a freshly read pose.
    ///
    /// Returns the new label. Unknown labels, out-of-range midpoints and
    /// failed reads leave the session untouched and return the old label.
    pub fn cover<F>(&mut self, label: &str, read_pose: F) -> String
    where
        F: FnOnce() -> Result<Pose, AdapterError>,
    {
        let point = match self.resolve(label) {
            Ok(point) => point,
            Err(e) => {
                warn!("Cannot cover point: {}", e);
                return label.to_string();
            }
        };

        let pose = match read_pose() {
            Ok(pose) => pose,
            Err(e) => {
                warn!("Failed to cover {}: {}", point.kind, e);
                return label.to_string();
            }
        };

        match point.index {
            Some(index) => {
                if let Some(slot) = self.mid_points.get_mut(index - 1) {
                    *slot = pose;
                }
            }
            None => {
                let recorded = self.is_recorded(point.kind);
                self.record(point.kind, pose);
                if !recorded {
                    self.unrecord(point.kind);
                }
            }
        }

        format_label(point, &pose)
    }

    /// Resolve a label to a point that exists in this session
    pub fn resolve(&self, label: &str) -> Result<PointRef, PointError> {
        let point = parse_point_ref(label)?;
        if let Some(index) = point.index {
            if index > self.mid_points.len() {
                return Err(PointError::MidPointOutOfRange {
                    index,
                    count: self.mid_points.len(),
                });
            }
        }
        Ok(point)
    }

    /// Record the point a saved label describes.
    ///
    /// Midpoint labels must either replace an existing midpoint or append
    /// the next one.
    pub fn restore(&mut self, label: &str) -> Result<PointRef, PointError> {
        let point = parse_point_ref(label)?;
        let pose = parse_coordinates(label)?;
        match point.index {
            Some(index) if index >= 1 && index <= self.mid_points.len() => {
                self.mid_points[index - 1] = pose;
            }
            Some(index) if index == self.mid_points.len() + 1 => self.mid_points.push(pose),
            Some(index) => {
                return Err(PointError::MidPointOutOfRange {
                    index,
                    count: self.mid_points.len(),
                })
            }
            None => self.record(point.kind, pose),
        }
        Ok(point)
    }

    /// Label of a recorded point
    pub fn label(&self, point: PointRef) -> Option<String> {
        let pose = match point.index {
            Some(index) => self.mid_points.get(index.checked_sub(1)?)?,
            None => self.pose(point.kind)?,
        };
        Some(format_label(point, pose))
    }

    /// Labels of every recorded point, named points first
    pub fn labels(&self) -> Vec<String> {
        let named = [
            PointKind::Safe,
            PointKind::Begin,
            PointKind::End,
            PointKind::Aux,
            PointKind::BeginOffset,
            PointKind::EndOffset,
        ]
        .into_iter()
        .filter_map(|kind| self.label(PointRef::named(kind)));

        let mids = (1..=self.mid_points.len()).filter_map(|i| self.label(PointRef::mid(i)));

        named.chain(mids).collect()
    }

    /// Un-record every point and drop all midpoints
    pub fn clear_all(&mut self) {
        for kind in PointKind::NAMED {
            self.unrecord(kind);
        }
        self.mid_points.clear();
    }

    /// Drop all midpoints
    pub fn clear_mid(&mut self) {
        self.mid_points.clear();
    }

    /// Drop the last midpoint and return how many remain
    pub fn delete_last_mid(&mut self) -> usize {
        self.mid_points.pop();
        self.mid_points.len()
    }

    /// Points a style needs that have not been recorded
    pub fn missing_points(&self, style: PathStyle) -> Vec<PointKind> {
        let mut required = vec![PointKind::Safe, PointKind::Begin, PointKind::End];

        if style.is_region() {
            required.push(PointKind::EndOffset);
        }
        if style.is_region() || style.is_cylinder() {
            required.push(PointKind::BeginOffset);
        }
        if style.is_region() || style.is_cylinder() || style == PathStyle::Arc {
            required.push(PointKind::Mid);
        }
        if matches!(style, PathStyle::ZLine | PathStyle::SpiralLine) {
            required.push(PointKind::Aux);
        }

        required
            .into_iter()
            .filter(|kind| !self.is_recorded(*kind))
            .collect()
    }

    /// Check that everything `style` needs is recorded.
    ///
    /// Arc based styles also need an odd number of midpoints, since they are
    /// consumed as (aux, end) pairs with the end point closing the last pair.
    pub fn check_all_points(&self, style: PathStyle) -> Result<(), PointError> {
        let missing = self.missing_points(style);
        if !missing.is_empty() {
            return Err(PointError::Missing {
                names: missing
                    .iter()
                    .map(|kind| kind.display_name().to_string())
                    .collect(),
            });
        }

        if style.needs_odd_mid_points() && self.mid_points.len() % 2 == 0 {
            return Err(PointError::EvenMidPointCount {
                count: self.mid_points.len(),
            });
        }

        Ok(())
    }
}
