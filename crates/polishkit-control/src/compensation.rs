//! Tool length compensation.
//!
//! The robot reports the flange-side TCP; the taught points are stored at
//! the disc face. Captures push the TCP forward along tool Z by the head
//! extension plus the disc thickness, moves pull targets back by the teach
//! reference plus the disc thickness.

use polishkit_core::{Pose, ToolAxis};

/// Head extension units per mm
pub const HEAD_UNITS_PER_MM: f64 = 100.0;

/// Disc geometry and the reference extension used while teaching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCompensation {
    /// Head extension while teaching, mm
    pub teach_reference_mm: f64,
    /// Polishing disc thickness, mm
    pub disc_thickness_mm: f64,
}

impl ToolCompensation {
    pub fn new(teach_reference_mm: f64, disc_thickness_mm: f64) -> Self {
        Self {
            teach_reference_mm,
            disc_thickness_mm,
        }
    }

    /// Pose of the disc face for a TCP pose read while teaching.
    ///
    /// Uses the measured head extension when one is available.
    pub fn captured(&self, tcp: &Pose, head_position: Option<i32>) -> Pose {
        let extension = match head_position {
            Some(units) => f64::from(units) / HEAD_UNITS_PER_MM,
            None => self.teach_reference_mm,
        };
        tcp.offset_along_tool(ToolAxis::Z, extension + self.disc_thickness_mm)
    }

    /// TCP target that puts the disc face on `target`
    pub fn commanded(&self, target: &Pose) -> Pose {
        target.offset_along_tool(ToolAxis::Z, -self.offset_mm())
    }

    /// Total offset applied to moves, mm
    pub fn offset_mm(&self) -> f64 {
        self.teach_reference_mm + self.disc_thickness_mm
    }

    /// Head target position for the teach reference
    pub fn head_units(&self) -> i32 {
        (self.teach_reference_mm * HEAD_UNITS_PER_MM).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_then_command_is_identity_at_reference() {
        let comp = ToolCompensation::new(7.0, 3.0);
        let tcp = Pose::new(100.0, 50.0, 20.0, 180.0, 0.0, 45.0);
        let face = comp.captured(&tcp, None);
        let back = comp.commanded(&face);
        assert!((back.pos - tcp.pos).norm() < 1e-9);
    }

    #[test]
    fn test_capture_uses_head_position() {
        let comp = ToolCompensation::new(7.0, 0.0);
        // tool Z pointing down
        let tcp = Pose::new(0.0, 0.0, 100.0, 180.0, 0.0, 0.0);
        let face = comp.captured(&tcp, Some(1250));
        assert!((face.pos.z - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_head_units() {
        assert_eq!(ToolCompensation::new(7.0, 0.0).head_units(), 700);
        assert_eq!(ToolCompensation::new(6.5, 0.0).head_units(), 650);
    }
}
