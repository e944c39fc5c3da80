//! Polishing head adapter
//!
//! The head is a force/position controlled spindle. Its registers are written
//! one at a time; the controller owns the order of the writes.

use crate::robot::AdapterResult;
use polishkit_core::PolishMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Control mode of the head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadMode {
    /// Hold a constant contact force
    Force,
    /// Hold a constant spindle extension
    Position,
}

impl From<PolishMode> for HeadMode {
    fn from(mode: PolishMode) -> Self {
        match mode {
            PolishMode::Moment => HeadMode::Force,
            PolishMode::Position => HeadMode::Position,
        }
    }
}

/// Status register of the head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HeadStatus(pub u16);

impl HeadStatus {
    /// Drive enabled
    pub const ENABLED: u16 = 1 << 0;
    /// Fault latched, needs a reset
    pub const FAULT: u16 = 1 << 1;
    /// Target position reached
    pub const IN_POSITION: u16 = 1 << 2;
    /// Target force reached
    pub const FORCE_REACHED: u16 = 1 << 3;
    /// Spindle turning
    pub const ROTATING: u16 = 1 << 4;

    /// Whether every bit of `mask` is set
    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask == mask
    }

    pub fn is_enabled(self) -> bool {
        self.contains(Self::ENABLED)
    }

    pub fn has_fault(self) -> bool {
        self.contains(Self::FAULT)
    }

    /// Set or clear `mask`
    pub fn with(self, mask: u16, on: bool) -> Self {
        if on {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }
}

impl fmt::Display for HeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Capability set of a polishing head
pub trait HeadAdapter: Send + Sync {
    /// Short vendor name for logs
    fn name(&self) -> &str;

    /// Connect to the head at `address`
    fn connect(&self, address: &str) -> AdapterResult<()>;

    /// Clear latched faults
    fn reset(&self) -> AdapterResult<()>;

    /// Enable the drive
    fn enable(&self) -> AdapterResult<()>;

    fn set_mode(&self, mode: HeadMode) -> AdapterResult<()>;

    /// Weight carried by the head, kg
    fn set_load_weight(&self, kg: f64) -> AdapterResult<()>;

    /// Spindle speed, rpm
    fn set_rotation_speed(&self, rpm: f64) -> AdapterResult<()>;

    /// Force applied when touching down, N
    fn set_touch_force(&self, newtons: f64) -> AdapterResult<()>;

    /// Ramp time between force set-points, ms
    fn set_ramp_time(&self, ms: u32) -> AdapterResult<()>;

    /// Force held in force mode, N
    fn set_target_force(&self, newtons: f64) -> AdapterResult<()>;

    /// Extension held in position mode, 0.01 mm units
    fn set_target_position(&self, units: i32) -> AdapterResult<()>;

    fn read_status(&self) -> AdapterResult<HeadStatus>;

    /// Current extension, 0.01 mm units
    fn read_position(&self) -> AdapterResult<i32>;
}

/// A recorded head register write
#[derive(Debug, Clone, PartialEq)]
pub enum HeadCommand {
    Reset,
    Enable,
    Mode(HeadMode),
    LoadWeight(f64),
    RotationSpeed(f64),
    TouchForce(f64),
    RampTime(u32),
    TargetForce(f64),
    TargetPosition(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_polish_mode() {
        assert_eq!(HeadMode::from(PolishMode::Moment), HeadMode::Force);
        assert_eq!(HeadMode::from(PolishMode::Position), HeadMode::Position);
    }

    #[test]
    fn test_status_bits() {
        let status = HeadStatus::default()
            .with(HeadStatus::ENABLED, true)
            .with(HeadStatus::ROTATING, true);
        assert!(status.is_enabled());
        assert!(!status.has_fault());
        assert!(status.contains(HeadStatus::ENABLED | HeadStatus::ROTATING));

        let status = status.with(HeadStatus::ROTATING, false);
        assert_eq!(status, HeadStatus(HeadStatus::ENABLED));
        assert_eq!(status.to_string(), "0x0001");
    }
}
