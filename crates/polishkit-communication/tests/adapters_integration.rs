//! Integration tests for the adapter traits and simulated back-ends

use polishkit_communication::{
    HeadAdapter, HeadMode, HeadStatus, RobotAdapter, RobotCommand, SimulatedHead,
    SimulatedRobot,
};
use polishkit_core::Pose;
use polishkit_toolpath::MotionParams;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_robot_behind_trait_object() {
    let sim = SimulatedRobot::new();
    let robot: Arc<dyn RobotAdapter> = Arc::new(sim.clone());
    robot.connect("10.0.0.2").unwrap();

    let params = MotionParams::new(200.0, 2000.0, 0.0);
    robot
        .move_linear(&Pose::new(10.0, 0.0, 0.0, 180.0, 0.0, 0.0), params)
        .unwrap();
    assert_eq!(robot.name(), "simulated");
    assert_eq!(sim.motion_count(), 1);
    assert!(!robot.is_moving());
}

#[test]
fn test_moves_from_several_threads_are_all_recorded() {
    let sim = SimulatedRobot::connected_at(Pose::default());
    let robot: Arc<dyn RobotAdapter> = Arc::new(sim.clone());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let robot = Arc::clone(&robot);
            thread::spawn(move || {
                for j in 0..25 {
                    let target = Pose::new(f64::from(i), f64::from(j), 0.0, 0.0, 0.0, 0.0);
                    robot
                        .move_linear(&target, MotionParams::new(1.0, 1.0, 0.0))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sim.motion_count(), 100);
    assert!(sim
        .commands()
        .iter()
        .all(|c| matches!(c, RobotCommand::Linear { .. })));
}

#[test]
fn test_head_mode_serialization() {
    assert_eq!(serde_json::to_string(&HeadMode::Force).unwrap(), "\"force\"");
    let mode: HeadMode = serde_json::from_str("\"position\"").unwrap();
    assert_eq!(mode, HeadMode::Position);
}

#[test]
fn test_head_behind_trait_object() {
    let sim = SimulatedHead::new();
    let head: Arc<dyn HeadAdapter> = Arc::new(sim.clone());
    head.connect("10.0.0.3").unwrap();
    head.reset().unwrap();
    head.set_mode(HeadMode::Force).unwrap();
    assert_eq!(sim.writes().len(), 2);
    sim.set_position(655);
    assert_eq!(head.read_position().unwrap(), 655);
}

proptest! {
    #[test]
    fn prop_status_with_sets_only_mask(
        bits in any::<u16>(),
        shift in 0u32..16,
        on in any::<bool>(),
    ) {
        let mask = 1u16 << shift;
        let status = HeadStatus(bits).with(mask, on);
        prop_assert_eq!(status.contains(mask), on);
        prop_assert_eq!(status.0 & !mask, bits & !mask);
    }
}
