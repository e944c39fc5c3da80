//! Config file round-trips

use polishkit_core::{Craft, PathStyle, PolishMode, Surface};
use polishkit_settings::Config;
use tempfile::TempDir;

fn sample_config() -> Config {
    let mut config = Config::new();
    config.robot.address = "10.0.0.2".to_string();
    config.head.address = None;
    config.tool.disc_thickness_mm = 3.5;
    config.motion.path_acceleration = 150.0;

    let mut barrel = Craft::new("barrel", PathStyle::CylinderHorizontal(Surface::Concave));
    barrel.mode = PolishMode::Moment;
    barrel.offset_count = 8;
    barrel.grind_angle = 6.0;
    barrel.mirror = true;
    config.crafts.push(barrel);
    config.crafts.push(Craft::new("edge", PathStyle::RegionArc2));
    config
}

#[test]
fn test_toml_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let config = sample_config();

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = sample_config();

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[robot]
address = "10.0.0.9"

[[crafts]]
name = "flat"
way = "line"
move_speed = 120.0
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.robot.address, "10.0.0.9");
    assert_eq!(config.motion.default_velocity, 200.0);
    let craft = config.craft("flat").unwrap();
    assert_eq!(craft.way, PathStyle::Line);
    assert_eq!(craft.move_speed, 120.0);
    assert_eq!(craft.cut_in_speed, 20.0);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("Invalid JSON config"));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_ensure_parent_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("polishkit").join("config.toml");
    Config::ensure_parent_dir(&path).unwrap();
    Config::new().save_to_file(&path).unwrap();
    assert!(path.exists());
}
