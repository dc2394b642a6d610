use pcbkit_camtools::LayerRole;
use pcbkit_settings::{Config, SettingsError, SettingsPersistence};
use tempfile::tempdir;

#[test]
fn test_toml_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.toml");

    let mut config = Config::default().with_thickness(0.8);
    config.board.merge_copper = true;
    config.add_hint("*.art", LayerRole::TopCopper);
    config.polygonize.flash_segments = 48;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.json");

    let mut config = Config::default();
    config.board.cut_drill_holes = true;
    config.add_hint("outline.gbr", LayerRole::Outline);
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"outline\""));
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.yaml");
    assert!(matches!(
        Config::default().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
    std::fs::write(&path, "board: {}").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.toml");
    std::fs::write(&path, "[board]\nthickness_mm = -1.0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));
}

#[test]
fn test_persistence_defaults_then_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut settings = SettingsPersistence::load_or_default(&path).unwrap();
    assert_eq!(settings.config(), &Config::default());

    settings.config_mut().board.thickness_mm = 1.0;
    settings.save().unwrap();
    assert!(path.exists());

    let reloaded = SettingsPersistence::load_or_default(&path).unwrap();
    assert_eq!(reloaded.config().board.thickness_mm, 1.0);
    assert_eq!(reloaded.path(), path.as_path());
}
