//! Error handling tests for all modules

use face_keyframes::{
    action_units::{ActionUnit, ActionUnitCode, ActionUnitExtractor},
    config::{Config, EXAMPLE_CONFIG},
    error::{Error, Result},
    gaze::EyeSide,
};

#[test]
fn test_label_errors() {
    assert!(matches!(ActionUnitCode::from_label("AU1"), Err(Error::MalformedLabel(_))));
    assert!(matches!(ActionUnitCode::from_label("XX12_r"), Ok(_)));
    assert!(matches!(ActionUnitCode::from_label("AU50_r"), Err(Error::UnknownActionUnit(50))));
    assert!(matches!(ActionUnitCode::try_from(46), Err(Error::UnknownActionUnit(46))));
    assert!(ActionUnitCode::try_from(45).is_ok());
}

#[test]
fn test_extractor_never_fails_on_bad_reports() {
    let extractor = ActionUnitExtractor::default();
    let presence = [("", 1.0), ("AU", 1.0), ("AU-1_c", 1.0), ("AU06_c", 1.0)];
    let intensity = [("garbage", 5.0), ("AU06_r", 2.0), ("AU99_r", 5.0)];

    let au = extractor.extract(&presence, &intensity);
    assert_eq!(au.get(ActionUnit::CheekRaiser), 0.4);
}

#[test]
fn test_recoverable_classification() {
    assert!(Error::MalformedLabel("x".to_string()).is_recoverable());
    assert!(Error::GazeModelUnavailable(EyeSide::Left).is_recoverable());
    assert!(Error::DegenerateInput("zero".to_string()).is_recoverable());
    assert!(!Error::ConfigError("bad".to_string()).is_recoverable());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::GazeModelUnavailable(EyeSide::Right).to_string(),
        "Gaze model unavailable for right eye"
    );
    assert_eq!(Error::UnknownActionUnit(77).to_string(), "Unknown action unit code: 77");
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.yaml");

    let mut config = Config::from_yaml(EXAMPLE_CONFIG)?;
    config.gaze.damping = 0.5;
    config.to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_file("/nonexistent/face-keyframes.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}
