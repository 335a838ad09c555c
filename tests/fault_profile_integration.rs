//! Fault profile loader: file-based parsing, error surfaces, round-trips.

use kestrel_core::fault::profile::{load, parse, write, FaultProfileError};
use kestrel_core::types::FaultKind;
use std::io::Write as _;

#[test]
fn loads_a_fault_profile_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"faults":[{{"sensor_id":"battery","type":"Spike","value":0.0,"trigger_after_s":5.0}}]}}"#
    )
    .unwrap();

    let configs = load(file.path()).unwrap();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].signal_id, "battery");
    assert_eq!(configs[0].fault_kind, FaultKind::Spike);
    assert_eq!(configs[0].trigger_after_seconds, 5.0);
}

#[test]
fn missing_file_is_reported_as_an_error_not_a_panic() {
    let result = load("/definitely/not/a/real/path.json");
    assert!(matches!(result, Err(FaultProfileError::Io(_))));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json at all").unwrap();
    let result = load(file.path());
    assert!(matches!(result, Err(FaultProfileError::Parse(_))));
}

#[test]
fn every_fault_kind_spelling_round_trips() {
    let raw = r#"{"faults":[
        {"sensor_id":"a","type":"Spike"},
        {"sensor_id":"b","type":"InvalidValue"},
        {"sensor_id":"c","type":"MissingUpdate","suppress_cycles":3},
        {"sensor_id":"d","type":"DelayedReading","delay_ms":100},
        {"sensor_id":"e","type":"InterfaceFailure"}
    ]}"#;
    let configs = parse(raw).unwrap();
    assert_eq!(configs.len(), 5);
    let reloaded = parse(&write(&configs)).unwrap();
    for (a, b) in configs.iter().zip(reloaded.iter()) {
        assert_eq!(a.fault_kind, b.fault_kind);
    }
}
