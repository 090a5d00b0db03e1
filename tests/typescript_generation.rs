//! TypeScript Generation Tests
//!
//! Validates that report types can be exported to TypeScript for a desktop
//! front end when the tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_report_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, every type the front end receives is exportable.
    fn assert_type<T: Type>() {}

    assert_type::<race_engineer::EngineerReport>();
    assert_type::<race_engineer::StintState>();
    assert_type::<race_engineer::SetupFeedback>();
    assert_type::<race_engineer::analysis::CornerDiagnosis>();
    assert_type::<race_engineer::analysis::EventSummary>();
    assert_type::<race_engineer::analysis::FuelStatus>();
    assert_type::<race_engineer::types::Phase>();
    assert_type::<race_engineer::types::Corner>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Reports still serialize without specta
    let report = race_engineer::StintEngineer::default().report();
    let yaml = serde_yaml_ng::to_string(&report).expect("report serializes");
    assert!(yaml.contains("state: WAITING"));
}
