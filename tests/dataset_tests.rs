/// Integration tests for dataset loading and derived columns
///
/// Run with: cargo test --test dataset_tests -- --nocapture
mod common;

use common::fixture;
use delivery_time_service::{
    dataset::{age_group, load_dataset, weekday_name, AgeGroup, CategoricalColumn},
    error::DatasetError,
};

#[test]
fn test_age_group_boundaries() {
    assert_eq!(age_group(24.9), AgeGroup::Teenage);
    assert_eq!(age_group(25.0), AgeGroup::Adult);
    assert_eq!(age_group(64.9), AgeGroup::Adult);
    assert_eq!(age_group(65.0), AgeGroup::Elderly);
    assert_eq!(age_group(-1.0), AgeGroup::Teenage);
    assert_eq!(age_group(f64::NAN), AgeGroup::Elderly);
}

#[test]
fn test_weekday_mapping() {
    assert_eq!(weekday_name(0), Some("Monday"));
    assert_eq!(weekday_name(3), Some("Thursday"));
    assert_eq!(weekday_name(6), Some("Sunday"));
    assert_eq!(weekday_name(7), None);
}

#[test]
fn test_load_fixture_derives_columns() {
    println!("\n=== Test: Load Fixture ===");
    let ds = load_dataset(fixture("deliveries.csv")).expect("dataset loads");
    assert_eq!(ds.len(), 12);

    let first = &ds.records()[0];
    assert_eq!(first.id, "0x4607");
    assert_eq!(first.day, "Saturday");
    assert_eq!(first.age_group, AgeGroup::Adult);

    let elderly: Vec<&str> = ds
        .records()
        .iter()
        .filter(|r| r.age_group == AgeGroup::Elderly)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(elderly, vec!["0xcdcd"]);

    for r in ds.records() {
        assert_eq!(weekday_name(r.day_of_week), Some(r.day));
        assert_eq!(age_group(r.delivery_person_age), r.age_group);
    }
    println!("✓ {} records, derived columns consistent", ds.len());
}

#[test]
fn test_unique_values_keep_first_appearance() {
    let ds = load_dataset(fixture("deliveries.csv")).unwrap();
    assert_eq!(
        ds.unique_values(CategoricalColumn::RoadTrafficDensity),
        vec!["High", "Jam", "Low", "Medium"]
    );
    assert_eq!(
        ds.unique_values(CategoricalColumn::City),
        vec!["Urban", "Metropolitian", "Semi-Urban"]
    );
    assert_eq!(ds.unique_values(CategoricalColumn::Festival), vec!["No", "Yes"]);
}

#[test]
fn test_latin1_is_decoded() {
    let ds = load_dataset(fixture("latin1.csv")).expect("latin-1 file loads");
    assert_eq!(ds.records()[1].weather_conditions, "Café");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_dataset(fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "got {err:?}");
}

#[test]
fn test_missing_column_is_format_error() {
    let err = load_dataset(fixture("missing_column.csv")).unwrap_err();
    match err {
        DatasetError::Format { message, .. } => {
            assert!(message.contains("Weather_conditions"), "{message}");
        }
        other => panic!("expected format error, got {other:?}"),
    }
}
