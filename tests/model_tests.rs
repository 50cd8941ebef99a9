/// Integration tests for model bundle loading and prediction
///
/// Run with: cargo test --test model_tests -- --nocapture
mod common;

use common::{fixture, model, new_delhi_form, request};
use delivery_time_service::{
    error::ModelError,
    features::{build_feature_vector, FeatureVector},
    model::load_model,
};

#[test]
fn test_bundle_carries_feature_names() {
    let mdl = model();
    assert_eq!(mdl.feature_names().len(), 30);
    assert_eq!(mdl.feature_names()[6], "distance_km");
}

#[test]
fn test_warmup_on_zeros() {
    // base 20 + not jam 2 + short trip 1 + not bicycle -1 + low rating 2.5
    assert_eq!(model().warmup().unwrap(), 24.5);
}

#[test]
fn test_predict_new_delhi() {
    println!("\n=== Test: Predict New Delhi ===");
    let mdl = model();
    let v = build_feature_vector(&request(&new_delhi_form(), 0.0), mdl.feature_names());
    let minutes = mdl.predict(&v).unwrap();
    println!("✓ predicted {:.1} minutes", minutes);
    assert_eq!(minutes, 25.5);
}

#[test]
fn test_predict_is_pure() {
    let mdl = model();
    let mut form = new_delhi_form();
    form.traffic_level = Some("Jam".to_string());
    let v = build_feature_vector(&request(&form, 20.0), mdl.feature_names());
    let first = mdl.predict(&v).unwrap();
    let second = mdl.predict(&v).unwrap();
    assert_eq!(first, second);
    // base 20 + jam 10 + long trip 8 + bicycle 3 + high rating -0.5
    assert_eq!(first, 40.5);
}

#[test]
fn test_foreign_schema_is_rejected() {
    let mdl = model();
    let other = vec!["distance_km".to_string()];
    let err = mdl.predict(&FeatureVector::zeros(&other)).unwrap_err();
    assert!(matches!(err, ModelError::SchemaMismatch(_)), "got {err:?}");
}

#[test]
fn test_invalid_bundles() {
    assert!(matches!(
        load_model(fixture("missing.json")),
        Err(ModelError::Io { .. })
    ));
    assert!(matches!(
        load_model(fixture("deliveries.csv")),
        Err(ModelError::Parse { .. })
    ));
    let err = load_model(fixture("bad_feature_index.json")).unwrap_err();
    assert!(err.to_string().contains("feature 3"), "{err}");
}
