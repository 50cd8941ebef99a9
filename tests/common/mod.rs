#![allow(dead_code)]

use delivery_time_service::{
    config::ServerConfig,
    dataset::{load_dataset, Dataset},
    features::{PredictionForm, PredictionRequest},
    model::{load_model, ModelBundle},
    resources::AppContext,
};
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn dataset() -> Dataset {
    load_dataset(fixture("deliveries.csv")).expect("fixture dataset loads")
}

pub fn model() -> ModelBundle {
    load_model(fixture("model.json")).expect("fixture model loads")
}

pub fn context() -> AppContext {
    AppContext::new(ServerConfig::new(
        fixture("deliveries.csv"),
        fixture("model.json"),
    ))
}

pub const NEW_DELHI: (f64, f64) = (28.61394, 77.20902);

/// The form from the New Delhi round-trip scenario.
pub fn new_delhi_form() -> PredictionForm {
    PredictionForm {
        delivery_person_age: Some(30.0),
        delivery_person_ratings: Some(4.6),
        order_day: Some("Monday".to_string()),
        order_hour: Some(0.0),
        vehicle_type: Some("Bicycle".to_string()),
        vehicle_condition: Some(0.0),
        traffic_level: Some("Low".to_string()),
        multiple_deliveries: Some(1.0),
        restaurant_latitude: Some(NEW_DELHI.0),
        restaurant_longitude: Some(NEW_DELHI.1),
        delivery_latitude: Some(NEW_DELHI.0),
        delivery_longitude: Some(NEW_DELHI.1),
        city: Some("Metropolitian".to_string()),
        festival: Some("No".to_string()),
        order_type: Some("Meal".to_string()),
        weather_conditions: Some("Sunny".to_string()),
    }
}

pub fn request(form: &PredictionForm, distance_km: f64) -> PredictionRequest {
    PredictionRequest::from_form(form, Some(distance_km)).expect("complete form")
}
