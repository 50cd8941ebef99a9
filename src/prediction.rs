//! The prediction page: region check, distance, request assembly and, when
//! asked, a forward pass through the model.

use crate::{
    error::{ModelError, RequestError},
    features::{build_feature_vector, FeatureVector, PredictionForm, PredictionRequest},
    model::{format_minutes, ModelBundle},
    region::{trip_distance_km, LatLon, RegionBounds, OUT_OF_REGION_WARNING},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub minutes: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: LatLon,
    pub tooltip: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPolyline {
    pub points: [LatLon; 2],
    pub color: &'static str,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLon,
    pub zoom: u8,
    pub markers: [MapMarker; 2],
    pub route: MapPolyline,
}

impl MapView {
    pub fn new(restaurant: LatLon, delivery: LatLon) -> Self {
        Self {
            center: restaurant,
            zoom: 8,
            markers: [
                MapMarker {
                    position: restaurant,
                    tooltip: "Restaurant",
                    color: "green",
                },
                MapMarker {
                    position: delivery,
                    tooltip: "Delivery Location",
                    color: "red",
                },
            ],
            route: MapPolyline {
                points: [restaurant, delivery],
                color: "blue",
                weight: 2.5,
            },
        }
    }
}

/// Everything the prediction page shows after one form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// The assembled "Data Input" row; absent until the request is complete.
    pub input: Option<PredictionRequest>,
    pub distance_km: Option<f64>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub prediction: Option<PredictionResult>,
    pub map: Option<MapView>,
}

fn endpoints(form: &PredictionForm) -> Option<(LatLon, LatLon)> {
    Some((
        LatLon::new(form.restaurant_latitude?, form.restaurant_longitude?),
        LatLon::new(form.delivery_latitude?, form.delivery_longitude?),
    ))
}

fn log_feature_stats(vec: &FeatureVector) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let v = vec.values();
    let nz = v.iter().filter(|x| **x != 0.0).count();
    let mean = if v.is_empty() { 0.0 } else { v.iter().sum::<f64>() / v.len() as f64 };
    let sample: Vec<String> = vec
        .iter()
        .take(6)
        .map(|(name, x)| format!("{name}={x:.3}"))
        .collect();
    tracing::debug!(
        "feature vector in_dim={} nonzero={} mean={:.3} sample=[{}]",
        v.len(),
        nz,
        mean,
        sample.join(", ")
    );
}

/// Runs one submission of the prediction form.
///
/// Region and input problems come back inside the outcome; only a failing
/// model yields `Err`.
pub fn evaluate(
    form: &PredictionForm,
    model: &ModelBundle,
    bounds: &RegionBounds,
    show_map: bool,
    predict: bool,
) -> Result<PredictionOutcome, ModelError> {
    let mut outcome = PredictionOutcome::default();
    let points = endpoints(form);

    if let Some((restaurant, delivery)) = points {
        outcome.distance_km = trip_distance_km(restaurant, delivery, bounds);
        if outcome.distance_km.is_none() {
            outcome.warning = Some(OUT_OF_REGION_WARNING.to_string());
        }
        if show_map {
            outcome.map = Some(MapView::new(restaurant, delivery));
        }
    }

    match PredictionRequest::from_form(form, outcome.distance_km) {
        Ok(request) => {
            if predict {
                let features = build_feature_vector(&request, model.feature_names());
                log_feature_stats(&features);
                let minutes = model.predict(&features)?;
                tracing::info!("predicted delivery time {:.3} min", minutes);
                outcome.prediction = Some(PredictionResult {
                    minutes,
                    display: format_minutes(minutes),
                });
            }
            outcome.input = Some(request);
        }
        Err(err @ RequestError::Incomplete(_)) => {
            if predict {
                outcome.error = Some(format!("Cannot predict delivery time: {err}"));
            }
        }
        Err(err @ RequestError::Invalid(_)) => {
            outcome.error = Some(err.to_string());
        }
    }
    Ok(outcome)
}
