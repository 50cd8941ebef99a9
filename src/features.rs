//! Turns raw prediction-form values into the model's feature vector.
//!
//! A single request only ever selects one level per categorical column, so the
//! one-hot expansion is kept sparse and reconciled against the model's
//! authoritative feature list by zero-filling and reordering.

use crate::{dataset::weekday_index, error::RequestError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display label → encoded `Type_of_vehicle` value.
pub const VEHICLE_OPTIONS: [(&str, &str); 4] = [
    ("Bicycle", "bicycle"),
    ("Scooter", "scooter"),
    ("Electric Scooter", "electric_scooter"),
    ("Motorcycle", "motorcycle"),
];

pub const AGE_RANGE: (u8, u8) = (10, 80);
pub const RATING_RANGE: (f64, f64) = (1.0, 6.0);
pub const HOUR_RANGE: (u8, u8) = (0, 23);
pub const VEHICLE_CONDITION_RANGE: (u8, u8) = (0, 3);
pub const DELIVERIES_RANGE: (u8, u8) = (0, 10);

/// Accepts either the display label or the encoded value.
pub fn vehicle_code(value: &str) -> Option<&'static str> {
    VEHICLE_OPTIONS
        .iter()
        .find(|(label, code)| *label == value || *code == value)
        .map(|(_, code)| *code)
}

/// Raw widget values as posted by the client. Any field may be unset; whole
/// number widgets arrive as plain JSON numbers and are narrowed in
/// [`PredictionRequest::from_form`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    pub delivery_person_age: Option<f64>,
    pub delivery_person_ratings: Option<f64>,
    pub order_day: Option<String>,
    pub order_hour: Option<f64>,
    pub vehicle_type: Option<String>,
    pub vehicle_condition: Option<f64>,
    pub traffic_level: Option<String>,
    pub multiple_deliveries: Option<f64>,
    pub restaurant_latitude: Option<f64>,
    pub restaurant_longitude: Option<f64>,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub city: Option<String>,
    pub festival: Option<String>,
    pub order_type: Option<String>,
    pub weather_conditions: Option<String>,
}

/// One prediction attempt, in training column order. Serializes as the
/// "Data Input" row shown before predicting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: u8,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: f64,
    #[serde(rename = "DayofWeek")]
    pub day_of_week: u8,
    #[serde(rename = "Hour")]
    pub hour: u8,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: String,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: u8,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: String,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: u8,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: String,
    #[serde(rename = "Weather_conditions")]
    pub weather_conditions: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue<'a> {
    Numeric(f64),
    Category(&'a str),
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    (lo, hi): (T, T),
) -> Result<T, RequestError> {
    if value < lo || value > hi {
        return Err(RequestError::Invalid(format!(
            "{name} must be between {lo} and {hi}, got {value}"
        )));
    }
    Ok(value)
}

/// Whole-number widget value inside `range`, narrowed to `u8`.
fn whole_number(name: &str, value: f64, (lo, hi): (u8, u8)) -> Result<u8, RequestError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RequestError::Invalid(format!(
            "{name} must be a whole number, got {value}"
        )));
    }
    let value = check_range(name, value, (lo as f64, hi as f64))?;
    Ok(value as u8)
}

impl PredictionRequest {
    /// Every missing field is reported at once, unset coordinates included;
    /// `distance_km` is missing when the coordinates did not pass the region
    /// check.
    pub fn from_form(form: &PredictionForm, distance_km: Option<f64>) -> Result<Self, RequestError> {
        let mut missing = Vec::new();
        macro_rules! take {
            ($value:expr, $name:literal) => {
                match $value {
                    Some(v) => Some(v),
                    None => {
                        missing.push($name);
                        None
                    }
                }
            };
        }

        let age = take!(form.delivery_person_age, "delivery_person_age");
        let ratings = take!(form.delivery_person_ratings, "delivery_person_ratings");
        let day = take!(form.order_day.as_deref(), "order_day");
        let hour = take!(form.order_hour, "order_hour");
        let vehicle = take!(form.vehicle_type.as_deref(), "vehicle_type");
        let condition = take!(form.vehicle_condition, "vehicle_condition");
        let traffic = take!(form.traffic_level.as_deref(), "traffic_level");
        let deliveries = take!(form.multiple_deliveries, "multiple_deliveries");
        let city = take!(form.city.as_deref(), "city");
        let festival = take!(form.festival.as_deref(), "festival");
        let order_type = take!(form.order_type.as_deref(), "order_type");
        let weather = take!(form.weather_conditions.as_deref(), "weather_conditions");
        take!(form.restaurant_latitude, "restaurant_latitude");
        take!(form.restaurant_longitude, "restaurant_longitude");
        take!(form.delivery_latitude, "delivery_latitude");
        take!(form.delivery_longitude, "delivery_longitude");
        let distance = take!(distance_km, "distance_km");
        if !missing.is_empty() {
            return Err(RequestError::Incomplete(missing));
        }

        let (
            Some(age),
            Some(ratings),
            Some(day),
            Some(hour),
            Some(vehicle),
            Some(condition),
            Some(traffic),
            Some(deliveries),
            Some(city),
            Some(festival),
            Some(order_type),
            Some(weather),
            Some(distance),
        ) = (
            age, ratings, day, hour, vehicle, condition, traffic, deliveries, city, festival,
            order_type, weather, distance,
        )
        else {
            return Err(RequestError::Incomplete(missing));
        };

        let day_of_week = weekday_index(day)
            .ok_or_else(|| RequestError::Invalid(format!("unknown order day {day:?}")))?;
        let type_of_vehicle = vehicle_code(vehicle)
            .ok_or_else(|| RequestError::Invalid(format!("unknown vehicle type {vehicle:?}")))?;
        if !ratings.is_finite() {
            return Err(RequestError::Invalid(
                "delivery_person_ratings must be a number".to_string(),
            ));
        }

        Ok(Self {
            delivery_person_age: whole_number("delivery_person_age", age, AGE_RANGE)?,
            delivery_person_ratings: check_range("delivery_person_ratings", ratings, RATING_RANGE)?,
            day_of_week,
            hour: whole_number("order_hour", hour, HOUR_RANGE)?,
            type_of_vehicle: type_of_vehicle.to_string(),
            vehicle_condition: whole_number("vehicle_condition", condition, VEHICLE_CONDITION_RANGE)?,
            road_traffic_density: traffic.to_string(),
            multiple_deliveries: whole_number("multiple_deliveries", deliveries, DELIVERIES_RANGE)?,
            city: city.to_string(),
            festival: festival.to_string(),
            type_of_order: order_type.to_string(),
            weather_conditions: weather.to_string(),
            distance_km: distance,
        })
    }

    /// The single-row record, in training column order.
    pub fn columns(&self) -> [(&'static str, ColumnValue<'_>); 13] {
        use ColumnValue::*;
        [
            ("Delivery_person_Age", Numeric(self.delivery_person_age as f64)),
            ("Delivery_person_Ratings", Numeric(self.delivery_person_ratings)),
            ("DayofWeek", Numeric(self.day_of_week as f64)),
            ("Hour", Numeric(self.hour as f64)),
            ("Type_of_vehicle", Category(&self.type_of_vehicle)),
            ("Vehicle_condition", Numeric(self.vehicle_condition as f64)),
            ("Road_traffic_density", Category(&self.road_traffic_density)),
            ("multiple_deliveries", Numeric(self.multiple_deliveries as f64)),
            ("City", Category(&self.city)),
            ("Festival", Category(&self.festival)),
            ("Type_of_order", Category(&self.type_of_order)),
            ("Weather_conditions", Category(&self.weather_conditions)),
            ("distance_km", Numeric(self.distance_km)),
        ]
    }
}

/// Numeric columns keep their name; each categorical column becomes
/// `{column}_{value} = 1.0`. No level is dropped.
pub fn one_hot(request: &PredictionRequest) -> BTreeMap<String, f64> {
    request
        .columns()
        .into_iter()
        .map(|(name, value)| match value {
            ColumnValue::Numeric(v) => (name.to_string(), v),
            ColumnValue::Category(level) => (format!("{name}_{level}"), 1.0),
        })
        .collect()
}

/// Schema-aligned projection of a request. `columns` is always the model's
/// feature list, in its order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn zeros(feature_names: &[String]) -> Self {
        Self {
            columns: feature_names.to_vec(),
            values: vec![0.0; feature_names.len()],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

fn order_from_sparse(map: &BTreeMap<String, f64>, feature_names: &[String]) -> Vec<f64> {
    let mut v = Vec::with_capacity(feature_names.len());
    for k in feature_names {
        v.push(map.get(k).copied().unwrap_or(0.0));
    }
    v
}

pub fn build_feature_vector(request: &PredictionRequest, feature_names: &[String]) -> FeatureVector {
    let expanded = one_hot(request);
    let ignored: Vec<&str> = expanded
        .keys()
        .filter(|k| !feature_names.contains(k))
        .map(String::as_str)
        .collect();
    if !ignored.is_empty() {
        tracing::debug!("ignoring {} columns unknown to the model: {:?}", ignored.len(), ignored);
    }

    FeatureVector {
        columns: feature_names.to_vec(),
        values: order_from_sparse(&expanded, feature_names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_code_accepts_label_and_code() {
        assert_eq!(vehicle_code("Electric Scooter"), Some("electric_scooter"));
        assert_eq!(vehicle_code("motorcycle"), Some("motorcycle"));
        assert_eq!(vehicle_code("truck"), None);
    }

    #[test]
    fn empty_form_lists_every_field() {
        let err = PredictionRequest::from_form(&PredictionForm::default(), None).unwrap_err();
        match err {
            RequestError::Incomplete(missing) => {
                assert_eq!(missing.len(), 17);
                assert_eq!(missing.last(), Some(&"distance_km"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn whole_number_rejects_fractions_and_out_of_range() {
        assert_eq!(whole_number("order_hour", 23.0, HOUR_RANGE), Ok(23));
        assert!(whole_number("order_hour", 24.0, HOUR_RANGE).is_err());
        assert!(whole_number("order_hour", -1.0, HOUR_RANGE).is_err());
        assert!(whole_number("order_hour", 2.5, HOUR_RANGE).is_err());
        assert!(whole_number("order_hour", f64::NAN, HOUR_RANGE).is_err());
    }

    #[test]
    fn form_accepts_integers_and_whole_floats() {
        let form: PredictionForm =
            serde_json::from_str(r#"{"delivery_person_age":300,"order_hour":12.0}"#).unwrap();
        assert_eq!(form.delivery_person_age, Some(300.0));
        assert_eq!(form.order_hour, Some(12.0));
    }

    #[test]
    fn order_from_sparse_zero_fills() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2.0);
        map.insert("z".to_string(), 9.0);
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(order_from_sparse(&map, &names), vec![0.0, 2.0]);
    }
}
