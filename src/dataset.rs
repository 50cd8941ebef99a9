//! Historical delivery records.
//!
//! The CSV is read once, every row gets its `Day` and `age_group` derived at
//! load time, and the resulting [`Dataset`] is shared read-only afterwards.

use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

pub const REQUIRED_COLUMNS: [&str; 13] = [
    "ID",
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "DayofWeek",
    "Hour",
    "Time_taken (min)",
    "pickup_time (min)",
    "Type_of_vehicle",
    "Road_traffic_density",
    "City",
    "Festival",
    "Type_of_order",
    "Weather_conditions",
];

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// 0 → Monday … 6 → Sunday.
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAYS.get(index as usize).copied()
}

pub fn weekday_index(name: &str) -> Option<u8> {
    WEEKDAYS.iter().position(|d| *d == name).map(|i| i as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    Teenage,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Teenage => "Teenage",
            AgeGroup::Adult => "Adult",
            AgeGroup::Elderly => "Elderly",
        }
    }
}

/// Brackets are `[.., 25)`, `[25, 65)` and `[65, ..]`; anything that fails both
/// comparisons (NaN included) lands in `Elderly`.
pub fn age_group(age: f64) -> AgeGroup {
    if age < 25.0 {
        AgeGroup::Teenage
    } else if age < 65.0 {
        AgeGroup::Adult
    } else {
        AgeGroup::Elderly
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Delivery_person_Age")]
    delivery_person_age: f64,
    #[serde(rename = "Delivery_person_Ratings")]
    delivery_person_ratings: f64,
    #[serde(rename = "DayofWeek")]
    day_of_week: u8,
    #[serde(rename = "Hour")]
    hour: u8,
    #[serde(rename = "Time_taken (min)")]
    time_taken_min: f64,
    #[serde(rename = "pickup_time (min)")]
    pickup_time_min: f64,
    #[serde(rename = "Type_of_vehicle")]
    type_of_vehicle: String,
    #[serde(rename = "Road_traffic_density")]
    road_traffic_density: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Festival")]
    festival: String,
    #[serde(rename = "Type_of_order")]
    type_of_order: String,
    #[serde(rename = "Weather_conditions")]
    weather_conditions: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryRecord {
    pub id: String,
    pub delivery_person_age: f64,
    pub delivery_person_ratings: f64,
    pub day_of_week: u8,
    pub hour: u8,
    pub time_taken_min: f64,
    pub pickup_time_min: f64,
    pub type_of_vehicle: String,
    pub road_traffic_density: String,
    pub city: String,
    pub festival: String,
    pub type_of_order: String,
    pub weather_conditions: String,
    pub day: &'static str,
    pub age_group: AgeGroup,
}

impl DeliveryRecord {
    fn derive(raw: RawRecord) -> Option<Self> {
        let day = weekday_name(raw.day_of_week)?;
        Some(Self {
            age_group: age_group(raw.delivery_person_age),
            day,
            id: raw.id,
            delivery_person_age: raw.delivery_person_age,
            delivery_person_ratings: raw.delivery_person_ratings,
            day_of_week: raw.day_of_week,
            hour: raw.hour,
            time_taken_min: raw.time_taken_min,
            pickup_time_min: raw.pickup_time_min,
            type_of_vehicle: raw.type_of_vehicle,
            road_traffic_density: raw.road_traffic_density,
            city: raw.city,
            festival: raw.festival,
            type_of_order: raw.type_of_order,
            weather_conditions: raw.weather_conditions,
        })
    }
}

/// Categorical columns that feed selection widgets and chart groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    TypeOfVehicle,
    RoadTrafficDensity,
    City,
    Festival,
    TypeOfOrder,
    WeatherConditions,
}

impl CategoricalColumn {
    pub fn value<'a>(&self, record: &'a DeliveryRecord) -> &'a str {
        match self {
            CategoricalColumn::TypeOfVehicle => &record.type_of_vehicle,
            CategoricalColumn::RoadTrafficDensity => &record.road_traffic_density,
            CategoricalColumn::City => &record.city,
            CategoricalColumn::Festival => &record.festival,
            CategoricalColumn::TypeOfOrder => &record.type_of_order,
            CategoricalColumn::WeatherConditions => &record.weather_conditions,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<DeliveryRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<DeliveryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values in order of first appearance.
    pub fn unique_values(&self, column: CategoricalColumn) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| column.value(r))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

/// Reads a comma-separated, Latin-1 encoded file and derives the computed columns.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Latin-1 maps each byte onto the code point of the same value.
    let text: String = bytes.iter().map(|&b| b as char).collect();
    parse_dataset(&text).map_err(|message| DatasetError::Format {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_dataset(text: &str) -> Result<Dataset, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing columns: {}", missing.join(", ")));
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.map_err(|e| format!("row {}: {}", row + 1, e))?;
        let dow = raw.day_of_week;
        let record = DeliveryRecord::derive(raw)
            .ok_or_else(|| format!("row {}: DayofWeek {} outside 0..=6", row + 1, dow))?;
        records.push(record);
    }
    Ok(Dataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID,Delivery_person_Age,Delivery_person_Ratings,DayofWeek,Hour,Time_taken (min),pickup_time (min),Type_of_vehicle,Road_traffic_density,City,Festival,Type_of_order,Weather_conditions";

    #[test]
    fn derives_day_and_age_group() {
        let text = format!(
            "{HEADER}\n0x1,24.0,4.5,6,19,30.0,10.0,motorcycle,Jam,Urban,No,Snack,Sunny\n"
        );
        let ds = parse_dataset(&text).unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.day, "Sunday");
        assert_eq!(r.age_group, AgeGroup::Teenage);
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        let text = format!("{HEADER}\n0x1,30,4.5,7,19,30,10,motorcycle,Jam,Urban,No,Snack,Sunny\n");
        let err = parse_dataset(&text).unwrap_err();
        assert!(err.contains("DayofWeek 7"), "{err}");
    }

    #[test]
    fn reports_every_missing_column() {
        let err = parse_dataset("ID,Hour\n1,2\n").unwrap_err();
        assert!(err.contains("Delivery_person_Age"));
        assert!(err.contains("Weather_conditions"));
        assert!(!err.contains("Hour,"));
    }

    #[test]
    fn header_only_is_empty_table() {
        let ds = parse_dataset(&format!("{HEADER}\n")).unwrap();
        assert!(ds.is_empty());
    }
}
