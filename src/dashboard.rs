//! Aggregates behind the dashboard charts. The charting layer only draws what
//! is computed here.

use crate::dataset::{CategoricalColumn, Dataset, DeliveryRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub avg_delivery_time_min: Option<f64>,
    pub avg_pickup_time_min: Option<f64>,
    pub avg_ratings: Option<f64>,
    pub total_orders: usize,
    pub avg_delivery_time_display: String,
    pub avg_pickup_time_display: String,
    pub avg_ratings_display: String,
    pub total_orders_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Five-number summary of delivery time for one group (and optional hue).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<String>,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourTrafficCount {
    pub hour: u8,
    pub traffic: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourOrders {
    pub hour: u8,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub header: &'static str,
    pub kpis: Kpis,
    pub vehicle_distribution: Vec<CategoryCount>,
    pub delivery_time_by_vehicle: Vec<BoxStats>,
    pub age_group_distribution: Vec<CategoryCount>,
    pub delivery_time_by_age_group: Vec<BoxStats>,
    pub hour_vs_traffic: Vec<HourTrafficCount>,
    pub orders_per_hour: Vec<HourOrders>,
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}

/// Shortest form that still shows a decimal point: `30.0`, `4.62`.
fn decimal(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Linear interpolation between closest ranks; `sorted` must be ascending.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn box_stats(group: &str, hue: Option<&str>, mut values: Vec<f64>) -> Option<BoxStats> {
    values.sort_by(f64::total_cmp);
    Some(BoxStats {
        group: group.to_string(),
        hue: hue.map(str::to_string),
        count: values.len(),
        min: *values.first()?,
        q1: quantile(&values, 0.25)?,
        median: quantile(&values, 0.5)?,
        q3: quantile(&values, 0.75)?,
        max: *values.last()?,
    })
}

pub fn kpis(dataset: &Dataset) -> Kpis {
    let records = dataset.records();
    let avg_delivery = mean(records.iter().map(|r| r.time_taken_min)).map(|v| round_to(v, 1));
    let avg_pickup = mean(records.iter().map(|r| r.pickup_time_min)).map(|v| round_to(v, 1));
    let avg_ratings = mean(records.iter().map(|r| r.delivery_person_ratings)).map(|v| round_to(v, 2));
    let total_orders = records.iter().map(|r| r.id.as_str()).collect::<HashSet<_>>().len();

    let na = || "n/a".to_string();
    Kpis {
        avg_delivery_time_display: avg_delivery.map_or_else(na, |v| format!("{} minutes", decimal(v))),
        avg_pickup_time_display: avg_pickup.map_or_else(na, |v| format!("{} minutes", decimal(v))),
        avg_ratings_display: avg_ratings.map_or_else(na, |v| format!("{}/6.0", decimal(v))),
        total_orders_display: format!("{:.1}K", round_to(total_orders as f64 / 1000.0, 1)),
        avg_delivery_time_min: avg_delivery,
        avg_pickup_time_min: avg_pickup,
        avg_ratings,
        total_orders,
    }
}

/// Counts per category, most frequent first; ties keep first-appearance order.
fn value_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for k in keys {
        let c = counts.entry(k).or_insert_with(|| {
            order.push(k);
            0
        });
        *c += 1;
    }
    let mut out: Vec<CategoryCount> = order
        .into_iter()
        .map(|k| CategoryCount {
            category: k.to_string(),
            count: counts[k],
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

pub fn vehicle_distribution(dataset: &Dataset) -> Vec<CategoryCount> {
    value_counts(
        dataset
            .records()
            .iter()
            .map(|r| CategoricalColumn::TypeOfVehicle.value(r)),
    )
}

pub fn age_group_distribution(dataset: &Dataset) -> Vec<CategoryCount> {
    value_counts(dataset.records().iter().map(|r| r.age_group.as_str()))
}

fn grouped_box_stats<'a, G, H>(records: &'a [DeliveryRecord], group: G, hue: H) -> Vec<BoxStats>
where
    G: Fn(&'a DeliveryRecord) -> &'a str,
    H: Fn(&'a DeliveryRecord) -> Option<&'a str>,
{
    let mut groups: BTreeMap<(&str, Option<&str>), Vec<f64>> = BTreeMap::new();
    for r in records {
        groups
            .entry((group(r), hue(r)))
            .or_default()
            .push(r.time_taken_min);
    }
    groups
        .into_iter()
        .filter_map(|((g, h), values)| box_stats(g, h, values))
        .collect()
}

/// Delivery time per vehicle type, split by road traffic density.
pub fn delivery_time_by_vehicle(dataset: &Dataset) -> Vec<BoxStats> {
    grouped_box_stats(
        dataset.records(),
        |r| r.type_of_vehicle.as_str(),
        |r| Some(r.road_traffic_density.as_str()),
    )
}

pub fn delivery_time_by_age_group(dataset: &Dataset) -> Vec<BoxStats> {
    grouped_box_stats(dataset.records(), |r| r.age_group.as_str(), |_| None)
}

pub fn hour_vs_traffic(dataset: &Dataset) -> Vec<HourTrafficCount> {
    let mut counts: BTreeMap<(u8, &str), usize> = BTreeMap::new();
    for r in dataset.records() {
        *counts.entry((r.hour, r.road_traffic_density.as_str())).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((hour, traffic), count)| HourTrafficCount {
            hour,
            traffic: traffic.to_string(),
            count,
        })
        .collect()
}

/// Distinct order IDs per hour.
pub fn orders_per_hour(dataset: &Dataset) -> Vec<HourOrders> {
    let mut ids: BTreeMap<u8, BTreeSet<&str>> = BTreeMap::new();
    for r in dataset.records() {
        ids.entry(r.hour).or_default().insert(r.id.as_str());
    }
    ids.into_iter()
        .map(|(hour, set)| HourOrders {
            hour,
            orders: set.len(),
        })
        .collect()
}

pub fn dashboard_view(dataset: &Dataset) -> DashboardView {
    DashboardView {
        header: "Analysis Dashboard",
        kpis: kpis(dataset),
        vehicle_distribution: vehicle_distribution(dataset),
        delivery_time_by_vehicle: delivery_time_by_vehicle(dataset),
        age_group_distribution: age_group_distribution(dataset),
        delivery_time_by_age_group: delivery_time_by_age_group(dataset),
        hour_vs_traffic: hour_vs_traffic(dataset),
        orders_per_hour: orders_per_hour(dataset),
    }
}
