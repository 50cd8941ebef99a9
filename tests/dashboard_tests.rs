/// Integration tests for dashboard aggregates over the fixture dataset
///
/// Run with: cargo test --test dashboard_tests -- --nocapture
mod common;

use delivery_time_service::dashboard::{
    age_group_distribution, dashboard_view, delivery_time_by_age_group, delivery_time_by_vehicle,
    hour_vs_traffic, kpis, orders_per_hour, vehicle_distribution,
};

#[test]
fn test_kpis() {
    let k = kpis(&common::dataset());
    assert_eq!(k.avg_delivery_time_min, Some(31.1));
    assert_eq!(k.avg_pickup_time_min, Some(10.8));
    assert_eq!(k.avg_ratings, Some(4.58));
    assert_eq!(k.total_orders, 11);
    assert_eq!(k.avg_delivery_time_display, "31.1 minutes");
    assert_eq!(k.avg_ratings_display, "4.58/6.0");
    assert_eq!(k.total_orders_display, "0.0K");
}

#[test]
fn test_distributions() {
    let ds = common::dataset();
    let vehicles: Vec<(String, usize)> = vehicle_distribution(&ds)
        .into_iter()
        .map(|c| (c.category, c.count))
        .collect();
    assert_eq!(
        vehicles,
        vec![
            ("motorcycle".to_string(), 6),
            ("scooter".to_string(), 4),
            ("electric_scooter".to_string(), 1),
            ("bicycle".to_string(), 1),
        ]
    );

    let ages: Vec<(String, usize)> = age_group_distribution(&ds)
        .into_iter()
        .map(|c| (c.category, c.count))
        .collect();
    assert_eq!(
        ages,
        vec![
            ("Adult".to_string(), 7),
            ("Teenage".to_string(), 4),
            ("Elderly".to_string(), 1),
        ]
    );
}

#[test]
fn test_box_stats_by_age_group() {
    let stats = delivery_time_by_age_group(&common::dataset());
    let teen = stats.iter().find(|s| s.group == "Teenage").unwrap();
    assert_eq!(teen.count, 4);
    assert_eq!((teen.min, teen.q1, teen.median, teen.q3, teen.max), (26.0, 26.0, 30.0, 35.5, 40.0));

    let elderly = stats.iter().find(|s| s.group == "Elderly").unwrap();
    assert_eq!((elderly.min, elderly.median, elderly.max), (46.0, 46.0, 46.0));
    assert!(stats.iter().all(|s| s.hue.is_none()));
}

#[test]
fn test_box_stats_by_vehicle_and_traffic() {
    let stats = delivery_time_by_vehicle(&common::dataset());
    let scooter_jam = stats
        .iter()
        .find(|s| s.group == "scooter" && s.hue.as_deref() == Some("Jam"))
        .unwrap();
    assert_eq!(scooter_jam.count, 2);
    assert_eq!(scooter_jam.median, 36.5);
    let total: usize = stats.iter().map(|s| s.count).sum();
    assert_eq!(total, 12);
}

#[test]
fn test_hourly_counts() {
    let ds = common::dataset();
    let orders = orders_per_hour(&ds);
    let at = |h: u8| orders.iter().find(|o| o.hour == h).map(|o| o.orders);
    assert_eq!(at(19), Some(2));
    assert_eq!(at(21), Some(2));
    assert_eq!(at(8), Some(1));
    assert_eq!(at(3), None);

    let traffic = hour_vs_traffic(&ds);
    let jam_19 = traffic
        .iter()
        .find(|t| t.hour == 19 && t.traffic == "Jam")
        .map(|t| t.count);
    assert_eq!(jam_19, Some(2));
    assert_eq!(traffic.iter().map(|t| t.count).sum::<usize>(), 12);
}

#[test]
fn test_view_serializes() {
    let view = dashboard_view(&common::dataset());
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["header"], "Analysis Dashboard");
    assert_eq!(json["kpis"]["total_orders"], 11);
    assert!(json["delivery_time_by_age_group"][0].get("hue").is_none());
}
