//! Page rendering. Each [`Page`] maps to exactly one view builder.

use crate::{
    dashboard::{dashboard_view, DashboardView},
    dataset::{CategoricalColumn, Dataset, WEEKDAYS},
    error::AppError,
    features::{
        PredictionForm, AGE_RANGE, DELIVERIES_RANGE, HOUR_RANGE, RATING_RANGE, VEHICLE_CONDITION_RANGE,
        VEHICLE_OPTIONS,
    },
    model::ModelBundle,
    region::{RegionBounds, INDIA},
    resources::AppContext,
    session::{Page, SessionState},
};
use serde::Serialize;

/// New Delhi.
pub const DEFAULT_COORDINATES: (f64, f64) = (28.61394, 77.20902);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub sections: Vec<Section>,
}

pub fn home_view() -> HomeView {
    HomeView {
        title: "Zomato Food Delivery Predictive Analytics",
        subtitle: "Welcome to Zomato Delivery Analytics",
        sections: vec![
            Section {
                heading: "About",
                body: "Identify key drivers of delivery time in the Dashboard page. \
                       Predict delivery time in the Prediction Model page.",
            },
            Section {
                heading: "Business Understanding",
                body: "Zomato is India's #1 food delivery app with over 3 million restaurants \
                       and 3 billion+ orders delivered. As demand for food delivery grew, \
                       competition in the Indian market intensified, with Swiggy as the primary \
                       rival. Both compete on promotions and on faster delivery, a critical \
                       factor in customer satisfaction and retention.",
            },
            Section {
                heading: "Business Challenges",
                body: "The food delivery industry struggles with delivery delays. Customers \
                       expect their food on time and any delay leads to dissatisfaction. A \
                       15-minute delivery service was shut down after four months because it \
                       failed to meet customer expectations.",
            },
            Section {
                heading: "Problem Statement",
                body: "To sustain its position as the #1 food delivery app, Zomato should focus \
                       on accurately predicting delivery time.",
            },
            Section {
                heading: "Objectives",
                body: "Identify key drivers of delivery time. Predict delivery time.",
            },
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetKind {
    NumberInput {
        min: Option<f64>,
        max: Option<f64>,
        default: f64,
    },
    Slider {
        min: f64,
        max: f64,
        default: f64,
    },
    Select {
        options: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    /// Key of the matching [`PredictionForm`] field.
    pub field: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

impl Widget {
    fn number(field: &'static str, label: &'static str, range: Option<(f64, f64)>, default: f64) -> Self {
        Self {
            field,
            label,
            kind: WidgetKind::NumberInput {
                min: range.map(|r| r.0),
                max: range.map(|r| r.1),
                default,
            },
        }
    }

    fn slider(field: &'static str, label: &'static str, (min, max): (u8, u8), default: u8) -> Self {
        Self {
            field,
            label,
            kind: WidgetKind::Slider {
                min: min as f64,
                max: max as f64,
                default: default as f64,
            },
        }
    }

    fn select(field: &'static str, label: &'static str, options: Vec<String>) -> Self {
        Self {
            field,
            label,
            kind: WidgetKind::Select { options },
        }
    }
}

fn as_f64((lo, hi): (u8, u8)) -> (f64, f64) {
    (lo as f64, hi as f64)
}

pub fn form_widgets(dataset: &Dataset) -> Vec<Widget> {
    let (lat, lon) = DEFAULT_COORDINATES;
    vec![
        Widget::number("delivery_person_age", "Delivery Person Age", Some(as_f64(AGE_RANGE)), 30.0),
        Widget::number("delivery_person_ratings", "Delivery Person Ratings", Some(RATING_RANGE), 4.6),
        Widget::select("order_day", "Order Day", WEEKDAYS.iter().map(|d| d.to_string()).collect()),
        Widget::slider("order_hour", "Order Hour", HOUR_RANGE, 0),
        Widget::select(
            "vehicle_type",
            "Vehicle Type",
            VEHICLE_OPTIONS.iter().map(|(label, _)| label.to_string()).collect(),
        ),
        Widget::number(
            "vehicle_condition",
            "Vehicle Condition (0=Poor)",
            Some(as_f64(VEHICLE_CONDITION_RANGE)),
            0.0,
        ),
        Widget::select(
            "traffic_level",
            "Traffic Level",
            dataset.unique_values(CategoricalColumn::RoadTrafficDensity),
        ),
        Widget::slider("multiple_deliveries", "Number of Delivery", DELIVERIES_RANGE, 1),
        Widget::number("restaurant_latitude", "Restaurant Latitude", None, lat),
        Widget::number("restaurant_longitude", "Restaurant Longitude", None, lon),
        Widget::number("delivery_latitude", "Delivery Latitude", None, lat),
        Widget::number("delivery_longitude", "Delivery Longitude", None, lon),
        Widget::select("city", "City", dataset.unique_values(CategoricalColumn::City)),
        Widget::select("festival", "Festival", dataset.unique_values(CategoricalColumn::Festival)),
        Widget::select("order_type", "Order Type", dataset.unique_values(CategoricalColumn::TypeOfOrder)),
        Widget::select(
            "weather_conditions",
            "Weather",
            dataset.unique_values(CategoricalColumn::WeatherConditions),
        ),
    ]
}

/// The form as the widgets initially show it: numeric defaults, first option
/// of every selection (unset when the dataset offers none).
pub fn default_form(dataset: &Dataset) -> PredictionForm {
    let first = |c: CategoricalColumn| dataset.unique_values(c).into_iter().next();
    let (lat, lon) = DEFAULT_COORDINATES;
    PredictionForm {
        delivery_person_age: Some(30.0),
        delivery_person_ratings: Some(4.6),
        order_day: Some(WEEKDAYS[0].to_string()),
        order_hour: Some(0.0),
        vehicle_type: Some(VEHICLE_OPTIONS[0].0.to_string()),
        vehicle_condition: Some(0.0),
        traffic_level: first(CategoricalColumn::RoadTrafficDensity),
        multiple_deliveries: Some(1.0),
        restaurant_latitude: Some(lat),
        restaurant_longitude: Some(lon),
        delivery_latitude: Some(lat),
        delivery_longitude: Some(lon),
        city: first(CategoricalColumn::City),
        festival: first(CategoricalColumn::Festival),
        order_type: first(CategoricalColumn::TypeOfOrder),
        weather_conditions: first(CategoricalColumn::WeatherConditions),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub header: &'static str,
    pub description: &'static str,
    pub widgets: Vec<Widget>,
    pub defaults: PredictionForm,
    pub region: RegionBounds,
    pub feature_count: usize,
    pub show_map: bool,
}

pub fn prediction_view(dataset: &Dataset, model: &ModelBundle, show_map: bool) -> PredictionView {
    PredictionView {
        header: "Delivery Time Prediction",
        description: "Use this machine learning model to predict delivery time",
        widgets: form_widgets(dataset),
        defaults: default_form(dataset),
        region: INDIA,
        feature_count: model.feature_names().len(),
        show_map,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", content = "view", rename_all = "snake_case")]
pub enum View {
    Home(HomeView),
    Dashboard(DashboardView),
    PredictionModel(PredictionView),
}

/// Renders whatever page `state` points at. The dataset is needed for every
/// page; the model only for the prediction page.
pub async fn render(state: &SessionState, ctx: &AppContext) -> Result<View, AppError> {
    let dataset = ctx.dataset().await?;
    Ok(match state.page {
        Page::Home => View::Home(home_view()),
        Page::Dashboard => View::Dashboard(dashboard_view(&dataset)),
        Page::PredictionModel => {
            let model = ctx.model().await?;
            View::PredictionModel(prediction_view(&dataset, &model, state.show_map))
        }
    })
}
