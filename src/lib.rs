//! Delivery-time analytics service: a dashboard over historical food-delivery
//! records plus a delivery-time regression model behind a per-session page
//! state machine.

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod prediction;
pub mod region;
pub mod resources;
pub mod server;
pub mod session;
pub mod types;
pub mod views;
