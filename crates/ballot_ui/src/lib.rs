pub mod dashboard_service;
pub mod panels;

pub use dashboard_service::DashboardService;
pub use panels::dashboard::{DashboardData, format_alert};
