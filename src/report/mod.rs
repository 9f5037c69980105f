//! Report and dashboard generation.

pub mod dashboard;
pub mod generator;

pub use dashboard::{build_dashboard, render_dashboard_json, render_dashboard_text, DashboardView};
pub use generator::*;
