//! Dashboard module
//!
//! Provides the monthly overview (transactions, totals and budget progress), the reports page
//! period selector, and the chart series shown on the reports page.

mod aggregation;
mod charts;
mod handlers;
mod summary;

pub use handlers::{
    get_annual_flow_chart, get_category_chart, get_daily_flow_chart, get_dashboard, get_reports,
};
