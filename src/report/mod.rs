//! Financial reports for the mosque committee: the monthly report with its
//! CSV export, the executive month-on-month summary, the annual report and
//! the JSON report API.

mod annual;
mod api;
mod charts;
mod executive;
mod export;
mod monthly;
mod opening_balance;
mod query;
mod views;

pub use annual::{AnnualReport, build_annual_report, get_annual_report_page};
pub use api::{get_report_breakdown, get_report_summary};
pub use executive::{ExecutiveSummary, build_executive_summary, get_executive_report_page};
pub use export::get_monthly_report_csv;
pub use monthly::{PeriodReport, build_period_report, get_monthly_report_page};
pub use opening_balance::{
    create_opening_balance_table, get_opening_balance, set_opening_balance,
    set_opening_balance_endpoint,
};
pub use query::{MonthQuery, ReportState, YearQuery};
