//! CSV download of the monthly report.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::WriterBuilder;

use crate::{
    Error,
    ledger::{CategoryShare, Money, Period, round_percent},
    report::{
        monthly::{PeriodReport, build_period_report},
        query::{MonthQuery, ReportState},
    },
    timezone::local_today,
};

/// Download the monthly report as CSV.
pub async fn get_monthly_report_csv(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let period = query.period(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let report = build_period_report(period, &connection)?;
    let body = report_to_csv(&report)
        .inspect_err(|error| tracing::error!("Could not write the report as CSV: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name(period)),
            ),
        ],
        body,
    )
        .into_response())
}

fn file_name(period: Period) -> String {
    match period {
        Period::Month { year, month } => format!("report-{year}-{:02}.csv", month as u8),
        Period::Year(year) => format!("report-{year}.csv"),
    }
}

/// Write the summary, the category breakdown and the transactions as
/// consecutive blocks of rows separated by an empty record.
fn report_to_csv(report: &PeriodReport) -> Result<String, Error> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(vec![]);

    writer.write_record(["Report", &report.period.label()])?;
    writer.write_record(["Opening Balance", &optional_amount(report.opening_balance)])?;
    writer.write_record(["Income", &report.totals.income.to_string()])?;
    writer.write_record(["Expenses", &report.totals.expense.to_string()])?;
    writer.write_record(["Surplus", &report.totals.net.to_string()])?;
    writer.write_record(["Closing Balance", &optional_amount(report.closing_balance)])?;
    writer.write_record([""])?;

    writer.write_record(["Type", "Category", "Amount", "Share (%)"])?;
    write_breakdown(&mut writer, "income", &report.income_breakdown)?;
    write_breakdown(&mut writer, "expense", &report.expense_breakdown)?;
    writer.write_record([""])?;

    writer.write_record([
        "Date",
        "Type",
        "Category",
        "Description",
        "Amount",
        "Responsible Party",
        "Evidence",
    ])?;
    for transaction in &report.transactions {
        writer.write_record([
            transaction.date.to_string().as_str(),
            transaction.direction.as_str(),
            &transaction.category,
            &transaction.description,
            &transaction.amount.to_string(),
            &transaction.responsible_party,
            &transaction.evidence,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

fn write_breakdown(
    writer: &mut csv::Writer<Vec<u8>>,
    direction: &str,
    shares: &[CategoryShare],
) -> Result<(), Error> {
    for share in shares {
        let percent = share
            .percent_of_total
            .map(|percent| round_percent(percent, 2).to_string())
            .unwrap_or_default();

        writer.write_record([
            direction,
            &share.category,
            &share.amount.to_string(),
            &percent,
        ])?;
    }

    Ok(())
}

fn optional_amount(amount: Option<Money>) -> String {
    amount.map(|amount| amount.to_string()).unwrap_or_default()
}
