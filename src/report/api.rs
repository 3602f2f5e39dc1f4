//! Report figures as JSON.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    ledger::{
        CategoryShare, Direction, Money, Period, PeriodDelta, PeriodTotals, breakdown_by_category,
        period_over_period_delta, total_by_direction, totals,
    },
    report::query::{ReportState, transactions_in},
    timezone::local_today,
    validation::ValidationError,
};

/// Selects the period of a report API call.
///
/// With `month` the period is that month, with only `year` it is the whole
/// year, and with neither it is the current month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportApiQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
    /// Only used by the breakdown, "income" or "expense".
    pub direction: Option<String>,
}

impl ReportApiQuery {
    fn period(&self, today: Date) -> Result<Period, ValidationError> {
        match (self.year, self.month) {
            (year, Some(month)) => Period::month(year.unwrap_or(today.year()), month),
            (Some(year), None) => Period::year(year),
            (None, None) => Ok(Period::containing(today)),
        }
    }
}

/// A period with its first and last day as ISO 8601 dates.
#[derive(Debug, Serialize)]
pub struct PeriodJson {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl PeriodJson {
    fn new(period: Period) -> Result<Self, ValidationError> {
        let range = period.date_range()?;

        Ok(Self {
            label: period.label(),
            start: range.start().to_string(),
            end: range.end().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: PeriodJson,
    pub totals: PeriodTotals,
    pub previous_period: PeriodJson,
    pub previous_totals: PeriodTotals,
    pub delta: PeriodDelta,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub period: PeriodJson,
    pub direction: Direction,
    pub total: Money,
    /// Categories in the order they were first recorded in the period.
    pub categories: Vec<CategoryShare>,
}

/// The totals of a period and the change from the period before it.
pub async fn get_report_summary(
    State(state): State<ReportState>,
    Query(query): Query<ReportApiQuery>,
) -> Response {
    match summary(&state, &query) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_json_response(),
    }
}

fn summary(state: &ReportState, query: &ReportApiQuery) -> Result<SummaryResponse, Error> {
    let period = query.period(local_today(&state.local_timezone)?)?;
    let previous_period = period.previous();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let current_totals = totals(&transactions_in(period, &connection)?);
    let previous_totals = totals(&transactions_in(previous_period, &connection)?);

    Ok(SummaryResponse {
        period: PeriodJson::new(period)?,
        totals: current_totals,
        previous_period: PeriodJson::new(previous_period)?,
        previous_totals,
        delta: period_over_period_delta(&current_totals, &previous_totals),
    })
}

/// The category breakdown of income or expenses over a period.
pub async fn get_report_breakdown(
    State(state): State<ReportState>,
    Query(query): Query<ReportApiQuery>,
) -> Response {
    match breakdown(&state, &query) {
        Ok(breakdown) => Json(breakdown).into_response(),
        Err(error) => error.into_json_response(),
    }
}

fn breakdown(state: &ReportState, query: &ReportApiQuery) -> Result<BreakdownResponse, Error> {
    let direction: Direction = query
        .direction
        .as_deref()
        .ok_or(ValidationError::MissingField("direction"))?
        .parse()?;
    let period = query.period(local_today(&state.local_timezone)?)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = transactions_in(period, &connection)?;

    Ok(BreakdownResponse {
        period: PeriodJson::new(period)?,
        direction,
        total: total_by_direction(&transactions, direction),
        categories: breakdown_by_category(&transactions, direction),
    })
}
