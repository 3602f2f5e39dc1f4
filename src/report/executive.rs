//! The executive summary: a month compared with the month before it.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error, endpoints,
    html::{PAGE_CONTAINER_STYLE, base, format_percent_change, format_rupiah, summary_card},
    ledger::{
        CategoryShare, Direction, Period, PeriodDelta, PeriodTotals, breakdown_by_category,
        period_over_period_delta, totals,
    },
    navigation::NavBar,
    report::{
        charts::{ReportChart, charts_script, charts_view, comparison_chart},
        query::{MonthQuery, ReportState, transactions_in},
        views::{breakdown_table, period_navigation},
    },
    timezone::local_today,
};

/// A month's figures next to those of the previous month.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutiveSummary {
    pub period: Period,
    pub previous_period: Period,
    pub totals: PeriodTotals,
    pub previous_totals: PeriodTotals,
    pub delta: PeriodDelta,
    /// What the month's income is made of.
    pub income_composition: Vec<CategoryShare>,
    /// What the month's expenses are made of.
    pub expense_composition: Vec<CategoryShare>,
}

/// Compare `period` with the period before it. January is compared with
/// December of the previous year.
pub fn build_executive_summary(
    period: Period,
    connection: &Connection,
) -> Result<ExecutiveSummary, Error> {
    let previous_period = period.previous();
    let transactions = transactions_in(period, connection)?;
    let previous_transactions = transactions_in(previous_period, connection)?;

    let current_totals = totals(&transactions);
    let previous_totals = totals(&previous_transactions);

    Ok(ExecutiveSummary {
        period,
        previous_period,
        totals: current_totals,
        previous_totals,
        delta: period_over_period_delta(&current_totals, &previous_totals),
        income_composition: breakdown_by_category(&transactions, Direction::Income),
        expense_composition: breakdown_by_category(&transactions, Direction::Expense),
    })
}

/// Render the executive summary for the month in the query string, or the
/// current month.
pub async fn get_executive_report_page(
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

    let summary = build_executive_summary(period, &connection)
        .inspect_err(|error| tracing::error!("Could not build the executive summary: {error}"))?;

    Ok(executive_report_view(&summary).into_response())
}

fn change_caption(change: Option<f64>, previous_period: Period) -> String {
    format!(
        "{} vs {}",
        format_percent_change(change),
        previous_period.label()
    )
}

fn executive_report_view(summary: &ExecutiveSummary) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXECUTIVE_REPORT_VIEW).into_html();
    let charts = [ReportChart {
        id: "comparison-chart",
        options: comparison_chart(
            (summary.previous_period, &summary.previous_totals),
            (summary.period, &summary.totals),
        )
        .to_string(),
    }];

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Executive Report" }

                (period_navigation(endpoints::EXECUTIVE_REPORT_VIEW, summary.period))

                div class="grid gap-4 sm:grid-cols-3" data-summary
                {
                    (summary_card(
                        "Income",
                        &format_rupiah(summary.totals.income),
                        Some(change_caption(summary.delta.income_pct_change, summary.previous_period).as_str()),
                    ))
                    (summary_card(
                        "Expenses",
                        &format_rupiah(summary.totals.expense),
                        Some(change_caption(summary.delta.expense_pct_change, summary.previous_period).as_str()),
                    ))
                    (summary_card(
                        "Surplus",
                        &format_rupiah(summary.totals.net),
                        Some(format!(
                            "{} in {}",
                            format_rupiah(summary.previous_totals.net),
                            summary.previous_period.label()
                        ).as_str()),
                    ))
                }

                (charts_view(&charts))

                div class="grid gap-6 lg:grid-cols-2"
                {
                    (breakdown_table("Income", &summary.income_composition, summary.totals.income))
                    (breakdown_table("Expenses", &summary.expense_composition, summary.totals.expense))
                }
            }
        }
    );

    base("Executive Report", &charts_script(&charts), &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        ledger::{Direction, Period, create_transaction, new_transaction_fixture},
        report::query::{MonthQuery, ReportState},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{build_executive_summary, get_executive_report_page};

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for (date, category, amount, direction) in [
            (date!(2025 - 12 - 05), "Donasi", 4_000_000, Direction::Income),
            (date!(2026 - 01 - 09), "Infaq Jumat", 5_000_000, Direction::Income),
            (date!(2026 - 01 - 12), "Utilitas", 800_000, Direction::Expense),
            (date!(2026 - 02 - 06), "Infaq Jumat", 6_000_000, Direction::Income),
        ] {
            create_transaction(
                new_transaction_fixture(date, category, amount, direction),
                &connection,
            )
            .unwrap();
        }
        connection
    }

    #[test]
    fn compares_with_previous_month() {
        let connection = get_connection();

        let summary =
            build_executive_summary(Period::month(2026, 2).unwrap(), &connection).unwrap();

        assert_eq!(summary.previous_totals.income, 5_000_000);
        assert_eq!(summary.totals.income, 6_000_000);
        assert_eq!(summary.delta.income_pct_change, Some(20.0));
        assert_eq!(summary.delta.expense_pct_change, Some(-100.0));
    }

    #[test]
    fn january_compares_with_december() {
        let connection = get_connection();

        let summary =
            build_executive_summary(Period::month(2026, 1).unwrap(), &connection).unwrap();

        assert_eq!(
            summary.previous_period,
            Period::Month {
                year: 2025,
                month: Month::December
            }
        );
        assert_eq!(summary.delta.income_pct_change, Some(25.0));
        // Nothing was spent in December.
        assert_eq!(summary.delta.expense_pct_change, None);
    }

    #[tokio::test]
    async fn page_shows_changes_and_chart() {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(get_connection())),
            local_timezone: "Asia/Jakarta".to_owned(),
        };
        let query = MonthQuery {
            year: Some(2026),
            month: Some(1),
        };

        let response = get_executive_report_page(State(state), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let captions: Vec<String> = html
            .select(&Selector::parse("[data-summary] p.text-xs").unwrap())
            .map(|caption| caption.text().collect())
            .collect();
        assert_eq!(
            captions,
            vec![
                "+25.0% vs December 2025",
                "n/a vs December 2025",
                "Rp 4,000,000 in December 2025"
            ]
        );

        assert!(
            html.select(&Selector::parse("#comparison-chart").unwrap())
                .next()
                .is_some()
        );
    }
}
