//! Markup shared by the report pages.

use maud::{Markup, html};
use time::Month;

use crate::{
    endpoints,
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        format_percent, format_rupiah,
    },
    ledger::{CategoryShare, Money, Period},
};

/// A table of categories with their amounts and share of `total`.
pub(super) fn breakdown_table(title: &str, shares: &[CategoryShare], total: Money) -> Markup {
    html!(
        div class="overflow-x-auto"
        {
            table class=(TABLE_STYLE) data-breakdown=(title)
            {
                caption class="p-2 text-left font-semibold text-gray-900 dark:text-white"
                {
                    (title)
                }

                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Share" }
                    }
                }

                tbody
                {
                    @for share in shares {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (share.category) }
                            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                            {
                                (format_rupiah(share.amount))
                            }
                            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                            {
                                (format_percent(share.percent_of_total, 1))
                            }
                        }
                    }

                    @if shares.is_empty() {
                        tr
                        {
                            td colspan="3" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "Nothing recorded."
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                        {
                            (format_rupiah(total))
                        }
                        td class=(TABLE_CELL_STYLE) {}
                    }
                }
            }
        }
    )
}

/// Links to the report for the period before and after `period`.
pub(super) fn period_navigation(endpoint: &str, period: Period) -> Markup {
    let previous = period.previous();
    let next = next_period(period);

    html!(
        nav class="flex justify-between items-center" aria-label="Report period"
        {
            a href=(period_url(endpoint, previous)) class=(LINK_STYLE) rel="prev"
            {
                "← " (previous.label())
            }

            span class="font-semibold" { (period.label()) }

            a href=(period_url(endpoint, next)) class=(LINK_STYLE) rel="next"
            {
                (next.label()) " →"
            }
        }
    )
}

pub(super) fn period_url(endpoint: &str, period: Period) -> String {
    match period {
        Period::Month { year, month } => {
            endpoints::with_period_query(endpoint, year, Some(month as u8))
        }
        Period::Year(year) => endpoints::with_period_query(endpoint, year, None),
    }
}

fn next_period(period: Period) -> Period {
    match period {
        Period::Month {
            year,
            month: Month::December,
        } => Period::Month {
            year: year + 1,
            month: Month::January,
        },
        Period::Month { year, month } => Period::Month {
            year,
            month: month.next(),
        },
        Period::Year(year) => Period::Year(year + 1),
    }
}
