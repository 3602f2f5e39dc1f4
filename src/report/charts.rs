//! ECharts bar charts for the executive and annual reports.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    ledger::{Period, PeriodTotals},
};

/// The script that must be loaded before [charts_script] runs.
pub(super) const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

pub(super) fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// JavaScript that draws `charts` once the page has loaded, following the
/// browser's dark mode setting and resizing with the window.
pub(super) fn charts_script(charts: &[ReportChart]) -> Vec<HeadElement> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        HeadElement::ScriptSource(PreEscaped(format!(
            "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
        ))),
    ]
}

/// Income and expense of two periods side by side.
pub(super) fn comparison_chart(
    previous: (Period, &PeriodTotals),
    current: (Period, &PeriodTotals),
) -> Chart {
    let (previous_period, previous_totals) = previous;
    let (current_period, current_totals) = current;

    base_chart("Income and Expenses", &current_period.label())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Income".to_owned(), "Expenses".to_owned()]),
        )
        .series(
            Bar::new()
                .name(previous_period.label())
                .data(vec![
                    previous_totals.income as f64,
                    previous_totals.expense as f64,
                ]),
        )
        .series(
            Bar::new()
                .name(current_period.label())
                .data(vec![
                    current_totals.income as f64,
                    current_totals.expense as f64,
                ]),
        )
}

/// Income and expense for each month of a year.
pub(super) fn monthly_chart(year: i32, months: &[(Period, PeriodTotals)]) -> Chart {
    let labels: Vec<String> = months.iter().map(|(month, _)| month.short_label()).collect();
    let income: Vec<f64> = months.iter().map(|(_, totals)| totals.income as f64).collect();
    let expense: Vec<f64> = months.iter().map(|(_, totals)| totals.expense as f64).collect();

    base_chart("Monthly Income and Expenses", &year.to_string())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expenses").data(expense))
}

fn base_chart(title: &str, subtitle: &str) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('id-ID', {
              style: 'currency',
              currency: 'IDR',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
