use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::{booking::BookingStatus, ledger::Direction, ledger::Money};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SMALL_STYLE: &str = "px-3 py-1 text-xs font-medium rounded \
    text-white bg-blue-500 hover:bg-blue-600 dark:bg-blue-600 dark:hover:bg-blue-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_RADIO_GROUP_STYLE: &str = "flex gap-2";
pub const FORM_RADIO_INPUT_STYLE: &str = "peer sr-only";
pub const FORM_RADIO_LABEL_STYLE: &str = "block rounded border border-gray-300 \
    dark:border-gray-600 bg-white dark:bg-gray-700 px-3 py-2 text-sm font-medium \
    text-gray-700 dark:text-white cursor-pointer transition \
    hover:border-gray-400 hover:bg-gray-50 hover:text-gray-900 \
    hover:dark:border-gray-500 hover:dark:bg-gray-600 \
    peer-checked:border-blue-600 peer-checked:bg-blue-50 peer-checked:text-blue-700 \
    peer-checked:dark:border-blue-500 peer-checked:dark:bg-blue-600/20 \
    peer-checked:dark:text-blue-200";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right \
    text-gray-500 dark:text-gray-400";

// Badge and card styles
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold rounded-full";

pub const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Where a form is submitted to, and whether it creates or updates a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction<'a> {
    /// Send a POST request to the endpoint.
    Create(&'a str),
    /// Send a PUT request to the endpoint.
    Update(&'a str),
}

impl<'a> FormAction<'a> {
    /// The value for the form's `hx-post` attribute, if any.
    pub fn post_url(&self) -> Option<&'a str> {
        match self {
            FormAction::Create(url) => Some(url),
            FormAction::Update(_) => None,
        }
    }

    /// The value for the form's `hx-put` attribute, if any.
    pub fn put_url(&self) -> Option<&'a str> {
        match self {
            FormAction::Create(_) => None,
            FormAction::Update(url) => Some(url),
        }
    }
}

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Masjid Admin" }
                link rel="icon" type="image/png" href="/static/favicon-32x32.png" sizes="32x32";
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg" {}

                style
                {
                    r#"
                    #alert-container:empty {
                        display: none;
                    }

                    /* Keep chart tooltips below the fixed bottom nav, but above page content. */
                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                // Alert container for error responses
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// Format whole Rupiah with thousands separators, e.g. "Rp 3,200,000".
pub fn format_rupiah(amount: Money) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("Rp ")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-Rp ")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    match amount {
        0 => {
            // Zero is hardcoded as "0", so we must specify the formatted string for zero
            "Rp 0".to_owned()
        }
        amount if amount < 0 => negative_fmt.fmt_string(amount.unsigned_abs() as f64),
        amount => positive_fmt.fmt_string(amount as f64),
    }
}

/// Format an amount with a leading "+" for income and "-" for expenses.
pub fn format_directed_rupiah(amount: Money, direction: Direction) -> String {
    match direction {
        Direction::Income => format!("+{}", format_rupiah(amount)),
        Direction::Expense => format!("-{}", format_rupiah(amount)),
    }
}

/// Format a percentage rounded to `decimals` places, or "n/a" when there is
/// no percentage to show.
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => {
            let formatted = format!("{value:.decimals$}");

            // Avoid showing "-0%" for tiny negative changes
            if formatted.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
                format!("{}%", formatted.trim_start_matches('-'))
            } else {
                format!("{formatted}%")
            }
        }
        None => "n/a".to_owned(),
    }
}

/// Format a percentage change with an explicit sign, e.g. "+12.5%".
pub fn format_percent_change(value: Option<f64>) -> String {
    match value {
        Some(change) if change > 0.0 && format_percent(Some(change), 1) != "0.0%" => {
            format!("+{}", format_percent(Some(change), 1))
        }
        other => format_percent(other, 1),
    }
}

/// A coloured pill showing the status of a booking.
pub fn status_badge(status: BookingStatus) -> Markup {
    let colour = match status {
        BookingStatus::Pending => {
            "text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
        }
        BookingStatus::Approved => {
            "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
        BookingStatus::Rejected => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
        BookingStatus::Completed => "text-gray-800 bg-gray-100 dark:bg-gray-700 dark:text-gray-300",
    };

    html!(
        span class={ (BADGE_STYLE) " " (colour) } data-status=(status.as_str()) { (status.label()) }
    )
}

/// A coloured pill showing whether a transaction is income or an expense.
pub fn direction_badge(direction: Direction) -> Markup {
    let colour = match direction {
        Direction::Income => "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300",
        Direction::Expense => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
    };

    html!(
        span class={ (BADGE_STYLE) " " (colour) } { (direction.label()) }
    )
}

/// Edit link and delete button for a row in a table or list.
///
/// The delete button asks for confirmation with `confirm_message`, sends a
/// DELETE request to `delete_url` and removes `hx_target` on success.
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
    hx_swap: &str,
) -> Markup {
    html!(
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-target-error="#alert-container"
            hx-swap=(hx_swap)
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    )
}

/// A card with a title and a large value, used for totals.
pub fn summary_card(title: &str, value: &str, caption: Option<&str>) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class="mt-1 text-2xl font-bold tabular-nums" { (value) }

            @if let Some(caption) = caption {
                p class="mt-1 text-xs text-gray-500 dark:text-gray-400" { (caption) }
            }
        }
    )
}

/// The error message shown under a form's fields, if there is one.
pub fn form_error_message(error_message: &str) -> Markup {
    html!(
        @if !error_message.is_empty() {
            p class="text-red-600 dark:text-red-400" { (error_message) }
        }
    )
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}

#[cfg(test)]
mod tests {
    use super::{format_percent, format_percent_change, format_rupiah};

    #[test]
    fn zero_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
    }

    #[test]
    fn negative_rupiah_has_sign_before_prefix() {
        assert!(format_rupiah(-850_000).starts_with("-Rp "));
        assert!(format_rupiah(850_000).starts_with("Rp "));
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percent(Some(33.3333), 0), "33%");
        assert_eq!(format_percent(Some(12.345), 1), "12.3%");
        assert_eq!(format_percent(Some(-0.01), 1), "0.0%");
        assert_eq!(format_percent(None, 1), "n/a");
    }

    #[test]
    fn percentage_changes_have_sign() {
        assert_eq!(format_percent_change(Some(12.5)), "+12.5%");
        assert_eq!(format_percent_change(Some(-25.0)), "-25.0%");
        assert_eq!(format_percent_change(Some(0.0)), "0.0%");
        assert_eq!(format_percent_change(None), "n/a");
    }
}
