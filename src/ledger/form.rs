use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    datetime::parse_date,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction, form_error_message,
    },
    ledger::{Direction, EXPENSE_CATEGORIES, INCOME_CATEGORIES, NewTransaction, Transaction, parse_rupiah},
    validation::ValidationError,
};

/// The fields of the transaction form as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionForm {
    pub direction: String,
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: String,
    #[serde(default)]
    pub responsible_party: String,
    #[serde(default)]
    pub evidence: String,
}

impl TransactionForm {
    /// Parse and check the submitted fields.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the direction, date or amount cannot be
    /// parsed or the category is blank.
    pub fn parse(&self) -> Result<NewTransaction, ValidationError> {
        let transaction = NewTransaction {
            direction: self.direction.trim().parse()?,
            date: parse_date(&self.date)?,
            category: self.category.trim().to_owned(),
            description: self.description.trim().to_owned(),
            amount: parse_rupiah(&self.amount)?,
            responsible_party: self.responsible_party.trim().to_owned(),
            evidence: self.evidence.trim().to_owned(),
        };
        transaction.validate()?;

        Ok(transaction)
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            direction: transaction.direction.as_str().to_owned(),
            date: transaction.date.to_string(),
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            responsible_party: transaction.responsible_party.clone(),
            evidence: transaction.evidence.clone(),
        }
    }
}

pub(super) fn transaction_form_view(
    action: FormAction<'_>,
    values: &TransactionForm,
    submit_label: &str,
    error_message: &str,
) -> Markup {
    let is_income = values.direction == Direction::Income.as_str();

    html! {
        form
            hx-post=[action.post_url()]
            hx-put=[action.put_url()]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    div class="flex items-center gap-3"
                    {
                        input
                            name="direction"
                            id="direction-income"
                            type="radio"
                            value="income"
                            checked[is_income]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="direction-income" class=(FORM_RADIO_LABEL_STYLE) { "Income" }
                    }

                    div class="flex items-center gap-3"
                    {
                        input
                            name="direction"
                            id="direction-expense"
                            type="radio"
                            value="expense"
                            checked[!is_income]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="direction-expense" class=(FORM_RADIO_LABEL_STYLE) { "Expense" }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    list="category-options"
                    placeholder="Infaq Jumat"
                    value=(values.category)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="category-options"
                {
                    @for category in INCOME_CATEGORIES.iter().chain(EXPENSE_CATEGORIES.iter()) {
                        option value=(category) {}
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rp)" }

                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="numeric"
                    placeholder="0"
                    value=(values.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="responsible_party" class=(FORM_LABEL_STYLE) { "Responsible Party" }

                input
                    name="responsible_party"
                    id="responsible_party"
                    type="text"
                    placeholder="Bendahara"
                    value=(values.responsible_party)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="evidence" class=(FORM_LABEL_STYLE) { "Evidence" }

                input
                    name="evidence"
                    id="evidence"
                    type="text"
                    placeholder="Receipt number"
                    value=(values.evidence)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (form_error_message(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
