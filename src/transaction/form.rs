use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    payment_mode::PaymentMode,
    transaction::TransactionType,
};

pub struct TransactionFormDefaults {
    pub transaction_type: TransactionType,
    pub date: Date,
    pub max_date: Date,
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults,
    available_categories: &[Category],
    available_payment_modes: &[PaymentMode],
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-income"
                        type="radio"
                        value="income"
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0.01"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select Category" }

                @for category in available_categories {
                    option value=(category.id) { (category.name) }
                }
            }
        }

        div
        {
            label
                for="payment_mode_id"
                class=(FORM_LABEL_STYLE)
            {
                "Payment Mode"
            }

            select
                name="payment_mode_id"
                id="payment_mode_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select Mode" }

                @for payment_mode in available_payment_modes {
                    option value=(payment_mode.id) { (payment_mode.mode) }
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description (Optional)"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="What was this for?"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName},
        payment_mode::PaymentMode,
        transaction::TransactionType,
    };

    use super::{TransactionFormDefaults, transaction_form_fields};

    #[test]
    fn transaction_form_fields_checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (transaction_type, expected) in cases {
            let html = render_fields(transaction_type);
            assert_checked_value(&html, expected);
        }
    }

    #[test]
    fn transaction_form_fields_lists_lookup_options() {
        let html = render_fields(TransactionType::Expense);

        let category_options = select_option_texts(&html, "category_id");
        assert_eq!(category_options, vec!["Groceries", "Rent"]);

        let payment_mode_options = select_option_texts(&html, "payment_mode_id");
        assert_eq!(payment_mode_options, vec!["Card", "Cash"]);
    }

    fn render_fields(transaction_type: TransactionType) -> Html {
        let max_date = date!(2026 - 01 - 05);
        let categories = vec![
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Groceries"),
            },
            Category {
                id: 2,
                name: CategoryName::new_unchecked("Rent"),
            },
        ];
        let payment_modes = vec![
            PaymentMode {
                id: 1,
                mode: "Card".to_owned(),
            },
            PaymentMode {
                id: 2,
                mode: "Cash".to_owned(),
            },
        ];
        let fields = transaction_form_fields(
            &TransactionFormDefaults {
                transaction_type,
                date: max_date,
                max_date,
            },
            &categories,
            &payment_modes,
        );
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    fn assert_checked_value(document: &Html, expected: &str) {
        let selector = Selector::parse("input[type=radio][name=type_]").unwrap();
        let inputs = document.select(&selector).collect::<Vec<_>>();
        assert_eq!(
            inputs.len(),
            2,
            "want 2 transaction type inputs, got {}",
            inputs.len()
        );

        let checked = inputs
            .iter()
            .find(|input| input.value().attr("checked").is_some())
            .and_then(|input| input.value().attr("value"));
        assert_eq!(
            checked,
            Some(expected),
            "want checked transaction type to be {expected}, got {checked:?}"
        );
    }

    fn select_option_texts(document: &Html, select_name: &str) -> Vec<String> {
        let selector = Selector::parse(&format!("select[name={select_name}] option")).unwrap();
        document
            .select(&selector)
            .filter(|option| !option.value().attr("value").unwrap_or_default().is_empty())
            .map(|option| option.text().collect::<Vec<_>>().join("").trim().to_owned())
            .collect()
    }
}
