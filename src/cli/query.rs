use super::ui;
use crate::core::error::ServiceError;
use crate::service::{AverageRate, MajorDifference, MinMaxAverage, RateService};
use comfy_table::{Cell, Table};

/// One-shot rate query issued from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Exchange { currency: String, date: String },
    Averages { currency: String, quotations: String },
    Spread { currency: String, quotations: String },
}

impl Query {
    fn describe(&self) -> String {
        match self {
            Query::Exchange { currency, date } => {
                format!("Fetching {} average rate for {}", currency.to_uppercase(), date)
            }
            Query::Averages {
                currency,
                quotations,
            } => format!(
                "Fetching last {} {} mid rates",
                quotations,
                currency.to_uppercase()
            ),
            Query::Spread {
                currency,
                quotations,
            } => format!(
                "Fetching last {} {} bid/ask quotations",
                quotations,
                currency.to_uppercase()
            ),
        }
    }
}

pub async fn run(service: &RateService, query: Query) -> anyhow::Result<()> {
    let pb = ui::new_spinner(query.describe());
    let result = execute(service, &query).await;
    pb.finish_and_clear();

    match result {
        Ok(table) => {
            println!("{table}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Err(e.into())
        }
    }
}

async fn execute(service: &RateService, query: &Query) -> Result<Table, ServiceError> {
    let table = match query {
        Query::Exchange { currency, date } => {
            average_table(&service.average_rate(currency, date).await?)
        }
        Query::Averages {
            currency,
            quotations,
        } => min_max_table(&service.min_max_average(currency, quotations).await?),
        Query::Spread {
            currency,
            quotations,
        } => difference_table(&service.major_difference(currency, quotations).await?),
    };
    Ok(table)
}

fn average_table(rate: &AverageRate) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Date"),
        ui::header_cell("Average Rate"),
    ]);
    table.add_row(vec![
        Cell::new(ui::style_text(&rate.currency, ui::StyleType::Title)),
        Cell::new(rate.date.format("%Y-%m-%d").to_string()),
        ui::rate_cell(rate.average_exchange_rate),
    ]);
    table
}

fn min_max_table(averages: &MinMaxAverage) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Quotations"),
        ui::header_cell("Min Average"),
        ui::header_cell("Max Average"),
    ]);
    table.add_row(vec![
        Cell::new(ui::style_text(&averages.currency, ui::StyleType::Title)),
        Cell::new(averages.quotations.to_string()),
        ui::rate_cell(averages.min_average),
        ui::rate_cell(averages.max_average),
    ]);
    table
}

fn difference_table(difference: &MajorDifference) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Quotations"),
        ui::header_cell("Major Difference"),
    ]);
    table.add_row(vec![
        Cell::new(ui::style_text(&difference.currency, ui::StyleType::Title)),
        Cell::new(difference.quotations.to_string()),
        ui::rate_cell(difference.major_difference),
    ]);
    table
}
