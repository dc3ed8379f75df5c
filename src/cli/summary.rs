use super::ui;
use crate::core::QuoteProvider;
use crate::core::refresh::{RefreshReport, Tracker};
use crate::core::valuation::FundValuation;
use anyhow::Result;
use comfy_table::Cell;

impl FundValuation {
    pub fn display_as_table(&self) -> String {
        let currency = &self.summary.currency;
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Name"),
            ui::header_cell("Alloc"),
            ui::header_cell(&format!("Amount ({currency})")),
            ui::header_cell("Cost"),
            ui::header_cell("Price"),
            ui::header_cell("Day"),
            ui::header_cell(&format!("Value ({currency})")),
            ui::header_cell("P/L"),
            ui::header_cell("P/L (%)"),
        ]);

        for holding in &self.holdings {
            let day = holding
                .change_percent
                .as_deref()
                .and_then(|c| c.parse::<f64>().ok().map(|v| (v, c)));

            table.add_row(vec![
                Cell::new(&holding.code),
                Cell::new(&holding.name),
                Cell::new(format!("{:.1}%", holding.allocation * 100.0)),
                ui::amount_cell(holding.allocation_amount),
                ui::format_optional_cell(holding.purchase_price, |p| format!("{p:.3}")),
                ui::format_optional_cell(holding.current_price, |p| format!("{p:.3}")),
                day.map_or_else(ui::na_cell, |(v, c)| ui::signed_cell(v, format!("{c}%"))),
                ui::amount_cell(holding.current_value),
                ui::signed_cell(holding.profit, ui::format_amount(holding.profit)),
                ui::signed_cell(holding.profit_rate, format!("{:.2}%", holding.profit_rate)),
            ]);
        }

        let summary = &self.summary;
        let mut output = format!(
            "Fund: {} {}\n\n",
            ui::style_text(&self.name, ui::StyleType::Title),
            ui::style_text(&format!("({})", self.fund_id), ui::StyleType::Subtle)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nNet Value ({}): {}   P/L: {}   Return: {}",
            ui::style_text(currency, ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_amount(summary.total_current_value),
                ui::StyleType::TotalLabel
            ),
            ui::style_signed(&ui::format_amount(summary.total_profit), summary.total_profit),
            ui::style_signed(
                &format!("{:.2}%", summary.total_profit_rate),
                summary.total_profit_rate
            ),
        ));
        output
    }
}

/// Renders every fund followed by the aggregate in the reporting currency.
pub fn render(report: &RefreshReport, reporting_currency: &str) -> String {
    let mut output = String::new();
    if !report.feed_ok {
        output.push_str(&ui::style_text(
            "Quote feed unavailable, holdings shown at their allocation.\n\n",
            ui::StyleType::Error,
        ));
    }

    for (i, fund) in report.funds.iter().enumerate() {
        if i > 0 {
            output.push_str(&format!("\n\n{}\n\n", "─".repeat(ui::term_width())));
        }
        output.push_str(&fund.display_as_table());
    }

    let total = match &report.total {
        Ok(total) => ui::style_text(&ui::format_amount(*total), ui::StyleType::TotalLabel),
        Err(e) => ui::style_text(&e.to_string(), ui::StyleType::Error),
    };
    output.push_str(&format!(
        "\n\n{}\nTotal Assets ({}): {}",
        "=".repeat(ui::term_width()),
        reporting_currency,
        total
    ));
    output
}

pub async fn run<P: QuoteProvider>(tracker: &mut Tracker<P>) -> Result<()> {
    let pb = ui::new_spinner("Fetching quotes...");
    let report = tracker.refresh().await;
    pb.finish_and_clear();

    println!("{}", render(&report, &tracker.config().reporting_currency));
    report.total?;
    Ok(())
}
