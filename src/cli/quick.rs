use super::ui;
use crate::core::QuoteProvider;
use crate::core::legacy::PortfolioSnapshot;
use crate::core::refresh::{RefreshReport, Tracker};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the previous-close marks of every quick portfolio as one table.
pub fn render(report: &RefreshReport) -> String {
    if report.snapshots.is_empty() {
        return "No quick portfolios configured.".to_string();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Portfolio"),
        ui::header_cell("Net Value"),
        ui::header_cell("Profit"),
        ui::header_cell("Return"),
        ui::header_cell("Priced"),
    ]);
    for snapshot in &report.snapshots {
        table.add_row(snapshot_row(snapshot));
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Marked against previous close", ui::StyleType::Title)
    );
    if !report.feed_ok {
        output.push_str(&ui::style_text(
            "Quote feed unavailable, nothing could be priced.\n\n",
            ui::StyleType::Error,
        ));
    }
    output.push_str(&table.to_string());
    output
}

fn snapshot_row(snapshot: &PortfolioSnapshot) -> Vec<Cell> {
    let profit = snapshot.total_value - snapshot.total_initial_value;
    let return_rate = snapshot.return_rate.parse::<f64>().unwrap_or(0.0);
    vec![
        Cell::new(&snapshot.name),
        ui::amount_cell(snapshot.total_value),
        ui::signed_cell(profit, ui::format_amount(profit)),
        ui::signed_cell(return_rate, format!("{}%", snapshot.return_rate)),
        Cell::new(snapshot.priced.to_string()),
    ]
}

pub async fn run<P: QuoteProvider>(tracker: &mut Tracker<P>) -> Result<()> {
    let pb = ui::new_spinner("Fetching quotes...");
    let report = tracker.refresh().await;
    pb.finish_and_clear();

    println!("{}", render(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(snapshots: Vec<PortfolioSnapshot>) -> RefreshReport {
        RefreshReport {
            refreshed_at: Utc::now(),
            feed_ok: true,
            quotes: 5,
            funds: vec![],
            total: Ok(0.0),
            snapshots,
        }
    }

    #[test]
    fn test_render_snapshots() {
        let output = render(&report(vec![PortfolioSnapshot {
            name: "US".to_string(),
            total_value: 1_035_000.0,
            total_initial_value: 1_000_000.0,
            net_value: "1035000.00".to_string(),
            profit: "35000.00".to_string(),
            return_rate: "3.50".to_string(),
            priced: 5,
        }]));
        let output = console::strip_ansi_codes(&output).to_string();
        assert!(output.contains("1,035,000.00"));
        assert!(output.contains("35,000.00"));
        assert!(output.contains("3.50%"));
    }

    #[test]
    fn test_render_without_portfolios() {
        assert_eq!(render(&report(vec![])), "No quick portfolios configured.");
    }
}
