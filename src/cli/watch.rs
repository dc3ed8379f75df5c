use super::{quick, summary, ui};
use crate::core::QuoteProvider;
use crate::core::ValuationStrategy;
use crate::core::refresh::Tracker;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

/// Refreshes on a fixed interval and prints the view for `strategy` after
/// each cycle.
pub async fn run<P: QuoteProvider>(
    tracker: &mut Tracker<P>,
    strategy: ValuationStrategy,
    cycles: Option<usize>,
) -> Result<()> {
    let period = Duration::from_secs(tracker.config().refresh_interval_secs);
    let reporting_currency = tracker.config().reporting_currency.clone();
    info!(?period, %strategy, "Watching quote feed");

    tracker
        .watch(period, cycles, |report| {
            let body = match strategy {
                ValuationStrategy::CostBasis => summary::render(report, &reporting_currency),
                ValuationStrategy::PreviousClose => quick::render(report),
            };
            println!(
                "{}\n",
                ui::style_text(
                    &format!(
                        "Refreshed {} ({} quotes)",
                        report.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        report.quotes
                    ),
                    ui::StyleType::Subtle
                )
            );
            println!("{body}");
            ui::print_separator();
            if strategy == ValuationStrategy::CostBasis {
                if let Err(e) = &report.total {
                    return Err(e.clone().into());
                }
            }
            Ok(())
        })
        .await
}
