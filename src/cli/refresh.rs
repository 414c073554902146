use super::ui;
use crate::core::estimate::UniformMultiplier;
use crate::core::snapshot::format_refresh_time;
use crate::core::{FeedProvider, RefreshReport, Refresher};
use crate::store::CountryStore;
use anyhow::Result;
use std::path::Path;

pub fn display_report(report: &RefreshReport) -> String {
    let mut output = format!(
        "{} {} countries ({} inserted, {} updated)\n",
        ui::style_text("Refreshed", ui::StyleType::TotalLabel),
        ui::style_text(
            &report.total_countries.to_string(),
            ui::StyleType::TotalValue
        ),
        report.inserted,
        report.updated,
    );
    if report.skipped > 0 {
        output.push_str(&ui::style_text(
            &format!("Skipped {} records without a name\n", report.skipped),
            ui::StyleType::Subtle,
        ));
    }
    output.push_str(&format!(
        "Last refresh: {}\n",
        format_refresh_time(Some(report.last_refreshed_at))
    ));
    match &report.snapshot {
        Some(path) => output.push_str(&format!("Summary image: {}", path.display())),
        None => output.push_str(&ui::style_text(
            "Summary image could not be generated",
            ui::StyleType::Error,
        )),
    }
    output
}

pub async fn run(feed: &dyn FeedProvider, store: &dyn CountryStore, cache_dir: &Path) -> Result<()> {
    let pb = ui::new_spinner("Refreshing countries...")?;
    let multiplier = UniformMultiplier;
    let result = Refresher::new(feed, store, &multiplier, cache_dir)
        .refresh()
        .await;
    pb.finish_and_clear();

    println!("{}", display_report(&result?));
    Ok(())
}
