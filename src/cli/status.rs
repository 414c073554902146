use super::ui;
use crate::core::RefreshStatus;
use crate::core::catalog;
use crate::core::snapshot::{self, format_refresh_time};
use crate::store::CountryStore;
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

pub fn display_status(status: &RefreshStatus) -> String {
    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::header_cell("Total countries"),
        ui::number_cell(status.total_countries.to_string()),
    ]);
    table.add_row(vec![
        ui::header_cell("Last refreshed"),
        Cell::new(format_refresh_time(status.last_refreshed_at)),
    ]);
    table.to_string()
}

pub fn status(store: &dyn CountryStore) -> Result<()> {
    let status = catalog::get_status(store)?;
    println!("{}", display_status(&status));
    if status.last_refreshed_at.is_none() {
        println!(
            "{}",
            ui::style_text(
                "No refresh has run yet. Try `countrystat refresh`.",
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

pub fn image(cache_dir: &Path) -> Result<()> {
    let path = snapshot::snapshot_path(cache_dir)?;
    println!("{}", path.display());
    Ok(())
}
