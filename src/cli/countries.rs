use super::ui;
use crate::core::Country;
use crate::core::catalog::{self, ListQuery};
use crate::core::snapshot::format_amount;
use crate::store::CountryStore;
use anyhow::Result;
use comfy_table::Cell;

fn gdp_cell(country: &Country) -> Cell {
    ui::format_optional_cell(
        country.has_estimate().then_some(country.estimated_gdp),
        format_amount,
    )
}

pub fn display_countries(countries: &[Country]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Capital"),
        ui::header_cell("Region"),
        ui::header_cell("Population"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
        ui::header_cell("Estimated GDP (USD)"),
    ]);

    for country in countries {
        table.add_row(vec![
            Cell::new(&country.name),
            Cell::new(country.capital.as_deref().unwrap_or("")),
            Cell::new(country.region.as_deref().unwrap_or("")),
            ui::number_cell(format_amount(country.population as f64)),
            Cell::new(country.currency_code.as_deref().unwrap_or("N/A")),
            ui::format_optional_cell(country.exchange_rate, |r| format!("{r:.4}")),
            gdp_cell(country),
        ]);
    }

    format!(
        "{}\n{} countries",
        table,
        ui::style_text(&countries.len().to_string(), ui::StyleType::TotalLabel)
    )
}

pub fn display_country(country: &Country) -> String {
    let mut table = ui::new_styled_table();
    let text = |v: Option<&str>| Cell::new(v.unwrap_or("N/A"));
    let rows = vec![
        ("Capital", text(country.capital.as_deref())),
        ("Region", text(country.region.as_deref())),
        (
            "Population",
            ui::number_cell(format_amount(country.population as f64)),
        ),
        ("Currency", text(country.currency_code.as_deref())),
        (
            "Exchange rate",
            ui::format_optional_cell(country.exchange_rate, |r| format!("{r:.4}")),
        ),
        ("Estimated GDP (USD)", gdp_cell(country)),
        ("Flag", text(country.flag_url.as_deref())),
        (
            "Last refreshed",
            Cell::new(country.last_refreshed_at.to_rfc3339()),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![ui::header_cell(label), value]);
    }

    format!(
        "Country: {}\n\n{}",
        ui::style_text(&country.name, ui::StyleType::Title),
        table
    )
}

pub fn list(store: &dyn CountryStore, query: &ListQuery) -> Result<()> {
    let countries = catalog::list_countries(store, query)?;
    println!("{}", display_countries(&countries));
    Ok(())
}

pub fn show(store: &dyn CountryStore, name: &str) -> Result<()> {
    let country = catalog::get_country(store, name)?;
    println!("{}", display_country(&country));
    Ok(())
}

pub fn delete(store: &dyn CountryStore, name: &str) -> Result<()> {
    catalog::delete_country(store, name)?;
    println!("Deleted {}", ui::style_text(name, ui::StyleType::TotalLabel));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::country;

    #[test]
    fn test_display_countries() {
        console::set_colors_enabled(false);
        let countries = vec![
            country("Nigeria", "Africa", 1_234_567.8),
            country("Antarctica", "Polar", 0.0),
        ];

        let output = display_countries(&countries);
        assert!(output.contains("Nigeria"));
        assert!(output.contains("1,234,568"));
        assert!(output.contains("Antarctica"));
        assert!(output.contains("N/A"));
        assert!(output.ends_with("2 countries"));
    }

    #[test]
    fn test_display_country() {
        console::set_colors_enabled(false);
        let output = display_country(&country("Ghana", "Africa", 42.0));

        assert!(output.starts_with("Country: Ghana"));
        assert!(output.contains("Africa"));
        assert!(output.contains("USD"));
        assert!(output.contains("1.0000"));
        assert!(output.contains("2025-10-22T12:00:00+00:00"));
    }
}
