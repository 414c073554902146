//! Country records, the refresh status singleton and the raw feed shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Currency code to exchange rate against the base currency of the rates feed.
pub type Rates = HashMap<String, f64>;

/// Returns the store key for a country name.
///
/// Identity is case-insensitive, so every lookup and write goes through the
/// lowercase form while the record itself keeps its display casing.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

// Feed records sometimes carry `null` where a list or number is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl Country {
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// True when the record carries a usable rate and a positive estimate.
    pub fn has_estimate(&self) -> bool {
        self.exchange_rate.is_some() && self.estimated_gdp > 0.0
    }
}

/// Global summary of the last successful refresh.
///
/// The default value is what callers see before the first refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub total_countries: usize,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCurrency {
    #[serde(default)]
    pub code: Option<String>,
}

/// One record of the countries feed.
///
/// A missing or `null` name decodes as empty and is skipped at reconcile
/// time; `null` currencies decode as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCountry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub population: u64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: Vec<RawCurrency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_country_deserialization() {
        let json = r#"[
            {
                "name": "Nigeria",
                "capital": "Abuja",
                "region": "Africa",
                "population": 206139587,
                "flag": "https://flagcdn.com/ng.svg",
                "currencies": [{"code": "NGN", "name": "Nigerian naira", "symbol": "₦"}],
                "independent": false
            },
            {
                "name": "Antarctica",
                "region": "Polar",
                "population": 1000
            }
        ]"#;

        let countries: Vec<RawCountry> = serde_json::from_str(json).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Nigeria");
        assert_eq!(countries[0].capital.as_deref(), Some("Abuja"));
        assert_eq!(countries[0].currencies[0].code.as_deref(), Some("NGN"));
        assert!(countries[1].capital.is_none());
        assert!(countries[1].currencies.is_empty());
    }

    #[test]
    fn test_raw_country_tolerates_nulls_and_missing_name() {
        let json = r#"[
            {"name": "Ghana", "capital": null, "region": "Africa", "population": 1,
             "flag": null, "currencies": null},
            {"region": "Polar", "population": 5},
            {"name": null, "population": null, "currencies": [{"code": null}]}
        ]"#;

        let countries: Vec<RawCountry> = serde_json::from_str(json).unwrap();
        assert_eq!(countries.len(), 3);
        assert_eq!(countries[0].name, "Ghana");
        assert!(countries[0].currencies.is_empty());
        assert!(countries[0].capital.is_none());
        assert!(countries[1].name.is_empty());
        assert_eq!(countries[1].population, 5);
        assert!(countries[2].name.is_empty());
        assert_eq!(countries[2].population, 0);
        assert!(countries[2].currencies[0].code.is_none());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("France"), "france");
        assert_eq!(normalize_name("FRANCE"), "france");
        assert_ne!(normalize_name(" France"), normalize_name("France"));
        assert_eq!(normalize_name("Côte d'Ivoire"), normalize_name("CÔTE D'IVOIRE"));
    }

    #[test]
    fn test_status_default_is_empty() {
        let status = RefreshStatus::default();
        assert_eq!(status.total_countries, 0);
        assert!(status.last_refreshed_at.is_none());
    }
}
