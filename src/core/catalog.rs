//! Read and delete operations over the stored countries.
use crate::core::country::{Country, RefreshStatus, normalize_name};
use crate::core::error::Error;
use crate::store::CountryStore;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Name,
    GdpDesc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortOrder::Name => "name",
                SortOrder::GdpDesc => "gdp_desc",
            }
        )
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "gdp_desc" => Ok(SortOrder::GdpDesc),
            _ => Err(anyhow::anyhow!("Invalid sort order: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Case-insensitive region match.
    pub region: Option<String>,
    pub sort: SortOrder,
}

fn sort_countries(countries: &mut [Country], sort: SortOrder) {
    match sort {
        SortOrder::Name => countries.sort_by_key(Country::key),
        SortOrder::GdpDesc => countries.sort_by(|a, b| {
            b.estimated_gdp
                .total_cmp(&a.estimated_gdp)
                .then_with(|| a.key().cmp(&b.key()))
        }),
    }
}

pub fn list_countries(store: &dyn CountryStore, query: &ListQuery) -> Result<Vec<Country>, Error> {
    let region = query.region.as_deref().map(str::to_lowercase);
    let mut countries: Vec<Country> = store
        .all()?
        .into_iter()
        .filter(|c| match &region {
            Some(region) => c
                .region
                .as_deref()
                .is_some_and(|r| r.to_lowercase() == *region),
            None => true,
        })
        .collect();
    sort_countries(&mut countries, query.sort);
    debug!(count = countries.len(), ?query, "Listed countries");
    Ok(countries)
}

/// Countries with the highest estimated GDP, at most `n` of them.
pub fn top_by_gdp(store: &dyn CountryStore, n: usize) -> Result<Vec<Country>, Error> {
    let mut countries = store.all()?;
    sort_countries(&mut countries, SortOrder::GdpDesc);
    countries.truncate(n);
    Ok(countries)
}

pub fn get_country(store: &dyn CountryStore, name: &str) -> Result<Country, Error> {
    store
        .get(&normalize_name(name))?
        .ok_or_else(|| Error::NotFound(format!("Country '{name}'")))
}

pub fn delete_country(store: &dyn CountryStore, name: &str) -> Result<(), Error> {
    if !store.remove(&normalize_name(name))? {
        return Err(Error::NotFound(format!("Country '{name}'")));
    }
    info!("Deleted country {}", name);
    Ok(())
}

/// Current refresh status; the empty default before the first refresh.
pub fn get_status(store: &dyn CountryStore) -> Result<RefreshStatus, Error> {
    Ok(store.status()?.unwrap_or_default())
}
