//! Estimated GDP for a single country record.
use crate::core::country::{RawCountry, Rates};
use rand::Rng;
use std::ops::Range;

pub const MULTIPLIER_RANGE: Range<f64> = 1000.0..2000.0;

/// Source of the random multiplier applied to population.
pub trait MultiplierSource: Send + Sync {
    /// Returns a value in [`MULTIPLIER_RANGE`].
    fn next_multiplier(&self) -> f64;
}

/// Uniform draw from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformMultiplier;

impl MultiplierSource for UniformMultiplier {
    fn next_multiplier(&self) -> f64 {
        rand::rng().random_range(MULTIPLIER_RANGE)
    }
}

/// Always returns the same multiplier, for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl MultiplierSource for FixedMultiplier {
    fn next_multiplier(&self) -> f64 {
        self.0
    }
}

/// Currency fields derived for one country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimate {
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
}

/// Derives currency code, exchange rate and estimated GDP for `raw`.
///
/// Only the first listed currency is considered. Without a currency, or
/// without a positive rate for it, the estimate stays at zero and no rate is
/// recorded. The multiplier is drawn only when a rate matched.
pub fn estimate(raw: &RawCountry, rates: &Rates, multiplier: &dyn MultiplierSource) -> Estimate {
    let Some(code) = raw
        .currencies
        .first()
        .and_then(|c| c.code.as_deref())
        .filter(|c| !c.is_empty())
    else {
        return Estimate::default();
    };

    let rate = rates
        .get(code)
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0);

    let Some(rate) = rate else {
        return Estimate {
            currency_code: Some(code.to_string()),
            ..Estimate::default()
        };
    };

    let m = multiplier.next_multiplier();
    Estimate {
        currency_code: Some(code.to_string()),
        exchange_rate: Some(rate),
        estimated_gdp: raw.population as f64 * m / rate,
    }
}
