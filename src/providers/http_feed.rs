use crate::core::config::ProvidersConfig;
use crate::core::country::{RawCountry, Rates};
use crate::core::error::FetchError;
use crate::core::feed::{FeedData, FeedProvider};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Rates,
}

/// Fetches both feeds over HTTP, concurrently, with a per-request timeout.
pub struct HttpFeedProvider {
    client: reqwest::Client,
    countries_url: String,
    rates_url: String,
}

impl HttpFeedProvider {
    pub fn new(
        countries_url: &str,
        rates_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("countrystat/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            countries_url: countries_url.to_string(),
            rates_url: rates_url.to_string(),
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.countries.url,
            &config.rates.url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        feed: &'static str,
        url: &str,
    ) -> Result<T, FetchError> {
        debug!("Requesting {} feed from {}", feed, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request { feed, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { feed, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Request { feed, source })
    }
}

#[async_trait]
impl FeedProvider for HttpFeedProvider {
    #[instrument(name = "FeedFetch", skip(self))]
    async fn fetch(&self) -> Result<FeedData, FetchError> {
        let (countries, rates) = futures::try_join!(
            self.get_json::<Vec<RawCountry>>("countries", &self.countries_url),
            self.get_json::<RatesResponse>("rates", &self.rates_url),
        )?;
        debug!(
            countries = countries.len(),
            rates = rates.rates.len(),
            "Fetched both feeds"
        );

        Ok(FeedData {
            countries,
            rates: rates.rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COUNTRIES: &str = r#"[
        {"name": "Nigeria", "capital": "Abuja", "region": "Africa", "population": 206139587,
         "flag": "https://flagcdn.com/ng.svg", "currencies": [{"code": "NGN"}]},
        {"name": "Antarctica", "region": "Polar", "population": 1000}
    ]"#;
    const RATES: &str = r#"{"result": "success", "base_code": "USD", "rates": {"USD": 1, "NGN": 1600.23}}"#;

    async fn create_feed_mock_server(
        countries: ResponseTemplate,
        rates: ResponseTemplate,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/countries"))
            .respond_with(countries)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(rates)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(server: &MockServer, timeout: Duration) -> HttpFeedProvider {
        HttpFeedProvider::new(
            &format!("{}/countries", server.uri()),
            &format!("{}/rates", server.uri()),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let server = create_feed_mock_server(
            ResponseTemplate::new(200).set_body_string(COUNTRIES),
            ResponseTemplate::new(200).set_body_string(RATES),
        )
        .await;

        let data = provider(&server, Duration::from_secs(10))
            .fetch()
            .await
            .unwrap();

        assert_eq!(data.countries.len(), 2);
        assert_eq!(data.countries[0].name, "Nigeria");
        assert_eq!(data.countries[1].currencies.len(), 0);
        assert_eq!(data.rates.get("USD"), Some(&1.0));
        assert_eq!(data.rates.get("NGN"), Some(&1600.23));
    }

    #[tokio::test]
    async fn test_incomplete_records_do_not_fail_fetch() {
        let countries = r#"[
            {"name": "Ghana", "region": "Africa", "population": 31072945, "currencies": null},
            {"region": "Polar", "population": 5}
        ]"#;
        let server = create_feed_mock_server(
            ResponseTemplate::new(200).set_body_string(countries),
            ResponseTemplate::new(200).set_body_string(RATES),
        )
        .await;

        let data = provider(&server, Duration::from_secs(10))
            .fetch()
            .await
            .unwrap();

        assert_eq!(data.countries.len(), 2);
        assert!(data.countries[0].currencies.is_empty());
        assert!(data.countries[1].name.is_empty());
    }

    #[tokio::test]
    async fn test_rates_feed_error_fails_fetch() {
        let server = create_feed_mock_server(
            ResponseTemplate::new(200).set_body_string(COUNTRIES),
            ResponseTemplate::new(503).set_body_string("Service Unavailable"),
        )
        .await;

        let result = provider(&server, Duration::from_secs(10)).fetch().await;

        match result {
            Err(FetchError::Status { feed, status }) => {
                assert_eq!(feed, "rates");
                assert_eq!(status.as_u16(), 503);
            }
            other => panic!("Expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_countries_feed_malformed_fails_fetch() {
        let server = create_feed_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"not": "a list"}"#),
            ResponseTemplate::new(200).set_body_string(RATES),
        )
        .await;

        let result = provider(&server, Duration::from_secs(10)).fetch().await;

        assert!(matches!(
            result,
            Err(FetchError::Request {
                feed: "countries",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_slow_feed_times_out() {
        let server = create_feed_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(COUNTRIES)
                .set_delay(Duration::from_millis(500)),
            ResponseTemplate::new(200).set_body_string(RATES),
        )
        .await;

        let result = provider(&server, Duration::from_millis(100)).fetch().await;

        match result {
            Err(FetchError::Request { feed, source }) => {
                assert_eq!(feed, "countries");
                assert!(source.is_timeout(), "{source:?}");
            }
            other => panic!("Expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_feed_fails_fetch() {
        let provider = HttpFeedProvider::new(
            "http://127.0.0.1:1/countries",
            "http://127.0.0.1:1/rates",
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(provider.fetch().await.is_err());
    }
}
