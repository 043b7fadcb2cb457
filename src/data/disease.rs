//! disease.sh API integration for historical per-country timelines.

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::data::TimelineSource;
use crate::domain::{Metric, RawMetricSeries, RawTimeline};
use crate::error::DashboardError;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

/// JSON key of the optional vaccination series inside `timeline`.
const VACCINATED_KEY: &str = "vaccinated";

pub struct DiseaseClient {
    client: Client,
    base_url: Url,
}

impl DiseaseClient {
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::fetch(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// `{base}/historical/{country}?lastdays=all`, with the country escaped as a path segment.
    pub fn historical_url(&self, country: &str) -> Result<Url, DashboardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::fetch(format!("Base URL '{}' cannot carry a path.", self.base_url)))?
            .pop_if_empty()
            .push("historical")
            .push(country);
        url.query_pairs_mut().append_pair("lastdays", "all");
        Ok(url)
    }
}

impl TimelineSource for DiseaseClient {
    fn fetch_timeline(&self, country: &str) -> Result<RawTimeline, DashboardError> {
        let country = country.trim();
        if country.is_empty() {
            return Err(DashboardError::fetch("Country name is empty."));
        }

        let url = self.historical_url(country)?;
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| DashboardError::fetch(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            // disease.sh explains 404s in a `message` field; keep it when present.
            let detail = resp
                .json::<ErrorBody>()
                .ok()
                .map(|b| format!(": {}", b.message))
                .unwrap_or_default();
            return Err(DashboardError::fetch(format!(
                "Provider returned status {status} for '{country}'{detail}"
            )));
        }

        let text = resp
            .text()
            .map_err(|e| DashboardError::fetch(format!("Failed to read response body: {e}")))?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| DashboardError::alignment(format!("Response is not valid JSON: {e}")))?;

        let timeline = parse_timeline(&body)?;
        log::info!(
            "Fetched '{country}': {} case dates, vaccinations {}",
            timeline.cases.len(),
            match &timeline.vaccinations {
                Some(series) => format!("{} dates", series.len()),
                None => "absent".to_string(),
            }
        );
        Ok(timeline)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Decode a `historical` response body into typed series.
///
/// Missing `timeline`, a missing mandatory metric, or any value that is not a
/// non-negative integer is an alignment failure. `vaccinated` may be absent or
/// `null`.
pub fn parse_timeline(body: &Value) -> Result<RawTimeline, DashboardError> {
    let timeline = body
        .get("timeline")
        .and_then(Value::as_object)
        .ok_or_else(|| DashboardError::alignment("Response has no `timeline` object."))?;

    let required = |metric: Metric| -> Result<RawMetricSeries, DashboardError> {
        let value = timeline.get(metric.key()).ok_or_else(|| {
            DashboardError::alignment(format!("Timeline is missing the `{}` series.", metric.key()))
        })?;
        parse_series(metric.key(), value)
    };

    let cases = required(Metric::Cases)?;
    let deaths = required(Metric::Deaths)?;
    let recovered = required(Metric::Recovered)?;

    let vaccinations = match timeline.get(VACCINATED_KEY) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_series(VACCINATED_KEY, value)?),
    };

    Ok(RawTimeline {
        cases,
        deaths,
        recovered,
        vaccinations,
    })
}

fn parse_series(key: &str, value: &Value) -> Result<RawMetricSeries, DashboardError> {
    let map = value
        .as_object()
        .ok_or_else(|| DashboardError::alignment(format!("Series `{key}` is not a date -> count object.")))?;

    let mut out = RawMetricSeries::new();
    for (date, count) in map {
        let count = count.as_u64().ok_or_else(|| {
            DashboardError::alignment(format!(
                "Series `{key}` has a non-integer count {count} for '{date}'."
            ))
        })?;
        out.insert(date.as_str(), count);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_timeline_without_vaccinations() {
        let body = json!({
            "country": "India",
            "timeline": {
                "cases": {"1/1/21": 5, "1/2/21": 8},
                "deaths": {"1/1/21": 1, "1/2/21": 1},
                "recovered": {"1/1/21": 2, "1/2/21": 3}
            }
        });

        let timeline = parse_timeline(&body).unwrap();
        assert_eq!(timeline.cases.len(), 2);
        assert_eq!(timeline.recovered.iter().find(|(d, _)| *d == "1/2/21"), Some(("1/2/21", 3)));
        assert!(timeline.vaccinations.is_none());
    }

    #[test]
    fn null_vaccinated_is_treated_as_absent() {
        let body = json!({
            "timeline": {
                "cases": {}, "deaths": {}, "recovered": {}, "vaccinated": null
            }
        });
        assert!(parse_timeline(&body).unwrap().vaccinations.is_none());

        let body = json!({
            "timeline": {
                "cases": {}, "deaths": {}, "recovered": {}, "vaccinated": {"1/1/21": 10}
            }
        });
        assert_eq!(parse_timeline(&body).unwrap().vaccinations.unwrap().len(), 1);
    }

    #[test]
    fn series_keep_provider_key_order() {
        // Raw text: a `json!` literal would not carry the body's key order.
        let body: Value = serde_json::from_str(
            r#"{"timeline":{"cases":{"2021-01-01":7,"1/1/21":5},"deaths":{"1/1/21":1},"recovered":{"1/1/21":2}}}"#,
        )
        .unwrap();

        let timeline = parse_timeline(&body).unwrap();
        let keys: Vec<&str> = timeline.cases.iter().map(|(d, _)| d).collect();
        assert_eq!(keys, ["2021-01-01", "1/1/21"]);

        // Both keys name the same day; the one sent last wins.
        let table = crate::series::align(&timeline).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].cases, 5);
    }

    #[test]
    fn malformed_payloads_are_alignment_failures() {
        let cases = [
            json!({"message": "Country not found"}),
            json!({"timeline": {"cases": {}, "deaths": {}}}),
            json!({"timeline": {"cases": [], "deaths": {}, "recovered": {}}}),
            json!({"timeline": {"cases": {"1/1/21": -3}, "deaths": {}, "recovered": {}}}),
            json!({"timeline": {"cases": {"1/1/21": 1.5}, "deaths": {}, "recovered": {}}}),
            json!({"timeline": {"cases": {}, "deaths": {}, "recovered": {}, "vaccinated": {"1/1/21": "x"}}}),
        ];
        for body in cases {
            let err = parse_timeline(&body).unwrap_err();
            assert!(matches!(err, DashboardError::Alignment { .. }), "{body}: {err}");
        }
    }

    #[test]
    fn historical_url_escapes_country_and_requests_full_history() {
        let client = DiseaseClient::new("https://disease.sh/v3/covid-19/").unwrap();
        let url = client.historical_url("south korea").unwrap();
        assert_eq!(
            url.as_str(),
            "https://disease.sh/v3/covid-19/historical/south%20korea?lastdays=all"
        );
    }

    #[test]
    fn empty_country_fails_without_a_request() {
        let client = DiseaseClient::new(DEFAULT_BASE_URL).unwrap();
        let err = client.fetch_timeline("   ").unwrap_err();
        assert!(matches!(err, DashboardError::Fetch { .. }));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(DiseaseClient::new("not a url").is_err());
    }
}
