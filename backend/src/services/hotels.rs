use crate::constants::{HOTEL_API_BASE_URL, UPSTREAM_TIMEOUT_SECS};
use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tokio::time::Duration;

/// Proxy client for the TripAdvisor hotel API: a location lookup resolves the
/// destination to a geo id, then a second call fetches the hotel list.
#[derive(Debug, Clone)]
pub struct HotelSearchService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HotelSearchService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: HOTEL_API_BASE_URL.to_string(),
        }
    }

    /// Geo id of the best location hit for the query, if the API knows it.
    pub async fn search_location(&self, query: &str) -> Result<Option<i64>> {
        let response = self
            .client
            .get(format!("{}/searchLocation", self.base_url))
            .query(&[("query", query)])
            .header("x-rapidapi-key", &self.api_key)
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(first_geo_id(&body))
    }

    /// Hotel list for a geo id; passed through untyped, the upstream shape
    /// is not ours to re-model.
    pub async fn search_hotels(
        &self,
        geo_id: i64,
        check_in: &str,
        check_out: &str,
    ) -> Result<Vec<Value>> {
        let geo_id = geo_id.to_string();
        let response = self
            .client
            .get(format!("{}/searchHotels", self.base_url))
            .query(&[
                ("geoId", geo_id.as_str()),
                ("checkIn", check_in),
                ("checkOut", check_out),
                ("pageNumber", "1"),
                ("adults", "1"),
                ("currencyCode", "USD"),
            ])
            .header("x-rapidapi-key", &self.api_key)
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(hotel_list(&body))
    }
}

fn first_geo_id(body: &Value) -> Option<i64> {
    let hit = body.get("data")?.as_array()?.first()?;
    let geo_id = hit.get("geoId")?;

    // The API has served this both as a number and a numeric string
    geo_id
        .as_i64()
        .or_else(|| geo_id.as_str().and_then(|s| s.parse().ok()))
}

fn hotel_list(body: &Value) -> Vec<Value> {
    body.get("data")
        .and_then(|data| data.get("data"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_geo_id_from_number() {
        let body = json!({"data": [{"geoId": 60763, "title": "New York"}]});
        assert_eq!(first_geo_id(&body), Some(60763));
    }

    #[test]
    fn test_first_geo_id_from_string() {
        let body = json!({"data": [{"geoId": "60763"}]});
        assert_eq!(first_geo_id(&body), Some(60763));
    }

    #[test]
    fn test_first_geo_id_missing() {
        assert_eq!(first_geo_id(&json!({"data": []})), None);
        assert_eq!(first_geo_id(&json!({})), None);
    }

    #[test]
    fn test_hotel_list_unwraps_nested_data() {
        let body = json!({"data": {"data": [{"title": "Hotel A"}, {"title": "Hotel B"}]}});
        assert_eq!(hotel_list(&body).len(), 2);
        assert!(hotel_list(&json!({})).is_empty());
    }
}
