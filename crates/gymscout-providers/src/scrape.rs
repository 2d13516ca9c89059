//! HTML scrape fallback adapter.
//!
//! Low-confidence (0.55) last resort for gyms the structured APIs miss.
//! Scrapes a map-site search result page and pulls place data out of the
//! listing markup with plain string slicing — no HTML parser dependency.

use std::time::Duration;

use async_trait::async_trait;

use gymscout_core::config::ProviderConfig;
use gymscout_core::error::{GymScoutError, Result};
use gymscout_core::traits::PlaceProvider;
use gymscout_core::types::SearchCandidate;

use crate::is_fitness_place;

const SCRAPE_BASE_URL: &str = "https://map.daum.net";
const SCRAPE_CONFIDENCE: f64 = 0.55;
const MAX_RESULTS: usize = 5;

pub struct WebScrape {
    base_url: String,
    client: reqwest::Client,
}

impl WebScrape {
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = if config.scrape_base_url.is_empty() {
            SCRAPE_BASE_URL.to_string()
        } else {
            config.scrape_base_url.trim_end_matches('/').to_string()
        };
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent("GymScout/1.0")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GymScoutError::Provider(format!("scrape request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GymScoutError::Provider(format!(
                "scrape returned {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| GymScoutError::Provider(format!("scrape read failed: {e}")))?;

        Ok(parse_place_items(&html, MAX_RESULTS))
    }
}

/// Pull candidates out of `class="place-item"` listing segments.
fn parse_place_items(html: &str, max: usize) -> Vec<SearchCandidate> {
    let mut results = Vec::new();

    for segment in html.split("class=\"place-item\"").skip(1).take(max) {
        let Some(name) = extract_attr(segment, "data-name") else {
            continue;
        };
        let Some(address) = extract_attr(segment, "data-address") else {
            continue;
        };
        let Some(latitude) = extract_attr(segment, "data-lat").and_then(|v| v.parse().ok()) else {
            continue;
        };
        let Some(longitude) = extract_attr(segment, "data-lng").and_then(|v| v.parse().ok())
        else {
            continue;
        };

        if !is_fitness_place(&name, "") {
            continue;
        }

        results.push(SearchCandidate {
            name,
            address,
            phone: extract_attr(segment, "data-phone").filter(|p| !p.is_empty()),
            latitude,
            longitude,
            source: "scrape".into(),
            confidence: SCRAPE_CONFIDENCE,
        });
    }

    results
}

fn extract_attr(segment: &str, attr: &str) -> Option<String> {
    let needle = format!("{attr}=\"");
    let start = segment.find(&needle)? + needle.len();
    let remaining = &segment[start..];
    let end = remaining.find('"')?;
    Some(remaining[..end].trim().to_string())
}

#[async_trait]
impl PlaceProvider for WebScrape {
    fn name(&self) -> &str {
        "scrape"
    }

    fn confidence(&self) -> f64 {
        SCRAPE_CONFIDENCE
    }

    async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        match self.request(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("⚠️ scrape search '{query}' failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <ul>
          <li class="place-item" data-name="파워짐 강남점"
              data-address="서울 강남구 테헤란로 1"
              data-lat="37.4979" data-lng="127.0276" data-phone="02-123-4567">
          </li>
          <li class="place-item" data-name="강남곱창"
              data-address="서울 강남구 테헤란로 2"
              data-lat="37.5" data-lng="127.0" data-phone="">
          </li>
          <li class="place-item" data-name="짐박스"
              data-address="서울 강남구 역삼동 3"
              data-lat="broken" data-lng="127.1">
          </li>
        </ul>
    "#;

    #[test]
    fn test_parse_place_items() {
        let candidates = parse_place_items(SAMPLE, 5);
        // restaurant filtered, broken coordinates skipped
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "파워짐 강남점");
        assert_eq!(candidates[0].phone.as_deref(), Some("02-123-4567"));
        assert_eq!(candidates[0].confidence, SCRAPE_CONFIDENCE);
    }

    #[test]
    fn test_parse_respects_max() {
        let doubled = format!("{SAMPLE}{SAMPLE}");
        let candidates = parse_place_items(&doubled, 1);
        assert!(candidates.len() <= 1);
    }

    #[test]
    fn test_parse_empty_html() {
        assert!(parse_place_items("<html></html>", 5).is_empty());
    }

    #[test]
    fn test_extract_attr() {
        let segment = r#"data-name="짐A" data-lat="37.5""#;
        assert_eq!(extract_attr(segment, "data-name").as_deref(), Some("짐A"));
        assert_eq!(extract_attr(segment, "data-lat").as_deref(), Some("37.5"));
        assert!(extract_attr(segment, "data-missing").is_none());
    }
}
