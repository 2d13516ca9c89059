//! Kakao Local keyword search adapter.
//!
//! Highest-confidence structured source (0.90). Coordinates come back as
//! strings ("x" = longitude, "y" = latitude) and are skipped per-document
//! when they fail to parse.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use gymscout_core::config::ProviderConfig;
use gymscout_core::error::{GymScoutError, Result};
use gymscout_core::traits::PlaceProvider;
use gymscout_core::types::SearchCandidate;

use crate::is_fitness_place;

const KAKAO_BASE_URL: &str = "https://dapi.kakao.com";
const KAKAO_CONFIDENCE: f64 = 0.90;

pub struct KakaoPlaces {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    place_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    category_name: String,
    x: String,
    y: String,
}

impl KakaoPlaces {
    /// API key resolution: config value, then KAKAO_REST_API_KEY env var.
    pub fn new(config: &ProviderConfig) -> Self {
        let api_key = if !config.kakao_api_key.is_empty() {
            config.kakao_api_key.clone()
        } else {
            std::env::var("KAKAO_REST_API_KEY").unwrap_or_default()
        };
        let base_url = if config.kakao_base_url.is_empty() {
            KAKAO_BASE_URL.to_string()
        } else {
            config.kakao_base_url.trim_end_matches('/').to_string()
        };
        Self {
            api_key,
            base_url,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = format!(
            "{}/v2/local/search/keyword.json?query={}&size=5",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await
            .map_err(|e| GymScoutError::Provider(format!("kakao request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GymScoutError::Provider(format!(
                "kakao returned {}",
                response.status()
            )));
        }

        let body: KakaoResponse = response
            .json()
            .await
            .map_err(|e| GymScoutError::Provider(format!("kakao parse failed: {e}")))?;

        let candidates = body
            .documents
            .into_iter()
            .filter(|doc| is_fitness_place(&doc.place_name, &doc.category_name))
            .filter_map(|doc| {
                let latitude = doc.y.parse().ok()?;
                let longitude = doc.x.parse().ok()?;
                let address = if doc.road_address_name.is_empty() {
                    doc.address_name
                } else {
                    doc.road_address_name
                };
                Some(SearchCandidate {
                    name: doc.place_name,
                    address,
                    phone: (!doc.phone.is_empty()).then_some(doc.phone),
                    latitude,
                    longitude,
                    source: "kakao".into(),
                    confidence: KAKAO_CONFIDENCE,
                })
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl PlaceProvider for KakaoPlaces {
    fn name(&self) -> &str {
        "kakao"
    }

    fn confidence(&self) -> f64 {
        KAKAO_CONFIDENCE
    }

    async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        if self.api_key.is_empty() {
            tracing::debug!("kakao: no API key configured, skipping");
            return Vec::new();
        }
        match self.request(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("⚠️ kakao search '{query}' failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_and_filter() {
        let json = r#"{
            "documents": [
                {
                    "place_name": "파워짐 강남점",
                    "road_address_name": "서울 강남구 테헤란로 1",
                    "address_name": "서울 강남구 역삼동 1",
                    "phone": "02-123-4567",
                    "category_name": "스포츠,레저 > 헬스장",
                    "x": "127.0276",
                    "y": "37.4979"
                },
                {
                    "place_name": "강남곱창",
                    "road_address_name": "서울 강남구 테헤란로 2",
                    "address_name": "",
                    "phone": "",
                    "category_name": "음식점 > 한식",
                    "x": "127.0",
                    "y": "37.5"
                },
                {
                    "place_name": "짐박스",
                    "road_address_name": "",
                    "address_name": "서울 강남구 역삼동 3",
                    "phone": "",
                    "category_name": "스포츠,레저",
                    "x": "not-a-number",
                    "y": "37.5"
                }
            ]
        }"#;

        let body: KakaoResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<SearchCandidate> = body
            .documents
            .into_iter()
            .filter(|doc| is_fitness_place(&doc.place_name, &doc.category_name))
            .filter_map(|doc| {
                let latitude: f64 = doc.y.parse().ok()?;
                let longitude: f64 = doc.x.parse().ok()?;
                Some(SearchCandidate {
                    name: doc.place_name,
                    address: doc.road_address_name,
                    phone: (!doc.phone.is_empty()).then_some(doc.phone),
                    latitude,
                    longitude,
                    source: "kakao".into(),
                    confidence: KAKAO_CONFIDENCE,
                })
            })
            .collect();

        // restaurant filtered out, bad coordinates skipped
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "파워짐 강남점");
        assert_eq!(candidates[0].phone.as_deref(), Some("02-123-4567"));
        assert!((candidates[0].latitude - 37.4979).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_key_yields_empty() {
        let config = ProviderConfig {
            kakao_api_key: String::new(),
            ..ProviderConfig::default()
        };
        // guard against an ambient key leaking into the test
        let provider = KakaoPlaces {
            api_key: String::new(),
            ..KakaoPlaces::new(&config)
        };
        assert!(provider.search("헬스").await.is_empty());
    }
}
