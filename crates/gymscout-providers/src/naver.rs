//! Naver local search adapter.
//!
//! Structured source (0.85). Titles arrive with `<b>` highlight tags that
//! must be stripped; `mapx`/`mapy` are WGS84 coordinates scaled by 1e7.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use gymscout_core::config::ProviderConfig;
use gymscout_core::error::{GymScoutError, Result};
use gymscout_core::traits::PlaceProvider;
use gymscout_core::types::SearchCandidate;

use crate::is_fitness_place;

const NAVER_BASE_URL: &str = "https://openapi.naver.com";
const NAVER_CONFIDENCE: f64 = 0.85;
const COORD_SCALE: f64 = 1e7;

pub struct NaverPlaces {
    client_id: String,
    client_secret: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NaverResponse {
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    telephone: String,
    #[serde(default, rename = "roadAddress")]
    road_address: String,
    #[serde(default)]
    address: String,
    mapx: String,
    mapy: String,
}

impl NaverPlaces {
    /// Credentials: config values, then NAVER_CLIENT_ID / NAVER_CLIENT_SECRET.
    pub fn new(config: &ProviderConfig) -> Self {
        let client_id = if !config.naver_client_id.is_empty() {
            config.naver_client_id.clone()
        } else {
            std::env::var("NAVER_CLIENT_ID").unwrap_or_default()
        };
        let client_secret = if !config.naver_client_secret.is_empty() {
            config.naver_client_secret.clone()
        } else {
            std::env::var("NAVER_CLIENT_SECRET").unwrap_or_default()
        };
        let base_url = if config.naver_base_url.is_empty() {
            NAVER_BASE_URL.to_string()
        } else {
            config.naver_base_url.trim_end_matches('/').to_string()
        };
        Self {
            client_id,
            client_secret,
            base_url,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = format!(
            "{}/v1/search/local.json?query={}&display=5",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await
            .map_err(|e| GymScoutError::Provider(format!("naver request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GymScoutError::Provider(format!(
                "naver returned {}",
                response.status()
            )));
        }

        let body: NaverResponse = response
            .json()
            .await
            .map_err(|e| GymScoutError::Provider(format!("naver parse failed: {e}")))?;

        let candidates = body
            .items
            .into_iter()
            .filter_map(|item| {
                let name = strip_tags(&item.title);
                if !is_fitness_place(&name, &item.category) {
                    return None;
                }
                let longitude: f64 = item.mapx.parse().ok()?;
                let latitude: f64 = item.mapy.parse().ok()?;
                let address = if item.road_address.is_empty() {
                    item.address
                } else {
                    item.road_address
                };
                Some(SearchCandidate {
                    name,
                    address,
                    phone: (!item.telephone.is_empty()).then_some(item.telephone),
                    latitude: latitude / COORD_SCALE,
                    longitude: longitude / COORD_SCALE,
                    source: "naver".into(),
                    confidence: NAVER_CONFIDENCE,
                })
            })
            .collect();

        Ok(candidates)
    }
}

fn strip_tags(title: &str) -> String {
    title.replace("<b>", "").replace("</b>", "")
}

#[async_trait]
impl PlaceProvider for NaverPlaces {
    fn name(&self) -> &str {
        "naver"
    }

    fn confidence(&self) -> f64 {
        NAVER_CONFIDENCE
    }

    async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            tracing::debug!("naver: no credentials configured, skipping");
            return Vec::new();
        }
        match self.request(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("⚠️ naver search '{query}' failed: {e}");
                Vec::new()
            }
        }
    }
}
