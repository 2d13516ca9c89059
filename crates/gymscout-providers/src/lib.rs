//! # GymScout Providers
//!
//! Place-data provider adapters. Structured search APIs (Kakao, Naver) carry
//! high confidence; the HTML scrape fallback carries low confidence. Every
//! adapter applies the fitness-domain filter itself, carries its own request
//! timeout, and never lets a network/parse error escape — failures are
//! logged and become empty result sets.

pub mod kakao;
pub mod naver;
pub mod scrape;

use std::sync::Arc;

use gymscout_core::config::ProviderConfig;
use gymscout_core::traits::PlaceProvider;
use gymscout_core::types::UpdateStrategy;

pub use kakao::KakaoPlaces;
pub use naver::NaverPlaces;
pub use scrape::WebScrape;

/// Build the provider set for a strategy.
///
/// - `basic`: Kakao only
/// - `enhanced`: Kakao + Naver
/// - `multisource` / `advanced`: Kakao + Naver + scrape fallback
pub fn providers_for(
    strategy: UpdateStrategy,
    config: &ProviderConfig,
) -> Vec<Arc<dyn PlaceProvider>> {
    let kakao: Arc<dyn PlaceProvider> = Arc::new(KakaoPlaces::new(config));
    let naver: Arc<dyn PlaceProvider> = Arc::new(NaverPlaces::new(config));
    let scrape: Arc<dyn PlaceProvider> = Arc::new(WebScrape::new(config));

    match strategy {
        UpdateStrategy::Basic => vec![kakao],
        UpdateStrategy::Enhanced => vec![kakao, naver],
        UpdateStrategy::Multisource | UpdateStrategy::Advanced => vec![kakao, naver, scrape],
    }
}

/// Keywords marking a place as a fitness venue.
const FITNESS_KEYWORDS: [&str; 7] = ["헬스", "피트니스", "짐", "GYM", "체육관", "크로스핏", "PT"];

/// Fitness-domain filter applied by every adapter before returning candidates.
pub(crate) fn is_fitness_place(name: &str, category: &str) -> bool {
    let haystack = format!("{} {}", name, category).to_uppercase();
    FITNESS_KEYWORDS
        .iter()
        .any(|keyword| haystack.contains(&keyword.to_uppercase()))
}
