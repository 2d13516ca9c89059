//! Multi-source search engine — concurrent fan-out, sequential queries.
//!
//! For one gym: planned queries run one after another with a paced gap;
//! within one query every provider is in flight concurrently and the batch
//! is joined before the next query starts. No partial consumption — a
//! query's candidates are only collected once the whole batch resolved.

use std::sync::Arc;

use futures::future::join_all;

use gymscout_core::traits::{PlaceProvider, QueryPacer};
use gymscout_core::types::SearchCandidate;

use crate::planner;

pub struct MultiSourceSearch {
    providers: Vec<Arc<dyn PlaceProvider>>,
    pacer: Arc<dyn QueryPacer>,
}

impl MultiSourceSearch {
    pub fn new(providers: Vec<Arc<dyn PlaceProvider>>, pacer: Arc<dyn QueryPacer>) -> Self {
        Self { providers, pacer }
    }

    /// Collect every candidate from every provider across every planned
    /// query for one gym.
    pub async fn collect(&self, gym_name: &str) -> Vec<SearchCandidate> {
        let queries = planner::plan(gym_name);
        tracing::debug!("🔍 '{}': {} queries planned", gym_name, queries.len());

        let mut all = Vec::new();
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                self.pacer.pause().await;
            }

            // Fan-out/fan-in barrier: all providers in flight, join before
            // the next query
            let batches = join_all(self.providers.iter().map(|p| p.search(query))).await;
            for batch in batches {
                all.extend(batch);
            }
        }

        tracing::debug!("🔍 '{}': {} candidates collected", gym_name, all.len());
        all
    }
}
