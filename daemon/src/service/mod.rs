mod http;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
pub use http::HttpSuggestionService;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use typeahead_core::{SuggestQuery, SuggestResult};

use crate::identity::UserIdentity;

/// The remote suggestion service.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest(&self, query: &SuggestQuery, user: &UserIdentity) -> Result<SuggestResult>;

    async fn accept(&self, user: &UserIdentity, selected: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: SuggestQuery,
    user: String,
}

#[derive(Debug)]
struct SuggestCache {
    capacity: usize,
    map: HashMap<CacheKey, SuggestResult>,
    order: VecDeque<CacheKey>,
}

impl SuggestCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &CacheKey) -> Option<SuggestResult> {
        self.map.get(key).cloned()
    }

    fn insert(&mut self, key: CacheKey, value: SuggestResult) {
        if self.capacity == 0 {
            return;
        }
        if self.map.contains_key(&key) {
            self.map.insert(key, value);
            return;
        }
        if self.map.len() == self.capacity {
            if let Some(front) = self.order.pop_front() {
                self.map.remove(&front);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }
}

/// Fetches suggestions, degrading every failure to an empty result.
pub struct SuggestionFetcher {
    service: Arc<dyn SuggestionService>,
    cache: RwLock<SuggestCache>,
}

impl SuggestionFetcher {
    pub fn new(service: Arc<dyn SuggestionService>, cache_capacity: usize) -> Self {
        Self {
            service,
            cache: RwLock::new(SuggestCache::new(cache_capacity)),
        }
    }

    pub async fn fetch(&self, query: &SuggestQuery, user: &UserIdentity) -> SuggestResult {
        let key = CacheKey {
            query: query.clone(),
            user: user.to_string(),
        };
        if let Some(cached) = self.cache.read().await.get(&key) {
            return cached;
        }

        let started = Instant::now();
        match self.service.suggest(query, user).await {
            Ok(result) => {
                debug!(
                    prefix = %query.prefix,
                    context = %query.context,
                    count = result.suggestions.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "fetched suggestions"
                );
                self.cache.write().await.insert(key, result.clone());
                result
            }
            Err(error) => {
                warn!("suggestion request failed, showing nothing: {error:#}");
                SuggestResult::empty()
            }
        }
    }
}
