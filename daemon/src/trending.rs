use std::sync::Arc;

use tracing::warn;
use typeahead_core::trending::{fallback, or_fallback};
use typeahead_core::SuggestQuery;

use crate::identity::UserIdentity;
use crate::service::SuggestionService;

/// Default suggestions for an empty input. Never returns an empty list.
pub struct TrendingProvider {
    service: Arc<dyn SuggestionService>,
    limit: usize,
}

impl TrendingProvider {
    pub fn new(service: Arc<dyn SuggestionService>, limit: usize) -> Self {
        Self {
            service,
            limit: limit.max(1),
        }
    }

    pub async fn fetch(&self, user: &UserIdentity) -> Vec<String> {
        match self
            .service
            .suggest(&SuggestQuery::trending(self.limit), user)
            .await
        {
            Ok(result) => or_fallback(result.texts()),
            Err(error) => {
                warn!("trending request failed, using fallback: {error:#}");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::MockService;
    use typeahead_core::trending::FALLBACK_TRENDING;

    #[tokio::test]
    async fn requests_empty_prefix_and_context() {
        let service = Arc::new(MockService::with("", &["weather", "news"]));
        let provider = TrendingProvider::new(service.clone(), 10);

        let items = provider.fetch(&UserIdentity::new("u1")).await;
        assert_eq!(items, vec!["weather", "news"]);
        assert_eq!(service.queries(), vec![SuggestQuery::trending(10)]);
    }

    #[tokio::test]
    async fn failure_uses_fallback() {
        let service = Arc::new(MockService {
            fail_suggest: true,
            ..MockService::default()
        });
        let provider = TrendingProvider::new(service, 10);
        let items = provider.fetch(&UserIdentity::default()).await;
        assert_eq!(items, FALLBACK_TRENDING.to_vec());
    }

    #[tokio::test]
    async fn empty_result_uses_fallback() {
        let provider = TrendingProvider::new(Arc::new(MockService::default()), 10);
        let items = provider.fetch(&UserIdentity::default()).await;
        assert_eq!(items.len(), FALLBACK_TRENDING.len());
    }
}
