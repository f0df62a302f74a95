use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::identity::UserIdentity;
use crate::service::SuggestionService;

/// Fire-and-forget acceptance notifications.
#[derive(Clone)]
pub struct AcceptanceReporter {
    service: Arc<dyn SuggestionService>,
}

impl AcceptanceReporter {
    pub fn new(service: Arc<dyn SuggestionService>) -> Self {
        Self { service }
    }

    /// Returns immediately; the outcome is only logged. The handle is for
    /// callers that want to wait in tests.
    pub fn report(&self, user: &UserIdentity, selected: &str) -> JoinHandle<()> {
        let service = self.service.clone();
        let user = user.clone();
        let selected = selected.to_string();
        tokio::spawn(async move {
            match service.accept(&user, &selected).await {
                Ok(()) => debug!(selected = %selected, "reported acceptance"),
                Err(error) => debug!("acceptance report dropped: {error:#}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::MockService;

    #[tokio::test]
    async fn sends_user_and_selection() {
        let service = Arc::new(MockService::default());
        let reporter = AcceptanceReporter::new(service.clone());

        reporter
            .report(&UserIdentity::new("u9"), "new york")
            .await
            .unwrap();
        assert_eq!(
            service.accepted(),
            vec![("u9".to_string(), "new york".to_string())]
        );
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let service = Arc::new(MockService {
            fail_accept: true,
            ..MockService::default()
        });
        let reporter = AcceptanceReporter::new(service.clone());

        let outcome = reporter.report(&UserIdentity::default(), "pizza").await;
        assert!(outcome.is_ok());
        assert_eq!(service.accepted().len(), 1);
    }
}
