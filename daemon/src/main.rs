mod config;
mod identity;
mod protocol;
mod reporter;
mod server;
mod service;
mod session;
mod trending;

use std::sync::Arc;

use anyhow::Result;
use config::DaemonConfig;
use identity::UserIdentity;
use reporter::AcceptanceReporter;
use server::TypeaheadServer;
use service::{HttpSuggestionService, SuggestionFetcher, SuggestionService};
use session::SessionServices;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trending::TrendingProvider;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DaemonConfig::load()?;
    let user = UserIdentity::load(&config.identity);
    info!(
        socket = %config.server.socket_path.display(),
        debounce_ms = config.suggest.debounce_ms,
        limit = config.suggest.limit,
        cache_capacity = config.suggest.cache_capacity,
        trending_limit = config.trending.limit,
        request_timeout_ms = config.server.request_timeout_ms,
        anonymous = user.is_empty(),
        "loaded typeahead config"
    );

    let http = HttpSuggestionService::new(&config.service, &config.server)?;
    info!(
        suggest_url = http.suggest_url(),
        accept_url = http.accept_url(),
        "suggestion service client ready"
    );
    let service: Arc<dyn SuggestionService> = Arc::new(http);
    let services = SessionServices {
        config: config.suggest.session(),
        fetcher: Arc::new(SuggestionFetcher::new(
            service.clone(),
            config.suggest.cache_capacity,
        )),
        trending: Arc::new(TrendingProvider::new(service.clone(), config.trending.limit)),
        reporter: AcceptanceReporter::new(service),
        user,
    };
    let server = TypeaheadServer::new(config.server.clone(), services);
    server.run().await
}
