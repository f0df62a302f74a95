use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use typeahead_core::protocol::AcceptRequest;
use typeahead_core::{parse_response, SuggestQuery, SuggestResult};

use crate::config::{ServerConfig, ServiceConfig};
use crate::identity::UserIdentity;
use crate::service::SuggestionService;

pub struct HttpSuggestionService {
    suggest_url: String,
    query_param: String,
    accept_url: String,
    client: Client,
}

impl HttpSuggestionService {
    pub fn new(service: &ServiceConfig, server: &ServerConfig) -> Result<Self> {
        if service.base_url.trim().is_empty() {
            return Err(anyhow!("service.base_url is empty"));
        }
        let base_url = service.base_url.trim_end_matches('/');

        Ok(Self {
            suggest_url: format!("{base_url}{}", service.suggest_path),
            query_param: service.query_param.clone(),
            accept_url: format!("{base_url}{}", service.accept_path),
            client: Client::builder()
                .timeout(Duration::from_millis(server.request_timeout_ms.max(1)))
                .build()
                .context("failed to build HTTP client")?,
        })
    }

    pub fn suggest_url(&self) -> &str {
        &self.suggest_url
    }

    pub fn accept_url(&self) -> &str {
        &self.accept_url
    }

    fn query_params(&self, query: &SuggestQuery, user: &UserIdentity) -> Vec<(&str, String)> {
        let mut params = vec![
            (self.query_param.as_str(), query.prefix.clone()),
            ("context", query.context.clone()),
            ("limit", query.limit.to_string()),
        ];
        if !user.is_empty() {
            params.push(("userId", user.to_string()));
        }
        params
    }
}

#[async_trait]
impl SuggestionService for HttpSuggestionService {
    async fn suggest(&self, query: &SuggestQuery, user: &UserIdentity) -> Result<SuggestResult> {
        let response = self
            .client
            .get(&self.suggest_url)
            .query(&self.query_params(query, user))
            .send()
            .await
            .context("failed to call suggestion service")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read suggestion response body")?;

        if !status.is_success() {
            return Err(anyhow!("suggestion service failed ({status}): {body}"));
        }

        parse_response(&body).context("invalid suggestion response format")
    }

    async fn accept(&self, user: &UserIdentity, selected: &str) -> Result<()> {
        let payload = AcceptRequest {
            user_id: user.to_string(),
            selected: selected.to_string(),
        };

        let response = self
            .client
            .post(&self.accept_url)
            .json(&payload)
            .send()
            .await
            .context("failed to call accept endpoint")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("accept endpoint failed ({status})"));
        }
        Ok(())
    }
}
