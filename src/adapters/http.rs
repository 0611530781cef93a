use crate::config::{ClientConfig, TokenType};
use crate::domain::ports::{ApiRequest, Requester};
use crate::utils::error::{KhlError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://www.kookapp.cn/api/v3";

/// Every khl API response is wrapped in this envelope; `code` is 0 on success.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

/// [`Requester`] issuing calls against the khl HTTP API with reqwest.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    client: Client,
    base_url: String,
    authorization: String,
}

impl HttpRequester {
    pub fn new(client: Client, base_url: &str, token_type: TokenType, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("{} {}", token_type, token),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(
            client,
            &config.client.base_url,
            config.client.token_type,
            &config.client.token,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }
}

#[async_trait]
impl Requester for HttpRequester {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.route);
        tracing::debug!("Making API request: {} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(AUTHORIZATION, &self.authorization);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(KhlError::Unauthorized {
                    route: request.route,
                })
            }
            StatusCode::NOT_FOUND => {
                return Err(KhlError::NotFound {
                    route: request.route,
                })
            }
            s if !s.is_success() => {
                return Err(KhlError::Status {
                    status: s.as_u16(),
                    route: request.route,
                })
            }
            _ => {}
        }

        let bytes = response.bytes().await?;
        let envelope: ApiEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.code != 0 {
            tracing::warn!(
                "API call {} rejected with code {}: {}",
                request.route,
                envelope.code,
                envelope.message
            );
            return Err(KhlError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }

        Ok(envelope.data)
    }
}
