//! HTTP outcall к внешним сервисам (живые данные NNS)

use async_trait::async_trait;
use common::{DashboardError, DashboardResult, NetworkError};
use domain::config::OutcallConfig;
use domain::{HttpHeader, HttpResponsePayload, TransformArgs};
use std::time::Duration;
use tracing::debug;

/// Исполнитель HTTP GET запросов
#[async_trait]
pub trait HttpOutcall: Send + Sync {
    async fn get(&self, url: &str) -> DashboardResult<HttpResponsePayload>;
}

/// Transform-колбэк: отбрасывает заголовки, оставляя статус и тело
pub fn transform(args: TransformArgs) -> HttpResponsePayload {
    args.response.sanitized()
}

/// Outcall через reqwest с таймаутом и лимитом размера ответа
pub struct ReqwestOutcall {
    client: reqwest::Client,
    timeout_secs: u64,
    max_response_bytes: usize,
}

impl ReqwestOutcall {
    pub fn new(config: &OutcallConfig) -> DashboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DashboardError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            max_response_bytes: config.max_response_bytes,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> DashboardError {
        let network = if err.is_timeout() {
            NetworkError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            NetworkError::ConnectionRefused(err.to_string())
        } else {
            NetworkError::Request(err.to_string())
        };
        DashboardError::Network(network)
    }
}

#[async_trait]
impl HttpOutcall for ReqwestOutcall {
    async fn get(&self, url: &str) -> DashboardResult<HttpResponsePayload> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl(url.to_string()).into());
        }

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| HttpHeader {
                name: name.to_string(),
                value: value.to_str().unwrap_or_default().to_string(),
            })
            .collect();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(NetworkError::ResponseTooLarge {
                    limit: self.max_response_bytes,
                }
                .into());
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, status, bytes = body.len(), "Outcall completed");
        Ok(HttpResponsePayload {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_keeps_status_and_body() {
        let args = TransformArgs {
            response: HttpResponsePayload {
                status: 503,
                headers: vec![HttpHeader {
                    name: "date".to_string(),
                    value: "now".to_string(),
                }],
                body: b"busy".to_vec(),
            },
            context: Vec::new(),
        };

        let out = transform(args);
        assert_eq!(out.status, 503);
        assert!(out.headers.is_empty());
        assert_eq!(out.body, b"busy");
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let outcall = ReqwestOutcall::new(&OutcallConfig::default()).unwrap();
        let err = outcall.get("ftp://example.org/file").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Network(NetworkError::InvalidUrl(_))
        ));
    }
}
