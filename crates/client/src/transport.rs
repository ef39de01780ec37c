//! Доставка RPC вызовов до backend'а

use async_trait::async_trait;
use common::{DashboardError, DashboardResult, NetworkError};
use domain::config::ClientConfig;
use domain::{Call, Principal, Reply};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Канал одного RPC вызова от имени principal'а
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, caller: &Principal, call: Call) -> DashboardResult<Value>;
}

/// HTTP транспорт: `POST {endpoint}/rpc` с bearer principal'ом
pub struct HttpTransport {
    client: reqwest::Client,
    rpc_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> DashboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DashboardError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            rpc_url: format!("{}/rpc", config.endpoint.trim_end_matches('/')),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
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
impl Transport for HttpTransport {
    async fn call(&self, caller: &Principal, call: Call) -> DashboardResult<Value> {
        let method = call.method();
        let mut request = self.client.post(&self.rpc_url).json(&call);
        if !caller.is_anonymous() {
            request = request.bearer_auth(caller.as_str());
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        debug!(method, status = status.as_u16(), "RPC response");

        // Тело ошибки тоже `Reply`; непарсящийся ответ считаем HTTP ошибкой
        let reply: Reply = response.json().await.map_err(|e| NetworkError::Http {
            code: status.as_u16(),
            message: e.to_string(),
        })?;
        reply.into_result().map_err(DashboardError::from_wire)
    }
}
