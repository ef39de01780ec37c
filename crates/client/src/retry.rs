use common::{DashboardResult, IsRetriable};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Верхняя граница задержки между попытками
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Повтор запросов с exponential backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Число повторов после первой попытки
    pub retries: u32,
    /// Задержка перед первым повтором, дальше удваивается
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Задержка перед повтором номер `retry` (с 1)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }

    /// Выполнить операцию; неповторяемые ошибки возвращаются сразу
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> DashboardResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DashboardResult<T>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(result) => {
                    if retry > 0 {
                        debug!("{} succeeded after {} retries", operation_name, retry);
                    }
                    return Ok(result);
                }
                Err(err) if retry < self.retries && err.is_retriable() => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    warn!(
                        "{} failed (retry {}/{} in {:?}): {}",
                        operation_name, retry, self.retries, delay, err
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
