//! Кэш запросов: ключи, свежесть, LRU вытеснение и выборка с повторами

use crate::mutation::Mutation;
use crate::retry::RetryPolicy;
use common::DashboardResult;
use domain::config::ClientConfig;
use domain::EntityId;
use lru::LruCache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Ключ кэшируемого запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    CurrentUserProfile,
    CallerRole,
    NnsState,
    NnsMaturity,
    FullNnsData,
    Bills,
    BillSummary,
    BillPayments(EntityId),
    HorseBets,
    BetStats,
    Tasks,
    Habits,
    Plans,
}

impl QueryKey {
    pub fn name(&self) -> &'static str {
        match self {
            QueryKey::CurrentUserProfile => "currentUserProfile",
            QueryKey::CallerRole => "callerRole",
            QueryKey::NnsState => "nnsState",
            QueryKey::NnsMaturity => "nnsMaturity",
            QueryKey::FullNnsData => "fullNNSData",
            QueryKey::Bills => "bills",
            QueryKey::BillSummary => "billSummary",
            QueryKey::BillPayments(_) => "billPayments",
            QueryKey::HorseBets => "horseBets",
            QueryKey::BetStats => "betStats",
            QueryKey::Tasks => "tasks",
            QueryKey::Habits => "habits",
            QueryKey::Plans => "plans",
        }
    }

    /// Профиль не повторяется: его отсутствие означает первый вход
    pub fn retries(&self, configured: u32) -> u32 {
        match self {
            QueryKey::CurrentUserProfile => 0,
            _ => configured,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::BillPayments(id) => write!(f, "billPayments/{id}"),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    invalidated: bool,
}

/// Статистика кэша
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

/// Записи и поколения ключей под одной блокировкой: проверка поколения
/// и вставка не должны разделяться инвалидацией.
struct CacheState {
    entries: LruCache<QueryKey, CacheEntry>,
    // Растёт при каждой инвалидации или удалении ключа
    generations: HashMap<QueryKey, u64>,
    // Растёт при полной очистке
    epoch: u64,
}

impl CacheState {
    fn generation(&self, key: &QueryKey) -> u64 {
        self.epoch + self.generations.get(key).copied().unwrap_or(0)
    }

    fn bump(&mut self, key: QueryKey) {
        *self.generations.entry(key).or_insert(0) += 1;
    }
}

pub struct QueryCache {
    state: Mutex<CacheState>,
    stale_time: Duration,
    stats: Mutex<CacheStats>,
}

impl QueryCache {
    pub fn new(capacity: usize, stale_time: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                generations: HashMap::new(),
                epoch: 0,
            }),
            stale_time,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Значение, если оно не устарело и не инвалидировано
    pub fn get_fresh(&self, key: &QueryKey) -> Option<Value> {
        let mut state = self.state.lock();
        let fresh = state
            .entries
            .get(key)
            .filter(|entry| !entry.invalidated && entry.fetched_at.elapsed() < self.stale_time)
            .map(|entry| entry.value.clone());

        let mut stats = self.stats.lock();
        if fresh.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        fresh
    }

    /// Последнее известное значение, даже устаревшее
    pub fn peek(&self, key: &QueryKey) -> Option<Value> {
        self.state.lock().entries.peek(key).map(|entry| entry.value.clone())
    }

    /// Поколение ключа; снимается перед выборкой и передаётся в `insert_fetched`
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.state.lock().generation(key)
    }

    /// Сохранить результат выборки, начатой при поколении `seen`.
    /// Если ключ за это время инвалидировали, значение сохраняется уже
    /// устаревшим. Возвращает true, если запись свежая.
    pub fn insert_fetched(&self, key: QueryKey, value: Value, seen: u64) -> bool {
        let mut state = self.state.lock();
        let fresh = state.generation(&key) == seen;
        state.entries.put(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                invalidated: !fresh,
            },
        );
        if !fresh {
            debug!("Query {} was invalidated while fetching", key);
        }
        fresh
    }

    /// Пометить запись устаревшей; следующая выборка пойдёт на сервер.
    /// Выборки, начатые до этого вызова, свежую запись уже не создадут.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let mut state = self.state.lock();
        state.bump(*key);
        match state.entries.peek_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                self.stats.lock().invalidations += 1;
                debug!("Invalidated query {}", key);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &QueryKey) -> Option<Value> {
        let mut state = self.state.lock();
        state.bump(*key);
        state.entries.pop(key).map(|entry| entry.value)
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.entries.clear();
        debug!("Query cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

/// Клиент запросов поверх `QueryCache`
pub struct QueryClient {
    cache: Arc<QueryCache>,
    default_retries: u32,
    base_delay: Duration,
}

impl QueryClient {
    pub fn new(cache: Arc<QueryCache>, default_retries: u32, base_delay: Duration) -> Self {
        Self {
            cache,
            default_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let cache = QueryCache::new(
            config.cache_capacity,
            Duration::from_secs(config.stale_time_secs),
        );
        Self::new(
            Arc::new(cache),
            config.query_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn retries_for(&self, key: &QueryKey) -> u32 {
        key.retries(self.default_retries)
    }

    /// Свежая запись из кэша либо выборка с повторами и запись в кэш
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        retries: u32,
        fetcher: F,
    ) -> DashboardResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = DashboardResult<T>>,
    {
        if let Some(cached) = self.cache.get_fresh(&key) {
            match serde_json::from_value(cached) {
                Ok(value) => return Ok(value),
                Err(e) => warn!("Dropping undecodable cache entry {}: {}", key, e),
            }
        }

        let seen = self.cache.generation(&key);
        let policy = RetryPolicy::new(retries, self.base_delay);
        let value = policy.run(key.name(), fetcher).await?;
        self.cache.insert_fetched(key, serde_json::to_value(&value)?, seen);
        Ok(value)
    }

    /// `fetch_query` с числом повторов по умолчанию для ключа
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> DashboardResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = DashboardResult<T>>,
    {
        self.fetch_query(key, self.retries_for(&key), fetcher).await
    }

    pub fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            self.cache.invalidate(key);
        }
    }

    /// Инвалидировать всё, что затрагивает мутация
    pub fn invalidate_for(&self, mutation: &Mutation) {
        self.invalidate(&mutation.invalidates());
    }
}
