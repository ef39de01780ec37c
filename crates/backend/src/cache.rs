use domain::Principal;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// LRU кэш агрегатов по владельцу.
///
/// Каждая инвалидация увеличивает поколение. Значение, посчитанное по данным,
/// прочитанным до инвалидации, в кэш не попадает: `put_if_current` сверяет
/// поколение, снятое перед чтением из хранилища.
pub(crate) struct OwnerCache<V> {
    inner: Mutex<OwnerCacheState<V>>,
}

struct OwnerCacheState<V> {
    entries: LruCache<Principal, V>,
    generation: u64,
}

impl<V: Clone> OwnerCache<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(OwnerCacheState {
                entries: LruCache::new(capacity),
                generation: 0,
            }),
        }
    }

    /// Закэшированное значение либо поколение, которое надо передать в `put_if_current`
    pub(crate) fn lookup(&self, owner: &Principal) -> Result<V, u64> {
        let mut state = self.inner.lock();
        match state.entries.get(owner) {
            Some(value) => Ok(value.clone()),
            None => Err(state.generation),
        }
    }

    /// Сохранить значение, если с момента `lookup` не было инвалидаций
    pub(crate) fn put_if_current(&self, owner: &Principal, value: V, seen: u64) -> bool {
        let mut state = self.inner.lock();
        if state.generation != seen {
            return false;
        }
        state.entries.put(owner.clone(), value);
        true
    }

    pub(crate) fn invalidate(&self, owner: &Principal) {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.entries.pop(owner);
    }
}
