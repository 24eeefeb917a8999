use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Bounded memo of extraction results keyed by the HTML's SHA-256 digest
///
/// Page 0 is fetched twice per run, so successful results are reused.
/// Failures are never cached. Oldest entries are evicted first.
#[derive(Debug)]
pub struct ParseCache<T> {
    capacity: usize,
    inner: Mutex<CacheInner<T>>,
}

#[derive(Debug)]
struct CacheInner<T> {
    entries: HashMap<String, T>,
    order: VecDeque<String>,
}

impl<T: Clone> ParseCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Returns the cached result for `html`, or computes and stores it
    pub fn get_or_try_insert_with<E>(
        &self,
        html: &str,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let key = digest(html);

        if let Some(hit) = self.lock().entries.get(&key) {
            tracing::trace!("Parse cache hit for {}", &key[..12]);
            return Ok(hit.clone());
        }

        // Computed outside the lock so workers parse in parallel
        let value = compute()?;

        let mut inner = self.lock();
        if !inner.entries.contains_key(&key) {
            if inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
            inner.order.push_back(key.clone());
            inner.entries.insert(key, value.clone());
        }

        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn digest(html: &str) -> String {
    hex::encode(Sha256::digest(html.as_bytes()))
}
