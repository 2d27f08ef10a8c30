//! Query-keyed client cache.
//!
//! Every query is addressed by a [`CacheKey`]. For each key at most one
//! fetch is in flight at any time and concurrent readers share its
//! result. Reads are served stale-while-revalidate: the last successful
//! value stays visible while a refetch runs and after a refetch failed.
//!
//! Mutations invalidate the keys that depend on them. An invalidated key
//! is refetched by the next read. Fetches that were started before the
//! invalidation can no longer mark the key as fresh, so reads converge on
//! the most recent completed write.
//!
//! Fetches run as spawned tasks, i.e. the cache must be used within a
//! tokio runtime. Losing interest in a result does not cancel the fetch.

use std::{any::Any, collections::HashMap, fmt, future::Future, sync::Arc};

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use parking_lot::Mutex;

use crate::store::{Collection, Error, Result};

type CachedValue = Arc<dyn Any + Send + Sync>;

type Fetch = Shared<BoxFuture<'static, Result<CachedValue>>>;

/// Identifies a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    scope: &'static str,
    param: Option<String>,
}

impl CacheKey {
    pub const fn new(scope: &'static str, param: Option<String>) -> Self {
        Self { scope, param }
    }

    /// `("spots")`: all spots
    pub const fn spots() -> Self {
        Self::new(Collection::Spots.as_str(), None)
    }

    /// `("spot", id)`: a single spot
    pub fn spot(id: impl ToString) -> Self {
        Self::new("spot", Some(id.to_string()))
    }

    /// `("reviews", spot_id)`: all reviews of a spot
    pub fn reviews(spot_id: impl ToString) -> Self {
        Self::new(Collection::Reviews.as_str(), Some(spot_id.to_string()))
    }

    /// `("saved")`: all bookmarks
    pub const fn saved() -> Self {
        Self::new(Collection::Saved.as_str(), None)
    }

    pub const fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "({}, {param})", self.scope),
            None => write!(f, "({})", self.scope),
        }
    }
}

/// The observable state of a cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Never fetched.
    Empty,
    /// A fetch is in flight.
    Fetching,
    /// Holds a value that has not been invalidated.
    Fresh,
    /// Holds a value that has been invalidated.
    Stale,
    /// The last fetch failed.
    Errored(Error),
}

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    // Generation of the fetch that produced `value`
    value_generation: u64,
    error: Option<Error>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<Fetch>,
}

impl Entry {
    fn status(&self) -> Status {
        if self.in_flight.is_some() {
            return Status::Fetching;
        }
        if let Some(err) = &self.error {
            return Status::Errored(err.clone());
        }
        match (&self.value, self.invalidated) {
            (None, _) => Status::Empty,
            (Some(_), false) => Status::Fresh,
            (Some(_), true) => Status::Stale,
        }
    }

    fn settle(&mut self, key: &CacheKey, generation: u64, result: &Result<CachedValue>) {
        let current = generation == self.generation;
        if current {
            self.in_flight = None;
        }
        match result {
            Ok(value) => {
                if generation >= self.value_generation {
                    self.value = Some(Arc::clone(value));
                    self.value_generation = generation;
                }
                if current {
                    self.invalidated = false;
                    self.error = None;
                } else {
                    log::debug!("Fetched {key} before it was invalidated");
                }
            }
            Err(err) => {
                log::warn!("Failed to fetch {key}: {err}");
                if current {
                    self.error = Some(err.clone());
                }
            }
        }
    }
}

type Entries = Arc<Mutex<HashMap<CacheKey, Entry>>>;

/// The process-wide query cache.
///
/// Cloning is cheap, all clones share the same entries.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Entries,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("Cache")
            .field("keys", &entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A snapshot of a query together with its pending revalidation.
pub struct Query<T> {
    /// The last successfully fetched value, possibly stale.
    pub data: Option<Arc<T>>,
    /// The error of the last fetch, if it failed.
    pub error: Option<Error>,
    key: CacheKey,
    revalidation: Fetch,
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("has_data", &self.data.is_some())
            .field("error", &self.error)
            .finish()
    }
}

impl<T> Query<T>
where
    T: Send + Sync + 'static,
{
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    /// Waits for the revalidation and returns the fresh value.
    pub async fn settled(self) -> Result<Arc<T>> {
        let value = self.revalidation.await?;
        downcast(&self.key, value)
    }
}

fn downcast<T>(key: &CacheKey, value: CachedValue) -> Result<Arc<T>>
where
    T: Send + Sync + 'static,
{
    value
        .downcast::<T>()
        .map_err(|_| Error::Query(format!("cached value of {key} has an unexpected type")))
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, key: &CacheKey) -> Status {
        self.entries
            .lock()
            .get(key)
            .map(Entry::status)
            .unwrap_or(Status::Empty)
    }

    /// The cached value without triggering a fetch.
    pub fn peek<T>(&self, key: &CacheKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let value = self.entries.lock().get(key)?.value.clone()?;
        downcast(key, value).ok()
    }

    /// Returns the cached value immediately and revalidates it
    /// in the background.
    ///
    /// Joins the fetch that is already in flight for this key
    /// instead of starting a new one.
    pub fn query<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_default();
        let data = entry
            .value
            .clone()
            .and_then(|value| downcast(&key, value).ok());
        let error = entry.error.clone();
        let revalidation = self.start_fetch(&key, entry, fetch);
        Query {
            data,
            error,
            key,
            revalidation,
        }
    }

    /// Returns the cached value unless it has been invalidated,
    /// otherwise waits for a (shared) fetch.
    pub async fn get<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.clone()).or_default();
            if let (Some(value), false) = (&entry.value, entry.invalidated) {
                log::trace!("Serving {key} from cache");
                return downcast(&key, Arc::clone(value));
            }
            self.start_fetch(&key, entry, fetch)
        };
        let value = pending.await?;
        downcast(&key, value)
    }

    // Must be called while holding the lock of the entries.
    fn start_fetch<T, F, Fut>(&self, key: &CacheKey, entry: &mut Entry, fetch: F) -> Fetch
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(in_flight) = &entry.in_flight {
            log::trace!("Joining fetch of {key}");
            return in_flight.clone();
        }
        log::debug!("Fetching {key}");
        let generation = entry.generation;
        let entries = Arc::clone(&self.entries);
        let task_key = key.clone();
        let request = fetch();
        let task = tokio::spawn(async move {
            let result = request.await.map(|value| Arc::new(value) as CachedValue);
            if let Some(entry) = entries.lock().get_mut(&task_key) {
                entry.settle(&task_key, generation, &result);
            }
            result
        });
        let fetch = task
            .map(|joined| {
                joined.unwrap_or_else(|err| Err(Error::Transport(format!("fetch aborted: {err}"))))
            })
            .boxed()
            .shared();
        entry.in_flight = Some(fetch.clone());
        fetch
    }

    /// Marks the key as stale. Returns `false` if nothing
    /// has been cached for this key yet.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        log::debug!("Invalidating {key}");
        entry.invalidated = true;
        entry.generation += 1;
        entry.in_flight = None;
        true
    }

    /// Invalidates all keys of the given scope, e.g. the
    /// reviews of all spots.
    pub fn invalidate_scope(&self, scope: &str) -> usize {
        let keys: Vec<_> = self
            .entries
            .lock()
            .keys()
            .filter(|key| key.scope == scope)
            .cloned()
            .collect();
        keys.iter().filter(|key| self.invalidate(key)).count()
    }

    /// Runs a write and invalidates the dependent keys if
    /// (and only if) it succeeded.
    ///
    /// A key without a parameter acts as a prefix and
    /// invalidates all keys of its scope.
    pub async fn mutate<T, E, Fut>(
        &self,
        write: Fut,
        invalidates: &[CacheKey],
    ) -> std::result::Result<T, E>
    where
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        match write.await {
            Ok(value) => {
                for key in invalidates {
                    if key.param.is_some() {
                        self.invalidate(key);
                    } else {
                        self.invalidate_scope(key.scope);
                    }
                }
                Ok(value)
            }
            Err(err) => {
                log::warn!("Mutation failed: {err}");
                Err(err)
            }
        }
    }

    /// Drops all entries, e.g. on shutdown.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
