use crate::cache::{CacheWrite, LookupKey, ResolutionCache};
use crate::classifier::{IdentifierKind, SegmentClassifier};
use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::lookup::{fetch_label, EntityLookup, HttpLookup};
use crate::trail::render_trail;
use crumbtrail_protocol::{is_root, BreadcrumbItem};
use log::{debug, trace};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Published whenever resolver state moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStatus {
    /// Bumped only when a cached label actually changes.
    pub revision: u64,
    pub in_flight: usize,
}

/// Lookups started by one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub keys: Vec<LookupKey>,
}

impl Dispatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

struct State {
    cache: ResolutionCache,
    observed: Option<Vec<String>>,
    active: bool,
}

struct Shared {
    state: Mutex<State>,
    status_tx: watch::Sender<ResolverStatus>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, write: Option<CacheWrite>, in_flight: usize) {
        self.status_tx.send_if_modified(|status| {
            let mut modified = false;
            if write.is_some_and(CacheWrite::changed_label) {
                status.revision += 1;
                modified = true;
            }
            if status.in_flight != in_flight {
                status.in_flight = in_flight;
                modified = true;
            }
            modified
        });
    }

    fn finish(&self, key: &LookupKey, label: Option<String>) {
        let mut state = self.lock();
        if !state.active {
            // Label is discarded; the marker still clears so waiters see idle.
            state.cache.complete(key, None);
            self.publish(None, state.cache.in_flight_len());
            debug!("Dropping {key} completion: resolver torn down");
            return;
        }
        let write = state.cache.complete(key, label);
        // Published under the lock so counts reach subscribers in order.
        self.publish(Some(write), state.cache.in_flight_len());
        drop(state);

        match write {
            CacheWrite::Unchanged => trace!("Label for {key} unchanged"),
            CacheWrite::Cleared => debug!("Lookup for {key} failed; keeping identifier"),
            CacheWrite::Inserted | CacheWrite::Updated => debug!("Resolved {key}"),
        }
    }
}

/// Resolution cache plus renderer for one mounted breadcrumb trail.
///
/// Lookups run as tasks on the captured tokio runtime; rendering never waits
/// on them. State is only touched under a lock that is never held across an
/// `.await`.
pub struct BreadcrumbResolver {
    shared: Arc<Shared>,
    lookup: Arc<dyn EntityLookup>,
    runtime: Handle,
}

impl BreadcrumbResolver {
    /// Uses the runtime the caller is running on.
    pub fn new(lookup: Arc<dyn EntityLookup>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ResolverError::NoRuntime)?;
        Ok(Self::with_runtime(lookup, runtime))
    }

    pub fn with_runtime(lookup: Arc<dyn EntityLookup>, runtime: Handle) -> Self {
        let (status_tx, _) = watch::channel(ResolverStatus::default());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    cache: ResolutionCache::new(),
                    observed: None,
                    active: true,
                }),
                status_tx,
            }),
            lookup,
            runtime,
        }
    }

    /// Resolver backed by the HTTP API described by `cfg`.
    pub fn from_config(cfg: &ResolverConfig) -> Result<Self> {
        let lookup = HttpLookup::new(cfg)?;
        Self::new(Arc::new(lookup))
    }

    /// Navigation entry point: runs a resolution pass only when `path`
    /// differs from the last observed one and is not the root.
    pub fn navigate(&self, path: &[String]) -> Dispatch {
        {
            let mut state = self.shared.lock();
            if state.observed.as_deref() == Some(path) {
                return Dispatch::default();
            }
            state.observed = Some(path.to_vec());
        }
        if is_root(path) {
            return Dispatch::default();
        }
        self.on_path_change(path)
    }

    /// Starts exactly one lookup for every identifier in `path` that is
    /// neither cached nor already in flight.
    pub fn on_path_change(&self, path: &[String]) -> Dispatch {
        let mut dispatch = Dispatch::default();
        {
            let mut state = self.shared.lock();
            if !state.active {
                return dispatch;
            }
            for (kind, id) in SegmentClassifier::identifiers(path) {
                let key = LookupKey::new(kind, id);
                if state.cache.try_begin(&key) {
                    dispatch.keys.push(key);
                }
            }
            self.shared.publish(None, state.cache.in_flight_len());
        }

        for key in &dispatch.keys {
            debug!("Dispatching lookup for {key}");
            self.spawn_lookup(key.clone());
        }
        dispatch
    }

    fn spawn_lookup(&self, key: LookupKey) {
        let shared = Arc::clone(&self.shared);
        let lookup = Arc::clone(&self.lookup);
        self.runtime.spawn(async move {
            let label = match fetch_label(lookup.as_ref(), &key).await {
                Ok(label) => Some(label),
                Err(err) => {
                    debug!("Lookup for {key} failed: {err}");
                    None
                }
            };
            shared.finish(&key, label);
        });
    }

    /// Current trail for `path`; empty for the root.
    #[must_use]
    pub fn render(&self, path: &[String]) -> Vec<BreadcrumbItem> {
        render_trail(path, &self.shared.lock().cache)
    }

    #[must_use]
    pub fn label(&self, kind: IdentifierKind, id: &str) -> Option<String> {
        self.shared.lock().cache.label(kind, id).map(str::to_string)
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &LookupKey) -> bool {
        self.shared.lock().cache.is_in_flight(key)
    }

    #[must_use]
    pub fn status(&self) -> ResolverStatus {
        *self.shared.status_tx.borrow()
    }

    /// Receiver that wakes on label changes and in-flight count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResolverStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Waits until no lookup is outstanding.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|status| status.in_flight == 0).await;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.lock().active
    }

    /// Stops all further state writes. Lookups already running finish on
    /// their own and are discarded.
    pub fn teardown(&self) {
        self.shared.lock().active = false;
    }
}

impl Drop for BreadcrumbResolver {
    fn drop(&mut self) {
        self.teardown();
    }
}
