//! Starting, de-duplicating and settling the fetches requested by resolvers.

use std::{cell::RefCell, fmt, rc::Rc};

use futures_util::task::{LocalSpawn, LocalSpawnExt};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::{
    error::ResolveError,
    params::AccumulatedParams,
    resolver::{ParamOption, ParamResolver},
};

/// Identifies an in-flight fetch: the parameter name followed by the serialized parameters
/// accumulated when the fetch was requested.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchKey(String);

impl FetchKey {
    /// Derive the key for `param` under `params`.
    ///
    /// ```rust
    /// # use carlot_breadcrumbs::{AccumulatedParams, FetchKey};
    /// let params: AccumulatedParams = [("id", "42")].into_iter().collect();
    /// assert_eq!(FetchKey::new("id", &params).as_str(), r#"id{"id":"42"}"#);
    /// ```
    pub fn new(param: &str, params: &AccumulatedParams) -> Self {
        Self(format!("{param}{}", params.serialize()))
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a started fetch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// The fetch completed. The external state presumably changed, a rebuild is due.
    Fetched {
        /// The settled key.
        key: FetchKey,
    },
    /// The fetch failed. It is not retried until the next path or state change.
    Failed {
        /// The settled key.
        key: FetchKey,
        /// Why it failed.
        error: ResolveError,
    },
}

impl Settlement {
    /// The key of the settled fetch.
    pub fn key(&self) -> &FetchKey {
        match self {
            Self::Fetched { key } | Self::Failed { key, .. } => key,
        }
    }
}

/// What the build should do with a resolved parameter.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// The data is present. The options (possibly empty) feed the sibling picker.
    Ready(Vec<ParamOption>),
    /// A fetch is running for this parameter. The build must stop here.
    Pending(FetchKey),
}

/// Decides, for every resolver call, whether to start a fetch or reuse a running one.
///
/// The set of in-flight [`FetchKey`]s is the only shared mutable state. Keys are inserted when a
/// fetch starts and removed when it settles, whatever the outcome, before the settlement is
/// reported.
pub struct Coordinator {
    in_flight: Rc<RefCell<FxHashSet<FetchKey>>>,
    spawner: Box<dyn LocalSpawn>,
    notify: Rc<dyn Fn(Settlement)>,
}

impl Coordinator {
    /// Create a coordinator that runs fetches on `spawner` and reports every settlement to
    /// `notify`.
    pub fn new(
        spawner: impl LocalSpawn + 'static,
        notify: impl Fn(Settlement) + 'static,
    ) -> Self {
        Self {
            in_flight: Default::default(),
            spawner: Box::new(spawner),
            notify: Rc::new(notify),
        }
    }

    /// Run `resolver` for `param` and act on its result.
    ///
    /// The resolver is always called synchronously. If it asks for a fetch and none is running for
    /// the same key, the fetch is spawned; either way the result is [`Step::Pending`] with the key.
    pub fn resolve<S>(
        &self,
        param: &str,
        resolver: &dyn ParamResolver<S>,
        state: &S,
        params: &AccumulatedParams,
    ) -> Result<Step, ResolveError> {
        let resolution = resolver.resolve(state, params)?;
        let Some(fetch) = resolution.fetch else {
            return Ok(Step::Ready(resolution.options));
        };

        let key = FetchKey::new(param, params);
        if !self.in_flight.borrow_mut().insert(key.clone()) {
            debug!(%key, "fetch already in flight");
            return Ok(Step::Pending(key));
        }

        debug!(%key, "starting fetch");
        let in_flight = self.in_flight.clone();
        let notify = self.notify.clone();
        let task_key = key.clone();
        let task = async move {
            let result = fetch.invoke().await;
            in_flight.borrow_mut().remove(&task_key);

            let settlement = match result {
                Ok(()) => {
                    debug!(key = %task_key, "fetch settled");
                    Settlement::Fetched { key: task_key }
                }
                Err(error) => {
                    let error = match error {
                        ResolveError::Fetch { key, message } if key.is_empty() => {
                            ResolveError::Fetch {
                                key: task_key.to_string(),
                                message,
                            }
                        }
                        error => error,
                    };
                    warn!(key = %task_key, %error, "fetch failed");
                    Settlement::Failed {
                        key: task_key,
                        error,
                    }
                }
            };
            notify(settlement);
        };

        if let Err(err) = self.spawner.spawn_local(task) {
            self.in_flight.borrow_mut().remove(&key);
            return Err(ResolveError::Spawn {
                key: key.to_string(),
                message: err.to_string(),
            });
        }

        Ok(Step::Pending(key))
    }

    /// Whether a fetch for `key` is running.
    pub fn in_flight(&self, key: &FetchKey) -> bool {
        self.in_flight.borrow().contains(key)
    }

    /// The number of running fetches.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.borrow().len()
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("in_flight", &self.in_flight.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::{channel::oneshot, executor::LocalPool};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FetchThunk, Resolution};

    struct Recorder {
        settlements: Rc<RefCell<Vec<Settlement>>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                settlements: Default::default(),
            }
        }

        fn coordinator(&self, pool: &LocalPool) -> Coordinator {
            let settlements = self.settlements.clone();
            Coordinator::new(pool.spawner(), move |settlement| {
                settlements.borrow_mut().push(settlement)
            })
        }
    }

    fn params() -> AccumulatedParams {
        [("id", "42")].into_iter().collect()
    }

    #[test]
    fn ready_resolution_is_synchronous() {
        let pool = LocalPool::new();
        let recorder = Recorder::new();
        let coordinator = recorder.coordinator(&pool);
        let resolver = |_: &(), _: &AccumulatedParams| -> Result<Resolution, ResolveError> {
            Ok(Resolution::ready(vec![ParamOption::new("42", "Civic")]))
        };

        let step = coordinator.resolve("id", &resolver, &(), &params()).unwrap();
        assert_eq!(step, Step::Ready(vec![ParamOption::new("42", "Civic")]));
        assert_eq!(coordinator.in_flight_len(), 0);
    }

    #[test]
    fn concurrent_identical_fetches_are_deduplicated() {
        let mut pool = LocalPool::new();
        let recorder = Recorder::new();
        let coordinator = recorder.coordinator(&pool);

        let invocations = Rc::new(Cell::new(0));
        let (tx, rx) = oneshot::channel::<()>();
        let rx = Rc::new(RefCell::new(Some(rx)));
        let resolver = {
            let invocations = invocations.clone();
            move |_: &(), _: &AccumulatedParams| -> Result<Resolution, ResolveError> {
                let invocations = invocations.clone();
                let rx = rx.clone();
                Ok(Resolution::fetch(FetchThunk::new(move || async move {
                    invocations.set(invocations.get() + 1);
                    let receiver = rx.borrow_mut().take();
                    if let Some(receiver) = receiver {
                        receiver.await.ok();
                    }
                    Ok(())
                })))
            }
        };

        let key = FetchKey::new("id", &params());
        let pending = Ok(Step::Pending(key.clone()));
        assert_eq!(coordinator.resolve("id", &resolver, &(), &params()), pending);
        pool.run_until_stalled();
        assert!(coordinator.in_flight(&key));

        assert_eq!(coordinator.resolve("id", &resolver, &(), &params()), pending);
        pool.run_until_stalled();
        assert_eq!(invocations.get(), 1);

        tx.send(()).unwrap();
        pool.run_until_stalled();
        assert!(!coordinator.in_flight(&key));
        assert_eq!(
            *recorder.settlements.borrow(),
            [Settlement::Fetched { key: key.clone() }]
        );

        // settled keys can be fetched again
        assert_eq!(coordinator.resolve("id", &resolver, &(), &params()), pending);
        pool.run_until_stalled();
        assert_eq!(invocations.get(), 2);
    }

    #[test]
    fn different_params_fetch_separately() {
        let mut pool = LocalPool::new();
        let recorder = Recorder::new();
        let coordinator = recorder.coordinator(&pool);
        let resolver = |_: &(), _: &AccumulatedParams| -> Result<Resolution, ResolveError> {
            Ok(Resolution::fetch(FetchThunk::new(|| async {
                futures::future::pending::<()>().await;
                Ok(())
            })))
        };

        let other: AccumulatedParams = [("id", "99")].into_iter().collect();
        coordinator.resolve("id", &resolver, &(), &params()).unwrap();
        coordinator.resolve("id", &resolver, &(), &other).unwrap();
        pool.run_until_stalled();
        assert_eq!(coordinator.in_flight_len(), 2);
    }

    #[test]
    fn failed_fetches_clear_their_key() {
        let mut pool = LocalPool::new();
        let recorder = Recorder::new();
        let coordinator = recorder.coordinator(&pool);
        let resolver = |_: &(), _: &AccumulatedParams| -> Result<Resolution, ResolveError> {
            Ok(Resolution::fetch(FetchThunk::new(|| async {
                Err::<(), _>(ResolveError::fetch("connection reset"))
            })))
        };

        coordinator.resolve("id", &resolver, &(), &params()).unwrap();
        pool.run_until_stalled();

        let key = FetchKey::new("id", &params());
        assert!(!coordinator.in_flight(&key));
        assert_eq!(
            *recorder.settlements.borrow(),
            [Settlement::Failed {
                key: key.clone(),
                error: ResolveError::Fetch {
                    key: key.to_string(),
                    message: "connection reset".to_string(),
                },
            }]
        );
    }

    #[test]
    fn resolver_errors_propagate() {
        let pool = LocalPool::new();
        let recorder = Recorder::new();
        let coordinator = recorder.coordinator(&pool);
        let resolver = |_: &(), _: &AccumulatedParams| -> Result<Resolution, ResolveError> {
            Err(ResolveError::resolver("id", "store unavailable"))
        };

        assert_eq!(
            coordinator.resolve("id", &resolver, &(), &params()),
            Err(ResolveError::resolver("id", "store unavailable"))
        );
        assert_eq!(coordinator.in_flight_len(), 0);
    }
}
