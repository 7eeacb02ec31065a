//! Resolvers turn a dynamic parameter into sibling options, or into a fetch for them.

use std::{fmt, future::Future};

use futures_util::{future::LocalBoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::{error::ResolveError, params::AccumulatedParams};

/// One choice in a sibling picker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamOption {
    /// The raw parameter value, as it appears in the path.
    pub value: String,
    /// The human-readable label.
    pub label: String,
}

impl ParamOption {
    /// Create a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A deferred fetch returned by a resolver.
///
/// Invoking the thunk is the only point where the external state may be mutated. The thunk is
/// invoked at most once, inside a task handed to the navigator's spawner.
pub struct FetchThunk(Box<dyn FnOnce() -> LocalBoxFuture<'static, Result<(), ResolveError>>>);

impl FetchThunk {
    /// Wrap an async closure.
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<(), ResolveError>> + 'static,
    {
        Self(Box::new(move || fetch().boxed_local()))
    }

    pub(crate) fn invoke(self) -> LocalBoxFuture<'static, Result<(), ResolveError>> {
        (self.0)()
    }
}

impl fmt::Debug for FetchThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchThunk").finish_non_exhaustive()
    }
}

/// The result of calling a [`ParamResolver`].
#[derive(Debug, Default)]
pub struct Resolution {
    /// The sibling options known right now. May be empty.
    pub options: Vec<ParamOption>,
    /// A fetch that must complete before the breadcrumb can be built.
    pub fetch: Option<FetchThunk>,
}

impl Resolution {
    /// The data is present: no fetch is needed.
    pub fn ready(options: Vec<ParamOption>) -> Self {
        Self {
            options,
            fetch: None,
        }
    }

    /// The data is missing and `fetch` will load it.
    pub fn fetch(fetch: FetchThunk) -> Self {
        Self {
            options: Vec::new(),
            fetch: Some(fetch),
        }
    }

    /// Whether the resolver asked for a fetch.
    pub fn should_fetch(&self) -> bool {
        self.fetch.is_some()
    }
}

/// Resolves one named parameter of a route.
///
/// A resolver reads `state` and the parameters accumulated so far and either reports the
/// sibling options, or hands back a [`FetchThunk`] that will make them available. It must not
/// mutate anything itself; the navigator calls it again on every rebuild.
pub trait ParamResolver<S> {
    /// Resolve the parameter.
    fn resolve(&self, state: &S, params: &AccumulatedParams) -> Result<Resolution, ResolveError>;
}

impl<S, F> ParamResolver<S> for F
where
    F: Fn(&S, &AccumulatedParams) -> Result<Resolution, ResolveError>,
{
    fn resolve(&self, state: &S, params: &AccumulatedParams) -> Result<Resolution, ResolveError> {
        self(state, params)
    }
}
