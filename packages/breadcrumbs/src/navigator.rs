//! The breadcrumb navigator: ties the builder to a [`History`] and drives rebuilds.

use std::{rc::Rc, sync::Arc};

use carlot_history::History;
use futures_channel::mpsc::{unbounded, UnboundedReceiver};
use futures_util::{task::LocalSpawn, FutureExt, StreamExt};
use tracing::{debug, error};

use crate::{
    builder::{build, BuildOptions, BuildOutcome, Trail},
    coordinator::{Coordinator, FetchKey, Settlement},
    descriptor::RouteTable,
    error::SelectError,
    pattern::RoutePattern,
};

/// A set of messages the [`BreadcrumbNavigator`] reacts to.
#[derive(Debug, PartialEq, Eq)]
pub enum NavigatorMessage {
    /// The history reported a new current route.
    RouteChanged,
    /// A fetch started by a resolver settled.
    Settled(Settlement),
}

/// The result of picking a sibling in a breadcrumb selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The history was pushed to this path.
    Navigated(String),
    /// The picked value is the current one. Nothing happened.
    Unchanged,
}

/// Owns the route table, the fetch coordinator and the visible trail of one breadcrumb bar.
///
/// The navigator never holds a continuation across a fetch. Every route change or settled fetch
/// is a message; handling it rebuilds the trail from scratch against the state passed in.
///
/// ```rust
/// # use std::rc::Rc;
/// # use carlot_breadcrumbs::prelude::*;
/// # use carlot_history::MemoryHistory;
/// # use futures::executor::LocalPool;
/// let pool = LocalPool::new();
/// let table = RouteTable::<()>::new().route(RouteDescriptor::new("Vehicles").pattern("/vehicles"));
/// let history = Rc::new(MemoryHistory::with_initial_path("/vehicles"));
///
/// let mut navigator = BreadcrumbNavigator::new(table, history, pool.spawner(), BuildOptions::default());
/// navigator.refresh(&());
/// assert_eq!(navigator.trail().titles(), ["Home", "Vehicles"]);
/// ```
pub struct BreadcrumbNavigator<S> {
    table: RouteTable<S>,
    history: Rc<dyn History>,
    updater: Arc<dyn Fn() + Send + Sync>,
    coordinator: Coordinator,
    rx: UnboundedReceiver<NavigatorMessage>,
    options: BuildOptions,
    trail: Trail,
    awaiting: Option<FetchKey>,
}

impl<S> BreadcrumbNavigator<S> {
    /// Create a navigator.
    ///
    /// Fetches requested by resolvers are spawned on `spawner`. The visible trail starts out as
    /// the root-only trail until the first [`refresh`](Self::refresh). The navigator subscribes to
    /// `history` and unsubscribes again when dropped.
    pub fn new(
        table: RouteTable<S>,
        history: Rc<dyn History>,
        spawner: impl LocalSpawn + 'static,
        options: BuildOptions,
    ) -> Self {
        let (tx, rx) = unbounded();

        let updates = tx.clone();
        let updater: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            updates.unbounded_send(NavigatorMessage::RouteChanged).ok();
        });
        history.updater(updater.clone());

        // sends fail once the navigator is dropped, settlements are then irrelevant
        let coordinator = Coordinator::new(spawner, move |settlement| {
            tx.unbounded_send(NavigatorMessage::Settled(settlement)).ok();
        });

        Self {
            trail: Trail::minimal(&options),
            table,
            history,
            updater,
            coordinator,
            rx,
            options,
            awaiting: None,
        }
    }

    /// The visible trail.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// The route table.
    pub fn table(&self) -> &RouteTable<S> {
        &self.table
    }

    /// The fetch coordinator.
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// The key of the fetch the visible trail is waiting for, if any.
    pub fn awaiting(&self) -> Option<&FetchKey> {
        self.awaiting.as_ref()
    }

    /// Rebuild the trail for the current route against `state`.
    ///
    /// - A complete build replaces the visible trail.
    /// - A pending build keeps the previous trail until the fetch settles.
    /// - A failed build degrades the visible trail to the root node.
    ///
    /// A build is dropped without touching the visible trail if the current route changed while
    /// it ran.
    pub fn refresh(&mut self, state: &S) -> &Trail {
        let path = self.history.current_route();
        let outcome = build(&path, &self.table, state, &self.coordinator, &self.options);

        if self.history.current_route() != path {
            debug!(%path, "dropping superseded build");
            return &self.trail;
        }

        match outcome {
            BuildOutcome::Complete(trail) => {
                self.awaiting = None;
                self.trail = trail;
            }
            BuildOutcome::Pending(key) => {
                self.awaiting = Some(key);
            }
            BuildOutcome::Failed(err) => {
                error!(%path, %err, "breadcrumb resolution failed");
                self.awaiting = None;
                self.trail = Trail::minimal(&self.options);
            }
        }

        &self.trail
    }

    /// React to a single message.
    pub fn handle(&mut self, message: NavigatorMessage, state: &S) {
        match message {
            NavigatorMessage::RouteChanged => {
                self.refresh(state);
            }
            NavigatorMessage::Settled(Settlement::Fetched { key }) => {
                debug!(%key, "fetch settled, rebuilding");
                self.refresh(state);
            }
            NavigatorMessage::Settled(Settlement::Failed { key, error }) => {
                if self.awaiting.as_ref() != Some(&key) {
                    debug!(%key, "ignoring failure of a superseded fetch");
                    return;
                }
                error!(%key, %error, "breadcrumb resolution failed");
                self.awaiting = None;
                self.trail = Trail::minimal(&self.options);
            }
        }
    }

    /// Handle every message that is already queued. Returns the number handled.
    pub fn poll(&mut self, state: &S) -> usize {
        let mut handled = 0;
        while let Some(Some(message)) = self.rx.next().now_or_never() {
            self.handle(message, state);
            handled += 1;
        }
        handled
    }

    /// Wait for the next message.
    ///
    /// Returns [`None`] once no sender is left, which cannot happen while the navigator is alive.
    pub async fn next_message(&mut self) -> Option<NavigatorMessage> {
        self.rx.next().await
    }

    /// Pick `value` for parameter `key` of the node at `index` in the visible trail.
    ///
    /// The target path is the node's own path with only the `key` segment replaced. Picking the
    /// current value is a no-op.
    pub fn select(
        &mut self,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<Navigation, SelectError> {
        let node = self
            .trail
            .nodes
            .get(index)
            .ok_or(SelectError::NoSuchNode(index))?;
        let not_selectable = || SelectError::NotSelectable {
            index,
            key: key.to_string(),
        };

        let current = node.param(key).ok_or_else(not_selectable)?;
        if current == value {
            return Ok(Navigation::Unchanged);
        }

        let pattern = node.original_pattern.as_deref().ok_or_else(not_selectable)?;
        let target = RoutePattern::parse(pattern)
            .substitute(&node.path, key, value)
            .ok_or_else(not_selectable)?;

        if target == self.history.current_route() {
            return Ok(Navigation::Unchanged);
        }

        debug!(from = %node.path, to = %target, "sibling navigation");
        self.history.push(target.clone());
        Ok(Navigation::Navigated(target))
    }
}

impl<S> Drop for BreadcrumbNavigator<S> {
    fn drop(&mut self) {
        self.history.remove_updater(&self.updater);
    }
}
