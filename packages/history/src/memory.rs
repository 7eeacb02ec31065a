use std::{cell::RefCell, sync::Arc};

use tracing::{error, trace};

use crate::History;

struct MemoryHistoryState {
    current: String,
    history: Vec<String>,
}

/// A [`History`] provider that stores all navigation information in memory.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    updaters: RefCell<Vec<Arc<dyn Fn() + Send + Sync>>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use carlot_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/vehicles/42");
    /// assert_eq!(history.current_route(), "/vehicles/42");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl ToString) -> Self {
        Self {
            state: MemoryHistoryState {
                current: path.to_string(),
                history: Vec::new(),
            }
            .into(),
            updaters: RefCell::new(Vec::new()),
        }
    }

    fn notify(&self) {
        // clone the callbacks out so an updater may touch the history again
        let updaters = self.updaters.borrow().clone();
        for updater in updaters {
            updater();
        }
    }
}

impl History for MemoryHistory {
    fn current_route(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    fn go_back(&self) {
        {
            let mut write = self.state.borrow_mut();
            let Some(last) = write.history.pop() else {
                return;
            };
            write.current = last;
        }
        self.notify();
    }

    fn push(&self, new: String) {
        if !new.starts_with('/') {
            error!(r#"cannot navigate to routes not starting with "/", route: {new}"#);
            return;
        }

        {
            let mut write = self.state.borrow_mut();
            // don't push the same route twice
            if write.current == new {
                return;
            }
            trace!(from = %write.current, to = %new, "push");
            let old = std::mem::replace(&mut write.current, new);
            write.history.push(old);
        }
        self.notify();
    }

    fn replace(&self, route: String) {
        if !route.starts_with('/') {
            error!(r#"cannot navigate to routes not starting with "/", route: {route}"#);
            return;
        }

        self.state.borrow_mut().current = route;
        self.notify();
    }

    fn updater(&self, callback: Arc<dyn Fn() + Send + Sync>) {
        self.updaters.borrow_mut().push(callback);
    }

    fn remove_updater(&self, callback: &Arc<dyn Fn() + Send + Sync>) {
        self.updaters
            .borrow_mut()
            .retain(|updater| !Arc::ptr_eq(updater, callback));
    }
}
