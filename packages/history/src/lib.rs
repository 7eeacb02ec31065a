#![warn(missing_docs)]
//! History integration for the breadcrumb navigator.
//!
//! The navigator never owns the URL. It reads the current route from a [`History`] provider and
//! asks the provider to [`push`](History::push) when the user picks a sibling in a breadcrumb
//! selector. Providers that receive route changes from somewhere else (a browser back button, a
//! link elsewhere on the page) report them through the callback registered with
//! [`History::updater`].

use std::sync::Arc;

mod memory;
pub use memory::*;

/// An integration with some kind of navigation history.
///
/// The described behaviors mimic a web browser. Implementations may deviate, as long as
/// [`current_route`](History::current_route) keeps the described format.
pub trait History {
    /// Get the path of the current route.
    ///
    /// **Must start** with `/`.
    ///
    /// ```rust
    /// # use carlot_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_route(), "/");
    ///
    /// history.push(String::from("/vehicles"));
    /// assert_eq!(history.current_route(), "/vehicles");
    /// ```
    #[must_use]
    fn current_route(&self) -> String;

    /// Check whether there is a previous route to navigate back to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to the previous route.
    ///
    /// Does nothing if there is no previous route.
    fn go_back(&self);

    /// Go to another route.
    ///
    /// This should do two things:
    /// 1. Make `route` the current route.
    /// 2. Add the previous route to the navigation history.
    ///
    /// ```rust
    /// # use carlot_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// history.push(String::from("/vehicles/42"));
    /// assert_eq!(history.current_route(), "/vehicles/42");
    /// assert!(history.can_go_back());
    /// ```
    fn push(&self, route: String);

    /// Replace the current route without touching the navigation history.
    fn replace(&self, route: String);

    /// Provide the [`History`] with an update callback.
    ///
    /// The callback must be called whenever the current route changes, so subscribers can rebuild
    /// whatever they derive from it.
    #[allow(unused_variables)]
    fn updater(&self, callback: Arc<dyn Fn() + Send + Sync>) {}

    /// Remove a callback registered with [`updater`](History::updater).
    ///
    /// Callbacks are compared by pointer, so pass a clone of the registered [`Arc`].
    #[allow(unused_variables)]
    fn remove_updater(&self, callback: &Arc<dyn Fn() + Send + Sync>) {}
}
