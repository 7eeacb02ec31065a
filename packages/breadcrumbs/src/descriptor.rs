//! Route descriptors and the route table.

use std::{collections::BTreeMap, fmt, rc::Rc};

use tracing::{trace, warn};

use crate::{config::BreadcrumbConfig, params::RouteParams, pattern::RoutePattern, ParamResolver};

/// A logical page: one or more alternative patterns sharing a title and an icon.
pub struct RouteDescriptor<S> {
    pub(crate) title: String,
    pub(crate) icon: String,
    pub(crate) patterns: Vec<RoutePattern>,
    pub(crate) resolvers: BTreeMap<String, Rc<dyn ParamResolver<S>>>,
}

impl<S> RouteDescriptor<S> {
    /// Create a descriptor without patterns.
    ///
    /// ```rust
    /// # use carlot_breadcrumbs::RouteDescriptor;
    /// let vehicles = RouteDescriptor::<()>::new("Vehicle")
    ///     .icon("car")
    ///     .pattern("/vehicles/:id")
    ///     .pattern("/garage/:id");
    /// assert_eq!(vehicles.patterns().len(), 2);
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: String::new(),
            patterns: Vec::new(),
            resolvers: BTreeMap::new(),
        }
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Add an alternative pattern. Patterns are tried in order of addition.
    pub fn pattern(mut self, pattern: impl Into<RoutePattern>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Register the resolver for parameter `param`.
    ///
    /// # Error Handling
    /// Registering a second resolver for the same parameter replaces the first one. In _debug
    /// mode_ this panics.
    pub fn resolver(
        mut self,
        param: impl Into<String>,
        resolver: impl ParamResolver<S> + 'static,
    ) -> Self {
        let param = param.into();
        if self.resolvers.insert(param.clone(), Rc::new(resolver)).is_some() {
            warn!(title = %self.title, %param, "resolver already set, later prevails");
            debug_assert!(false, "resolver for `{param}` already set");
        }
        self
    }

    /// The title of the page.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The icon of the page.
    pub fn icon_name(&self) -> &str {
        &self.icon
    }

    /// The patterns of the page, in priority order.
    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }

    /// The resolver for `param`, if any.
    pub fn resolver_for(&self, param: &str) -> Option<&dyn ParamResolver<S>> {
        self.resolvers.get(param).map(|resolver| resolver.as_ref())
    }
}

impl<S> fmt::Debug for RouteDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("patterns", &self.patterns)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The first pattern of a [`RouteTable`] matching a path.
#[derive(Debug)]
pub struct RouteMatch<'a, S> {
    /// The descriptor owning the pattern.
    pub descriptor: &'a RouteDescriptor<S>,
    /// The pattern that matched.
    pub pattern: &'a RoutePattern,
    /// The parameters captured by this match only.
    pub params: RouteParams,
}

/// An ordered list of [`RouteDescriptor`]s.
///
/// The table is a priority list: the first matching pattern wins, ties are broken by declaration
/// order only. Only non-empty prefixes are looked up, so a descriptor for `/` never shows up in a
/// trail; the root is configured with [`BuildOptions`](crate::BuildOptions) instead.
pub struct RouteTable<S> {
    descriptors: Vec<RouteDescriptor<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }
}

impl<S> RouteTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from the `[[routes]]` of a config file. No resolvers are attached.
    pub fn from_config(config: &BreadcrumbConfig) -> Self {
        let descriptors = config
            .routes
            .iter()
            .map(|route| {
                route.patterns.iter().fold(
                    RouteDescriptor::new(route.title.clone()).icon(route.icon.clone()),
                    |descriptor, pattern| descriptor.pattern(pattern.as_str()),
                )
            })
            .collect();
        Self { descriptors }
    }

    /// Append a descriptor.
    pub fn route(mut self, descriptor: RouteDescriptor<S>) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Attach `resolver` for `param` to the first descriptor titled `title`.
    ///
    /// Logs a warning and leaves the table untouched if there is no such descriptor.
    pub fn resolver(
        mut self,
        title: &str,
        param: impl Into<String>,
        resolver: impl ParamResolver<S> + 'static,
    ) -> Self {
        let param = param.into();
        match self.descriptors.iter().position(|d| d.title == title) {
            Some(index) => {
                let descriptor = self.descriptors.remove(index);
                self.descriptors
                    .insert(index, descriptor.resolver(param, resolver));
            }
            None => warn!(title, %param, "no route with this title, resolver ignored"),
        }
        self
    }

    /// The descriptors in priority order.
    pub fn descriptors(&self) -> &[RouteDescriptor<S>] {
        &self.descriptors
    }

    /// Whether the table has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Find the first pattern matching `path`, in table order and then pattern order.
    pub fn find_match(&self, path: &str) -> Option<RouteMatch<'_, S>> {
        self.descriptors.iter().find_map(|descriptor| {
            descriptor.patterns.iter().find_map(|pattern| {
                let params = pattern.matches(path)?;
                trace!(%path, %pattern, title = %descriptor.title, "route matched");
                Some(RouteMatch {
                    descriptor,
                    pattern,
                    params,
                })
            })
        })
    }
}

impl<S> fmt::Debug for RouteTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.descriptors).finish()
    }
}
