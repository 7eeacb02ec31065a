//! Building the breadcrumb trail for a path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    coordinator::{Coordinator, FetchKey, Step},
    descriptor::RouteTable,
    error::ResolveError,
    params::{AccumulatedParams, NodeParam},
    pattern::{decode_segment, segments},
    resolver::ParamOption,
};

/// The titles and icons used for nodes that don't come from a [`RouteDescriptor`](crate::RouteDescriptor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// The title of the synthetic root node.
    pub home_title: String,
    /// The icon of the synthetic root node.
    pub home_icon: String,
    /// The icon of nodes for segments no route matches.
    pub fallback_icon: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            home_title: "Home".to_string(),
            home_icon: "home".to_string(),
            fallback_icon: "folder".to_string(),
        }
    }
}

/// One step in the breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbNode {
    /// The path this node links to.
    pub path: String,
    /// The pattern that matched [`path`](Self::path), if any.
    pub original_pattern: Option<String>,
    /// The display title.
    pub title: String,
    /// The icon name.
    pub icon: String,
    /// The parameters captured at exactly this segment. These can be switched in place.
    pub params: Vec<NodeParam>,
    /// Whether this is the synthetic root node.
    #[serde(default)]
    pub is_home: bool,
}

impl BreadcrumbNode {
    fn home(options: &BuildOptions) -> Self {
        Self {
            path: "/".to_string(),
            original_pattern: None,
            title: options.home_title.clone(),
            icon: options.home_icon.clone(),
            params: Vec::new(),
            is_home: true,
        }
    }

    fn fallback(path: String, segment: &str, options: &BuildOptions) -> Self {
        Self {
            path,
            original_pattern: None,
            title: capitalize(segment),
            icon: options.fallback_icon.clone(),
            params: Vec::new(),
            is_home: false,
        }
    }

    /// The captured value of parameter `key` on this node.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }
}

/// A complete breadcrumb trail and the sibling options of its dynamic parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    /// The nodes, root first.
    pub nodes: Vec<BreadcrumbNode>,
    /// The resolved sibling options, by parameter name.
    pub options: BTreeMap<String, Vec<ParamOption>>,
}

impl Trail {
    /// A trail holding only the root node.
    pub fn minimal(options: &BuildOptions) -> Self {
        Self {
            nodes: vec![BreadcrumbNode::home(options)],
            options: BTreeMap::new(),
        }
    }

    /// The sibling options for parameter `key`. Empty if none were resolved.
    pub fn options_for(&self, key: &str) -> &[ParamOption] {
        self.options.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// The titles of all nodes, root first.
    pub fn titles(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.title.as_str()).collect()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::minimal(&BuildOptions::default())
    }
}

/// The result of a build pass.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Every segment was resolved.
    Complete(Trail),
    /// A resolver is waiting for the fetch with this key. The pass was abandoned and must be
    /// repeated once the fetch settles.
    Pending(FetchKey),
    /// A resolver failed. The trail should degrade to [`Trail::minimal`].
    Failed(ResolveError),
}

impl BuildOutcome {
    /// The trail, if the build completed.
    pub fn trail(&self) -> Option<&Trail> {
        match self {
            Self::Complete(trail) => Some(trail),
            Self::Pending(_) | Self::Failed(_) => None,
        }
    }
}

/// Build the breadcrumb trail for `path`.
///
/// Every prefix of the path is matched against `table`. Parameters are accumulated left to
/// right, and each parameter with a resolver is resolved through `coordinator` as soon as it is
/// captured. The first resolver waiting on a fetch abandons the whole pass: no partial trail is
/// ever returned.
///
/// The root node always takes its title and icon from `options`. `/` has no segments, so a
/// descriptor whose pattern is `/` is never consulted.
pub fn build<S>(
    path: &str,
    table: &RouteTable<S>,
    state: &S,
    coordinator: &Coordinator,
    options: &BuildOptions,
) -> BuildOutcome {
    let mut trail = Trail::minimal(options);
    let mut accumulated = AccumulatedParams::default();
    let segments: Vec<&str> = segments(path).collect();

    for depth in 1..=segments.len() {
        let segment = decode_segment(segments[depth - 1]);
        let partial_path = format!("/{}", segments[..depth].join("/"));

        let Some(found) = table.find_match(&partial_path) else {
            trace!(%partial_path, "no route, using fallback");
            trail
                .nodes
                .push(BreadcrumbNode::fallback(partial_path, &segment, options));
            continue;
        };

        for (key, value) in found.params.iter() {
            accumulated.insert(key, value);

            let Some(resolver) = found.descriptor.resolver_for(key) else {
                continue;
            };

            match coordinator.resolve(key, resolver, state, &accumulated) {
                Ok(Step::Ready(param_options)) => {
                    trail.options.insert(key.to_string(), param_options);
                }
                Ok(Step::Pending(fetch)) => {
                    debug!(%path, %fetch, "build pending on fetch");
                    return BuildOutcome::Pending(fetch);
                }
                Err(error) => return BuildOutcome::Failed(error),
            }
        }

        let params = found
            .params
            .iter()
            .filter(|(_, value)| *value == &*segment)
            .map(|(key, value)| NodeParam {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect();

        trail.nodes.push(BreadcrumbNode {
            path: partial_path,
            original_pattern: Some(found.pattern.to_string()),
            title: found.descriptor.title().to_string(),
            icon: found.descriptor.icon_name().to_string(),
            params,
            is_home: false,
        });
    }

    BuildOutcome::Complete(trail)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
