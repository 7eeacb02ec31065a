#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod builder;
pub mod config;
pub mod coordinator;
pub mod descriptor;
pub mod navigator;
pub mod params;
pub mod pattern;
pub mod render;
pub mod resolver;

mod error;
pub use error::*;

pub use builder::{build, BreadcrumbNode, BuildOptions, BuildOutcome, Trail};
pub use config::{BreadcrumbConfig, RouteConfig};
pub use coordinator::{Coordinator, FetchKey, Settlement, Step};
pub use descriptor::{RouteDescriptor, RouteMatch, RouteTable};
pub use navigator::{BreadcrumbNavigator, Navigation, NavigatorMessage};
pub use params::{AccumulatedParams, NodeParam, RouteParams};
pub use pattern::{PathToken, RoutePattern};
pub use resolver::{FetchThunk, ParamOption, ParamResolver, Resolution};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::builder::{BreadcrumbNode, BuildOptions, Trail};
    pub use crate::config::BreadcrumbConfig;
    pub use crate::descriptor::{RouteDescriptor, RouteTable};
    pub use crate::error::{ResolveError, SelectError};
    pub use crate::navigator::{BreadcrumbNavigator, Navigation};
    pub use crate::params::AccumulatedParams;
    pub use crate::render::{render, render_html, Crumb};
    pub use crate::resolver::{FetchThunk, ParamOption, ParamResolver, Resolution};
}
