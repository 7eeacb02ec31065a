//! Loading the route table from a TOML file.
//!
//! ```toml
//! home_title = "Dashboard"
//!
//! [[routes]]
//! title = "Vehicles"
//! icon = "car"
//! patterns = ["/vehicles"]
//!
//! [[routes]]
//! title = "Vehicle"
//! icon = "car"
//! patterns = ["/vehicles/:id", "/garage/:id"]
//! ```

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{builder::BuildOptions, error::ConfigError, pattern::RoutePattern};

/// The contents of a breadcrumb config file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreadcrumbConfig {
    /// The title of the root node.
    #[serde(default = "default_home_title")]
    pub home_title: String,
    /// The icon of the root node.
    #[serde(default = "default_home_icon")]
    pub home_icon: String,
    /// The icon of nodes no route matches.
    #[serde(default = "default_fallback_icon")]
    pub fallback_icon: String,
    /// The route table, in priority order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One `[[routes]]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// The page title.
    pub title: String,
    /// The icon name.
    #[serde(default)]
    pub icon: String,
    /// The alternative patterns of the page.
    pub patterns: Vec<String>,
}

fn default_home_title() -> String {
    BuildOptions::default().home_title
}

fn default_home_icon() -> String {
    BuildOptions::default().home_icon
}

fn default_fallback_icon() -> String {
    BuildOptions::default().fallback_icon
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            home_title: options.home_title,
            home_icon: options.home_icon,
            fallback_icon: options.fallback_icon,
            routes: Vec::new(),
        }
    }
}

impl BreadcrumbConfig {
    /// Parse and validate a config file.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every route has at least one pattern, and that no pattern repeats a
    /// parameter name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for route in &self.routes {
            if route.patterns.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "route `{}` has no patterns",
                    route.title
                )));
            }

            for pattern in &route.patterns {
                let parsed = RoutePattern::parse(pattern);
                let mut seen = BTreeSet::new();
                let repeated = parsed.param_names().find(|name| !seen.insert(*name));
                if let Some(name) = repeated {
                    return Err(ConfigError::Invalid(format!(
                        "pattern `{pattern}` of route `{}` repeats parameter `{name}`",
                        route.title
                    )));
                }
            }
        }
        Ok(())
    }

    /// The root and fallback settings for the builder.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            home_title: self.home_title.clone(),
            home_icon: self.home_icon.clone(),
            fallback_icon: self.fallback_icon.clone(),
        }
    }
}
