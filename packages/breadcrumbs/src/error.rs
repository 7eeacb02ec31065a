use thiserror::Error;

/// An error raised while resolving a dynamic parameter.
///
/// Resolution errors never escape the navigator: they are logged and the visible trail falls back
/// to the root-only breadcrumb.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A resolver failed synchronously.
    #[error("resolver for `{param}` failed: {message}")]
    Resolver {
        /// The parameter the resolver was registered for.
        param: String,
        /// What went wrong.
        message: String,
    },

    /// A fetch started for a resolver failed.
    #[error("fetch `{key}` failed: {message}")]
    Fetch {
        /// The key of the failed fetch.
        key: String,
        /// What went wrong.
        message: String,
    },

    /// The fetch could not be handed to the spawner.
    #[error("fetch `{key}` could not be spawned: {message}")]
    Spawn {
        /// The key of the fetch.
        key: String,
        /// What went wrong.
        message: String,
    },
}

impl ResolveError {
    /// A synchronous resolver failure.
    pub fn resolver(param: impl Into<String>, message: impl ToString) -> Self {
        Self::Resolver {
            param: param.into(),
            message: message.to_string(),
        }
    }

    /// A failed fetch. The key is filled in by the coordinator if left empty.
    pub fn fetch(message: impl ToString) -> Self {
        Self::Fetch {
            key: String::new(),
            message: message.to_string(),
        }
    }
}

/// An error in a breadcrumb configuration file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not valid TOML or doesn't have the expected shape.
    #[error("failed to parse breadcrumb config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but describes an unusable route table.
    #[error("invalid breadcrumb config: {0}")]
    Invalid(String),
}

/// An error while selecting a sibling in a breadcrumb picker.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// The visible trail has no node at this index.
    #[error("no breadcrumb at index {0}")]
    NoSuchNode(usize),

    /// The node exists but has no switchable parameter with this name.
    #[error("breadcrumb {index} has no selectable parameter `{key}`")]
    NotSelectable {
        /// The node index.
        index: usize,
        /// The requested parameter.
        key: String,
    },
}
