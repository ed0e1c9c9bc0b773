//! Constructor methods for KhoError

use super::types::KhoError;

impl KhoError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: None,
            context: None,
        }
    }

    /// Create a storage error for a specific durable key
    pub fn storage_for_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: Some(key.into()),
            context: None,
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            key: None,
        }
    }

    /// Create a fetch error tagged with the page key being loaded
    pub fn fetch_for_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a new cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error naming the offending field
    pub fn invalid_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
        }
    }

    /// Create a not found error with resource type
    pub fn not_found_resource(
        message: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: Some(resource_type.into()),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to errors that carry a context slot
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        let ctx = Some(ctx.into());
        match &mut self {
            Self::Config { context, .. }
            | Self::Storage { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::Cache { context, .. }
            | Self::Other { context, .. } => *context = ctx,
            Self::Fetch { .. } | Self::InvalidInput { .. } | Self::NotFound { .. } => {}
        }
        self
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "KHO_CONFIG",
            Self::Storage { .. } => "KHO_STORAGE",
            Self::Io { .. } => "KHO_IO",
            Self::Json { .. } => "KHO_JSON",
            Self::Fetch { .. } => "KHO_FETCH",
            Self::Cache { .. } => "KHO_CACHE",
            Self::InvalidInput { .. } => "KHO_INVALID_INPUT",
            Self::NotFound { .. } => "KHO_NOT_FOUND",
            Self::Other { .. } => "KHO_OTHER",
        }
    }

    /// Get the context attached to this error, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Storage { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::Cache { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
            Self::Fetch { .. } | Self::InvalidInput { .. } | Self::NotFound { .. } => None,
        }
    }
}
