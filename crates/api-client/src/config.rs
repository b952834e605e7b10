//! Configuration for the Recipe API client
//!
//! The backend origin comes from an ordered list of [`ConfigSource`]s. The
//! standard chain checks a runtime override, then a value baked in at build
//! time, then [`DEFAULT_API_BASE`].

use crate::error::{ApiError, ApiResult};
use crate::routes::RouteTable;
use std::env;
use std::fmt;
use std::sync::Arc;

/// Origin used when no configuration source yields a value
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Environment variable consulted at runtime and at build time
pub const API_BASE_ENV: &str = "RECIPE_API_BASE";

/// Value of `RECIPE_API_BASE` when the crate was compiled
const BUILD_TIME_API_BASE: Option<&str> = option_env!("RECIPE_API_BASE");

type SourceFn = dyn Fn() -> Option<String> + Send + Sync;

/// A named, pure lookup that may yield a base URL
#[derive(Clone)]
pub struct ConfigSource {
    name: &'static str,
    lookup: Arc<SourceFn>,
}

impl ConfigSource {
    /// Create a source from a lookup function
    pub fn new<F>(name: &'static str, lookup: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name,
            lookup: Arc::new(lookup),
        }
    }

    /// A source that always yields the given value
    pub fn fixed(name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(name, move || Some(value.clone()))
    }

    /// The runtime environment variable [`API_BASE_ENV`]
    #[must_use]
    pub fn runtime_env() -> Self {
        Self::new("runtime-env", || env::var(API_BASE_ENV).ok())
    }

    /// The value of [`API_BASE_ENV`] captured at build time
    #[must_use]
    pub fn build_time() -> Self {
        Self::new("build-time", || BUILD_TIME_API_BASE.map(str::to_string))
    }

    /// Source name, for diagnostics
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the source; blank values count as absent
    #[must_use]
    pub fn value(&self) -> Option<String> {
        (self.lookup)()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSource").field("name", &self.name).finish()
    }
}

/// Resolves the backend origin from prioritized sources
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    sources: Vec<ConfigSource>,
    default: String,
}

impl Default for BaseUrlResolver {
    fn default() -> Self {
        Self::standard(None)
    }
}

impl BaseUrlResolver {
    /// Create a resolver over the given sources, highest priority first
    #[must_use]
    pub fn new(sources: Vec<ConfigSource>) -> Self {
        Self {
            sources,
            default: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Standard chain: explicit override, runtime env, build-time value, default
    #[must_use]
    pub fn standard(runtime_override: Option<String>) -> Self {
        let mut sources = Vec::with_capacity(3);
        if let Some(value) = runtime_override {
            sources.push(ConfigSource::fixed("override", value));
        }
        sources.push(ConfigSource::runtime_env());
        sources.push(ConfigSource::build_time());
        Self::new(sources)
    }

    /// Builder-style method to replace the fallback origin
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Configured sources, highest priority first
    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Resolve the base URL with trailing slashes stripped.
    ///
    /// Sources are evaluated on every call; the first non-blank value wins.
    #[must_use]
    pub fn resolve(&self) -> String {
        let raw = self
            .sources
            .iter()
            .find_map(ConfigSource::value)
            .unwrap_or_else(|| self.default.clone());
        normalize_base_url(&raw)
    }
}

/// Strip trailing slashes so a leading-slash path can be appended
#[must_use]
pub fn normalize_base_url(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL resolver
    pub resolver: BaseUrlResolver,
    /// User agent sent with every request
    pub user_agent: String,
    /// Endpoint visibility table
    pub routes: RouteTable,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            resolver: BaseUrlResolver::default(),
            user_agent: format!("recipe-api-client/{}", env!("CARGO_PKG_VERSION")),
            routes: RouteTable::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from the environment
    ///
    /// Reads `RECIPE_API_BASE` at runtime (on every resolution), then the
    /// value captured at build time, then falls back to [`DEFAULT_API_BASE`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Configuration pinned to a single base URL
    #[must_use]
    pub fn for_base_url(url: impl Into<String>) -> Self {
        Self::default().with_resolver(BaseUrlResolver::new(vec![ConfigSource::fixed(
            "fixed", url,
        )]))
    }

    /// Builder-style method to put a runtime override in front of the standard chain
    #[must_use]
    pub fn with_base_url_override(mut self, url: impl Into<String>) -> Self {
        self.resolver = BaseUrlResolver::standard(Some(url.into()));
        self
    }

    /// Builder-style method to set the resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: BaseUrlResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Builder-style method to set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builder-style method to set the visibility table
    #[must_use]
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        let base = self.resolver.resolve();

        if base.is_empty() {
            return Err(ApiError::config("base URL cannot be empty"));
        }

        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ApiError::config(format!(
                "base URL must start with http:// or https://, got {base}"
            )));
        }

        if self.user_agent.is_empty() {
            return Err(ApiError::config("user agent cannot be empty"));
        }

        Ok(())
    }
}
