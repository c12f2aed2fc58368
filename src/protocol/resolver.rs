//! Host resolution: mapping a root resource to the base URL serving it.

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::clients::BoxError;
use crate::config::HostUrl;

/// Resolves the base URL (scheme, host, port and context path) that serves a
/// root resource.
///
/// `query` is the request's path and query as a URL against a placeholder
/// origin; only its path and query are meaningful. Resolvers may use them
/// for routing decisions.
///
/// Any `Fn(&str, &Url) -> Result<Url, BoxError>` closure is a resolver.
pub trait HostnameResolver: Send + Sync {
    /// Returns the base URL for `root_resource`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is known for the resource.
    fn resolve_hostname_and_context_for_query(
        &self,
        root_resource: &str,
        query: &Url,
    ) -> Result<Url, BoxError>;
}

impl<F> HostnameResolver for F
where
    F: Fn(&str, &Url) -> Result<Url, BoxError> + Send + Sync,
{
    fn resolve_hostname_and_context_for_query(
        &self,
        root_resource: &str,
        query: &Url,
    ) -> Result<Url, BoxError> {
        self(root_resource, query)
    }
}

/// Resolves every resource to the same base URL.
///
/// # Example
///
/// ```rust
/// use restli_client::{HostUrl, HostnameResolver, SimpleHostnameResolver};
///
/// let resolver = SimpleHostnameResolver::new(HostUrl::new("https://api.example.com").unwrap());
/// let query = url::Url::parse("restli://resource/widgets/1").unwrap();
/// let base = resolver
///     .resolve_hostname_and_context_for_query("widgets", &query)
///     .unwrap();
/// assert_eq!(base.as_str(), "https://api.example.com/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleHostnameResolver {
    host: HostUrl,
}

impl SimpleHostnameResolver {
    /// Creates a resolver that always answers `host`.
    #[must_use]
    pub const fn new(host: HostUrl) -> Self {
        Self { host }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn host(&self) -> &HostUrl {
        &self.host
    }
}

impl HostnameResolver for SimpleHostnameResolver {
    fn resolve_hostname_and_context_for_query(
        &self,
        _root_resource: &str,
        _query: &Url,
    ) -> Result<Url, BoxError> {
        Ok(self.host.as_url().clone())
    }
}

/// Error returned when a [`StaticHostnameResolver`] has no route for a resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("No host is configured for root resource '{root_resource}'.")]
pub struct UnknownResourceError {
    /// The resource that could not be routed.
    pub root_resource: String,
}

/// Resolves resources from a fixed routing table with an optional fallback.
///
/// # Example
///
/// ```rust
/// use restli_client::{HostUrl, StaticHostnameResolver};
///
/// let resolver = StaticHostnameResolver::new()
///     .route("billing", HostUrl::new("https://billing.example.com").unwrap())
///     .fallback(HostUrl::new("https://api.example.com/gateway").unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticHostnameResolver {
    routes: HashMap<String, HostUrl>,
    fallback: Option<HostUrl>,
}

impl StaticHostnameResolver {
    /// Creates a resolver with no routes and no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `root_resource` to `host`.
    #[must_use]
    pub fn route(mut self, root_resource: impl Into<String>, host: HostUrl) -> Self {
        self.routes.insert(root_resource.into(), host);
        self
    }

    /// Sets the base URL used for resources without a route.
    #[must_use]
    pub fn fallback(mut self, host: HostUrl) -> Self {
        self.fallback = Some(host);
        self
    }
}

impl HostnameResolver for StaticHostnameResolver {
    fn resolve_hostname_and_context_for_query(
        &self,
        root_resource: &str,
        _query: &Url,
    ) -> Result<Url, BoxError> {
        self.routes
            .get(root_resource)
            .or(self.fallback.as_ref())
            .map(|host| host.as_url().clone())
            .ok_or_else(|| {
                UnknownResourceError {
                    root_resource: root_resource.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> Url {
        Url::parse("restli://resource/widgets/1").unwrap()
    }

    #[test]
    fn test_simple_resolver_ignores_resource() {
        let resolver = SimpleHostnameResolver::new(HostUrl::new("https://a.example.com/ctx").unwrap());
        let base = resolver
            .resolve_hostname_and_context_for_query("anything", &query())
            .unwrap();
        assert_eq!(base.as_str(), "https://a.example.com/ctx");
    }

    #[test]
    fn test_static_resolver_prefers_route_over_fallback() {
        let resolver = StaticHostnameResolver::new()
            .route("widgets", HostUrl::new("https://widgets.example.com").unwrap())
            .fallback(HostUrl::new("https://api.example.com").unwrap());

        let routed = resolver
            .resolve_hostname_and_context_for_query("widgets", &query())
            .unwrap();
        assert_eq!(routed.host_str(), Some("widgets.example.com"));

        let fallback = resolver
            .resolve_hostname_and_context_for_query("gadgets", &query())
            .unwrap();
        assert_eq!(fallback.host_str(), Some("api.example.com"));
    }

    #[test]
    fn test_static_resolver_without_route_fails() {
        let resolver = StaticHostnameResolver::new();
        let error = resolver
            .resolve_hostname_and_context_for_query("widgets", &query())
            .unwrap_err();

        let error = error.downcast_ref::<UnknownResourceError>().unwrap();
        assert_eq!(error.root_resource, "widgets");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |root: &str, _: &Url| -> Result<Url, BoxError> {
            Ok(Url::parse(&format!("https://{root}.example.com"))?)
        };
        let base = resolver
            .resolve_hostname_and_context_for_query("widgets", &query())
            .unwrap();
        assert_eq!(base.as_str(), "https://widgets.example.com/");
    }
}
