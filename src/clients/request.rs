//! Request constructors.
//!
//! Every constructor resolves the URL through
//! [`RestLiClient::format_query_url`], sets the rest.li protocol headers and
//! `Accept: application/json`, and applies the call's [`RequestContext`].
//! Constructors that send a payload serialize it through a
//! [`CompactJsonWriter`], dropping the excluded fields, and set
//! `Content-Type` and `Content-Length`.

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::{Body, Method};

use crate::clients::client::RestLiClient;
use crate::clients::errors::ClientError;
use crate::clients::transport::Transport;
use crate::codec::{CompactJsonWriter, Marshaler, PathSpec};
use crate::protocol::{
    Query, QueryParams, ResourcePath, RestLiMethod, HEADER_METHOD, HEADER_PROTOCOL_VERSION,
    RESTLI_PROTOCOL_VERSION,
};

const APPLICATION_JSON: &str = "application/json";

/// Per-call settings.
///
/// Cancellation needs no setting: dropping the future of a call cancels it.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use restli_client::RequestContext;
///
/// let ctx = RequestContext::new().with_timeout(Duration::from_secs(2));
/// assert_eq!(ctx.timeout(), Some(Duration::from_secs(2)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    timeout: Option<Duration>,
}

impl RequestContext {
    /// A context with no per-call settings; the client defaults apply.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Sets the deadline for the whole call, from send to the end of the body.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the per-call timeout, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl<T: Transport> RestLiClient<T> {
    fn new_request<R>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        query: Query<'_>,
        http_method: Method,
        method: RestLiMethod,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
    {
        let url = self.format_query_url(rp, query)?;
        let mut request = reqwest::Request::new(http_method, url);

        let headers = request.headers_mut();
        headers.insert(
            HEADER_PROTOCOL_VERSION,
            HeaderValue::from_static(RESTLI_PROTOCOL_VERSION),
        );
        headers.insert(HEADER_METHOD, HeaderValue::from_static(method.as_str()));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(USER_AGENT, self.user_agent().clone());

        *request.timeout_mut() = ctx.timeout().or_else(|| self.config().timeout());
        Ok(request)
    }

    /// Creates a GET request with no body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] if the URL cannot be built.
    pub fn new_get_request<R>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        query: Query<'_>,
        method: RestLiMethod,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
    {
        self.new_request(ctx, rp, query, Method::GET, method)
    }

    /// Creates a DELETE request with no body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] if the URL cannot be built.
    pub fn new_delete_request<R>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        query: Query<'_>,
        method: RestLiMethod,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
    {
        self.new_request(ctx, rp, query, Method::DELETE, method)
    }

    /// Creates a POST request whose body is `create` without its read-only fields.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encode`] if the payload cannot be serialized and
    /// [`ClientError::Url`] if the URL cannot be built.
    pub fn new_create_request<R, M>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        query: Query<'_>,
        method: RestLiMethod,
        create: &M,
        read_only_fields: &PathSpec,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
        M: Marshaler + ?Sized,
    {
        self.new_json_request(ctx, rp, query, Method::POST, method, create, read_only_fields)
    }

    /// Creates a request with the given verb whose body is `contents`
    /// without the `excluded_fields`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encode`] if the payload cannot be serialized and
    /// [`ClientError::Url`] if the URL cannot be built.
    #[allow(clippy::too_many_arguments)]
    pub fn new_json_request<R, M>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        query: Query<'_>,
        http_method: Method,
        method: RestLiMethod,
        contents: &M,
        excluded_fields: &PathSpec,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
        M: Marshaler + ?Sized,
    {
        let mut writer = CompactJsonWriter::with_excluded_fields(excluded_fields.clone());
        contents.marshal_rest_li(writer.writer())?;
        let size = writer.size();

        let mut request = self.new_request(ctx, rp, query, http_method, method)?;
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
        *request.body_mut() = Some(Body::from(writer.finish()));
        Ok(request)
    }

    /// Creates the POST request of an action (`?action=<name>`) whose body
    /// holds the action parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encode`] if the parameters cannot be serialized
    /// and [`ClientError::Url`] if the URL cannot be built.
    pub fn new_action_request<R, M>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        action: &str,
        params: &M,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
        M: Marshaler + ?Sized,
    {
        self.new_json_request(
            ctx,
            rp,
            Query::Action(action),
            Method::POST,
            RestLiMethod::Action,
            params,
            &PathSpec::empty(),
        )
    }

    /// Creates the GET request of a finder (`q=<finder>` plus `params`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] if the URL cannot be built.
    pub fn new_finder_request<R>(
        &self,
        ctx: &RequestContext,
        rp: &R,
        finder: &str,
        params: QueryParams,
    ) -> Result<reqwest::Request, ClientError>
    where
        R: ResourcePath + ?Sized,
    {
        let params = params.finder(finder);
        self.new_request(ctx, rp, Query::Params(&params), Method::GET, RestLiMethod::Finder)
    }
}
