//! The rest.li client: URL construction and the response pipeline.
//!
//! Generated per-resource clients build a request with one of the
//! `new_*_request` constructors and hand it to one of the pipeline entry
//! points:
//!
//! - [`RestLiClient::execute`]: send and classify (application error or not)
//! - [`RestLiClient::do_and_unmarshal`]: send, enforce the protocol version,
//!   read the body and decode it with a caller-supplied function
//! - [`RestLiClient::do_and_decode`]: same, for an [`Unmarshaler`] type
//! - [`RestLiClient::do_and_ignore`]: send, enforce the version, discard the body
//!
//! Every path that receives a body reads it to the end and closes it exactly
//! once, so the connection goes back to the pool.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use crate::clients::errors::{
    ClientError, TransportError, TransportOp, UnsupportedProtocolVersionError, UrlError,
};
use crate::clients::response::RestLiResponse;
use crate::clients::restli_error::RestLiError;
use crate::clients::transport::{ReqwestTransport, ResponseBody, Transport, TransportResponse};
use crate::codec::{
    decode_tree, parse_json, unmarshal_json, DecodeError, Encoding, GenericUnmarshaler, Reader,
    Unmarshaler,
};
use crate::config::{ClientConfig, HostUrl};
use crate::error::ConfigError;
use crate::protocol::{
    check_path, HostnameResolver, Query, ResourcePath, SimpleHostnameResolver,
    HEADER_ERROR_RESPONSE, HEADER_PROTOCOL_VERSION, RESTLI_PROTOCOL_VERSION,
};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

// Relative references are parsed against this origin; only path and query
// of the result are used.
const PLACEHOLDER_ORIGIN: &str = "restli://resource/";

/// A rest.li client.
///
/// Holds the transport, the hostname resolver and the [`ClientConfig`]. It is
/// immutable after construction and holds no per-call state, so one client
/// can serve any number of concurrent calls.
///
/// # Example
///
/// ```rust
/// use restli_client::{ClientConfig, HostUrl, RestLiClient};
///
/// let client = RestLiClient::builder()
///     .host(HostUrl::new("https://api.example.com/gateway").unwrap())
///     .config(ClientConfig::builder().strict_response_deserialization(true).build().unwrap())
///     .build()
///     .unwrap();
///
/// assert!(client.config().strict_response_deserialization());
/// ```
pub struct RestLiClient<T = ReqwestTransport> {
    transport: T,
    resolver: Arc<dyn HostnameResolver>,
    config: ClientConfig,
    user_agent: HeaderValue,
}

// Verify RestLiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestLiClient>();
};

impl<T> std::fmt::Debug for RestLiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestLiClient")
            .field("config", &self.config)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl RestLiClient<ReqwestTransport> {
    /// Creates a builder that uses the default reqwest transport.
    #[must_use]
    pub fn builder() -> RestLiClientBuilder<ReqwestTransport> {
        RestLiClientBuilder {
            transport: ReqwestTransport::new(),
            resolver: None,
            config: ClientConfig::default(),
        }
    }
}

impl<T: Transport> RestLiClient<T> {
    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) const fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }

    /// Builds the absolute URL of a request.
    ///
    /// The base URL comes from the hostname resolver. When the base URL's
    /// path already ends in (or contains as a full segment) the root
    /// resource, the path is cut before it so the resource name is not
    /// repeated:
    ///
    /// | Base URL | Resource path | Result |
    /// |---|---|---|
    /// | `https://h` | `/widgets/1` | `https://h/widgets/1` |
    /// | `https://h/gateway` | `/widgets/1` | `https://h/gateway/widgets/1` |
    /// | `https://h/gateway/widgets` | `/widgets/1` | `https://h/gateway/widgets/1` |
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if the path or query cannot be encoded, the path
    /// holds a `.` or `..` segment, the resolver fails, or the result is not
    /// a valid URL.
    pub fn format_query_url<R>(&self, rp: &R, query: Query<'_>) -> Result<Url, UrlError>
    where
        R: ResourcePath + ?Sized,
    {
        let mut path = rp.resource_path().map_err(UrlError::ResourcePath)?;
        check_path(&path).map_err(UrlError::ResourcePath)?;
        if let Some(params) = query.encode().map_err(UrlError::Query)? {
            path.push('?');
            path.push_str(&params);
        }

        let parse_error = |url: &str| {
            let url = url.to_string();
            move |source| UrlError::Parse { url, source }
        };
        let origin = Url::parse(PLACEHOLDER_ORIGIN).map_err(parse_error(PLACEHOLDER_ORIGIN))?;
        let relative = origin.join(&path).map_err(parse_error(&path))?;

        let root = rp.root_resource();
        let base = self
            .resolver
            .resolve_hostname_and_context_for_query(root, &relative)
            .map_err(|source| UrlError::Resolver {
                root_resource: root.to_string(),
                source,
            })?;

        let request_uri = match relative.query() {
            Some(query) => format!("{}?{query}", relative.path()),
            None => relative.path().to_string(),
        };

        let base_path = base.path();
        let base_path = base_path.strip_prefix('/').unwrap_or(base_path);
        let base_path = base_path.strip_suffix('/').unwrap_or(base_path);
        let mut resolved_path = format!("/{base_path}");

        if resolved_path == "/" {
            return base.join(&request_uri).map_err(parse_error(&request_uri));
        }

        let segment = format!("/{root}");
        if let Some(index) = resolved_path.find(&segment) {
            let end = index + segment.len();
            if end == resolved_path.len() || resolved_path.as_bytes()[end] == b'/' {
                resolved_path.truncate(index);
            }
        }

        let target = format!("{resolved_path}{request_uri}");
        base.join(&target).map_err(parse_error(&target))
    }

    /// Sends a request and classifies the response.
    ///
    /// If the response carries `X-RestLi-Error-Response`, its body is read,
    /// closed and decoded, and the call fails with
    /// [`ClientError::Application`]. Otherwise the response is returned with
    /// its body unread; the caller must read and close it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if sending fails and
    /// [`ClientError::Application`] for server-flagged errors.
    pub async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<TransportResponse<T::Body>, ClientError> {
        let url = request.url().to_string();
        tracing::debug!("Sending {} request to {}", request.method(), url);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| TransportError::new(TransportOp::Send, &url, source))?;

        if !response.headers.contains_key(HEADER_ERROR_RESPONSE) {
            return Ok(response);
        }

        let TransportResponse { status, body, .. } = response;
        let data = read_and_close(body, &url).await?;
        let error = decode_error_response(status, &data);
        tracing::warn!(
            "rest.li error response from {}: status {}, message {:?}",
            url,
            error.status,
            error.message
        );
        Err(ClientError::Application(error))
    }

    /// Sends a request, checks the protocol version and reads the body.
    async fn fetch(&self, request: reqwest::Request) -> Result<RawResponse, ClientError> {
        let url = request.url().to_string();
        let TransportResponse {
            status,
            headers,
            body,
        } = self.execute(request).await?;

        let version = headers.get(HEADER_PROTOCOL_VERSION);
        if version.map(HeaderValue::as_bytes) != Some(RESTLI_PROTOCOL_VERSION.as_bytes()) {
            let version = version.map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
            tracing::warn!(
                "Unsupported rest.li protocol version {:?} from {}",
                version,
                url
            );
            // The body is drained for connection reuse but never decoded.
            if let Err(error) = read_and_close(body, &url).await {
                tracing::debug!("Failed to drain response body: {}", error);
            }
            return Err(UnsupportedProtocolVersionError { version }.into());
        }

        let data = read_and_close(body, &url).await?;
        Ok(RawResponse {
            status,
            headers,
            data,
        })
    }

    /// Sends a request and decodes the body with `unmarshal`.
    ///
    /// `unmarshal` is any closure or a plain [`GenericUnmarshaler`] function.
    ///
    /// Missing required fields are tolerated unless
    /// [`ClientConfig::strict_response_deserialization`] is set, in which
    /// case the call fails with [`ClientError::MissingRequiredFields`]; the
    /// partially decoded value is available through
    /// [`MissingRequiredFieldsError::partial_value`](crate::codec::MissingRequiredFieldsError::partial_value).
    ///
    /// # Errors
    ///
    /// Returns any [`ClientError`]: transport, application, protocol version,
    /// decode, or (strict mode) missing required fields.
    pub async fn do_and_unmarshal<V, F>(
        &self,
        request: reqwest::Request,
        unmarshal: F,
    ) -> Result<RestLiResponse<V>, ClientError>
    where
        V: Send + Sync + 'static,
        F: FnOnce(Reader<'_>) -> Result<V, DecodeError> + Send,
    {
        let raw = self.fetch(request).await?;
        let tree = parse_json(&raw.data)?;
        let decoded = decode_tree(&tree, Encoding::Json, unmarshal)?;

        let value = if self.config.strict_response_deserialization() {
            decoded.strict()?
        } else {
            if !decoded.is_complete() {
                tracing::debug!(
                    "Ignoring missing required fields in response: {}",
                    decoded.missing_fields.join(", ")
                );
            }
            decoded.value
        };

        Ok(RestLiResponse {
            value,
            status: raw.status,
            headers: raw.headers,
        })
    }

    /// Sends a request and decodes the body as `V`.
    ///
    /// # Errors
    ///
    /// Same as [`do_and_unmarshal`](Self::do_and_unmarshal).
    pub async fn do_and_decode<V>(
        &self,
        request: reqwest::Request,
    ) -> Result<RestLiResponse<V>, ClientError>
    where
        V: Unmarshaler + Send + Sync + 'static,
    {
        let unmarshal: GenericUnmarshaler<V> = V::unmarshal_rest_li;
        self.do_and_unmarshal(request, unmarshal).await
    }

    /// Sends a request and discards the body.
    ///
    /// # Errors
    ///
    /// Returns transport, application and protocol version errors.
    pub async fn do_and_ignore(
        &self,
        request: reqwest::Request,
    ) -> Result<RestLiResponse<()>, ClientError> {
        let raw = self.fetch(request).await?;
        Ok(RestLiResponse {
            value: (),
            status: raw.status,
            headers: raw.headers,
        })
    }
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    data: Bytes,
}

/// Reads `body` to the end and closes it, closing it even if the read fails.
async fn read_and_close<B: ResponseBody>(mut body: B, url: &str) -> Result<Bytes, ClientError> {
    let read = body.read_to_end().await;
    let closed = body.close();

    let data = read.map_err(|source| TransportError::new(TransportOp::Read, url, source))?;
    closed.map_err(|source| TransportError::new(TransportOp::Close, url, source))?;
    Ok(data)
}

fn decode_error_response(status: StatusCode, data: &[u8]) -> RestLiError {
    match unmarshal_json::<RestLiError>(data) {
        Ok(decoded) => {
            let mut error = decoded.value;
            if !decoded.missing_fields.is_empty() {
                error.status = i32::from(status.as_u16());
            }
            error
        }
        Err(e) => {
            tracing::debug!("Undecodable rest.li error body: {}", e);
            RestLiError {
                status: i32::from(status.as_u16()),
                message: Some(String::from_utf8_lossy(data).into_owned()),
                ..RestLiError::default()
            }
        }
    }
}

/// Builder for constructing [`RestLiClient`] instances.
///
/// A hostname resolver is required; set it with
/// [`resolver`](Self::resolver) or [`host`](Self::host).
pub struct RestLiClientBuilder<T> {
    transport: Result<T, ConfigError>,
    resolver: Option<Arc<dyn HostnameResolver>>,
    config: ClientConfig,
}

impl<T> std::fmt::Debug for RestLiClientBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestLiClientBuilder")
            .field("has_resolver", &self.resolver.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RestLiClientBuilder<T> {
    /// Sets the hostname resolver (required).
    #[must_use]
    pub fn resolver(mut self, resolver: impl HostnameResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Uses one base URL for every resource.
    #[must_use]
    pub fn host(self, host: HostUrl) -> Self {
        self.resolver(SimpleHostnameResolver::new(host))
    }

    /// Sets the client configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the transport.
    #[must_use]
    pub fn with_transport<U: Transport>(self, transport: U) -> RestLiClientBuilder<U> {
        RestLiClientBuilder {
            transport: Ok(transport),
            resolver: self.resolver,
            config: self.config,
        }
    }

    /// Builds the [`RestLiClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if no resolver is set,
    /// [`ConfigError::HttpClient`] if the default transport could not be
    /// created, and [`ConfigError::InvalidUserAgentPrefix`] if the prefix is
    /// not a valid header value.
    pub fn build(self) -> Result<RestLiClient<T>, ConfigError> {
        let resolver = self
            .resolver
            .ok_or(ConfigError::MissingRequiredField { field: "resolver" })?;
        let transport = self.transport?;

        let user_agent_prefix = self
            .config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}restli-client-rust v{SDK_VERSION}");
        let user_agent =
            HeaderValue::from_str(&user_agent).map_err(|_| ConfigError::InvalidUserAgentPrefix {
                prefix: self.config.user_agent_prefix().unwrap_or_default().to_string(),
            })?;

        Ok(RestLiClient {
            transport,
            resolver,
            config: self.config,
            user_agent,
        })
    }
}
