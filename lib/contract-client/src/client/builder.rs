use std::fmt::Debug;

use http::Uri;
use http::uri::{PathAndQuery, Scheme};
use url::Url;

use super::transport::{ReqwestTransport, Transport};
use super::{ApiClient, ApiClientError};

/// Builder for creating `ApiClient` instances.
///
/// The base URL of the client is either composed from a scheme, a host, a port and a base
/// path, or given as a whole with [`with_base_url`](Self::with_base_url).
///
/// # Default Configuration
///
/// - **Scheme**: HTTP (use `with_scheme()` to change to HTTPS)
/// - **Host**: 127.0.0.1 (localhost)
/// - **Port**: 80 (standard HTTP port)
/// - **Base path**: None (operation paths are appended to the root)
/// - **Transport**: [`ReqwestTransport`] with a default [`reqwest::Client`]
///
/// # Example
///
/// ```rust
/// use contract_client::ApiClient;
/// use http::uri::Scheme;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_scheme(Scheme::HTTPS)
///     .with_host("api.example.com")
///     .with_port(443)
///     .with_base_path("/v1")?
///     .build()?;
///
/// assert_eq!(client.base_url(), "https://api.example.com:443/v1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder<T = ReqwestTransport> {
    transport: T,
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: Option<PathAndQuery>,
    base_url: Option<Url>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            transport: ReqwestTransport::default(),
            scheme: Scheme::HTTP,
            host: "127.0.0.1".to_string(),
            port: 80,
            base_path: None,
            base_url: None,
        }
    }
}

impl ApiClientBuilder {
    /// Uses the given reqwest client for the default transport.
    ///
    /// Timeouts, proxies, TLS, and connection pooling are configured on the client.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use contract_client::ApiClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let http_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(5))
    ///     .build()?;
    ///
    /// let client = ApiClient::builder()
    ///     .with_client(http_client)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.transport = ReqwestTransport::new(client);
        self
    }
}

impl<T> ApiClientBuilder<T>
where
    T: Transport,
{
    /// Builds the final `ApiClient` instance.
    ///
    /// The trailing `/` of the base URL is removed, operation paths are appended to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URI cannot be constructed from the provided scheme,
    /// host, port, and base path.
    pub fn build(self) -> Result<ApiClient<T>, ApiClientError> {
        let Self {
            transport,
            scheme,
            host,
            port,
            base_path,
            base_url,
        } = self;

        let base_url = if let Some(url) = base_url {
            url.to_string()
        } else {
            let builder = Uri::builder()
                .scheme(scheme)
                .authority(format!("{host}:{port}"));
            let builder = if let Some(path) = &base_path {
                builder.path_and_query(path.path())
            } else {
                builder.path_and_query("/")
            };
            builder.build()?.to_string()
        };

        Ok(ApiClient {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sets the HTTP scheme (protocol) for the API client.
    ///
    /// If not specified, defaults to `Scheme::HTTP`.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the hostname for the API client.
    ///
    /// If not specified, defaults to `"127.0.0.1"` (localhost).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port number for the API client.
    ///
    /// If not specified, defaults to `80` (standard HTTP port).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the base path prepended to all operation paths.
    ///
    /// ```rust
    /// use contract_client::ApiClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::builder()
    ///     .with_base_path("/services/user-api/v1")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::InvalidBasePath` if the path contains invalid characters
    /// (such as spaces) or cannot be parsed as a valid URI path.
    pub fn with_base_path<P>(mut self, base_path: P) -> Result<Self, ApiClientError>
    where
        P: TryInto<PathAndQuery>,
        P::Error: Debug + 'static,
    {
        let base_path = base_path
            .try_into()
            .map_err(|err| ApiClientError::InvalidBasePath {
                error: format!("{err:?}"),
            })?;
        self.base_path = Some(base_path);
        Ok(self)
    }

    /// Sets the whole base URL, taking precedence over scheme, host, port, and base path.
    ///
    /// ```rust
    /// use contract_client::ApiClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::builder()
    ///     .with_base_url("https://petstore.example.com/api/")?
    ///     .build()?;
    ///
    /// assert_eq!(client.base_url(), "https://petstore.example.com/api");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::UrlError` if the URL cannot be parsed.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiClientError> {
        self.base_url = Some(base_url.parse()?);
        Ok(self)
    }

    /// Replaces the transport, e.g. with an in-memory one for tests.
    pub fn with_transport<U>(self, transport: U) -> ApiClientBuilder<U>
    where
        U: Transport,
    {
        let Self {
            transport: _,
            scheme,
            host,
            port,
            base_path,
            base_url,
        } = self;

        ApiClientBuilder {
            transport,
            scheme,
            host,
            port,
            base_path,
            base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_values() {
        let client = ApiClient::builder().build().expect("should build");

        insta::assert_snapshot!(client.base_url(), @"http://127.0.0.1:80");
    }

    #[test]
    fn test_build_with_custom_values() {
        let client = ApiClient::builder()
            .with_scheme(Scheme::HTTPS)
            .with_host("api.example.com")
            .with_port(8443)
            .with_base_path("/api/v1/")
            .expect("valid base path")
            .build()
            .expect("should build");

        insta::assert_snapshot!(client.base_url(), @"https://api.example.com:8443/api/v1");
    }

    #[test]
    fn test_build_with_invalid_base_path() {
        let result = ApiClient::builder().with_base_path("invalid path with spaces");

        let error = result.expect_err("should fail");
        assert!(matches!(error, ApiClientError::InvalidBasePath { .. }));
    }

    #[test]
    fn test_base_url_takes_precedence() {
        let client = ApiClient::builder()
            .with_host("ignored.example.com")
            .with_base_url("http://localhost:8080/petstore/")
            .expect("valid base url")
            .build()
            .expect("should build");

        insta::assert_snapshot!(client.base_url(), @"http://localhost:8080/petstore");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::builder().with_base_url("not a url");

        let error = result.expect_err("should fail");
        assert!(matches!(error, ApiClientError::UrlError(_)));
    }
}
