use std::future::Future;

use headers::HeaderMapExt;
use http::header::{ACCEPT, HOST};
use http::{HeaderMap, HeaderValue};
use reqwest::{Body, Request, Url};
use tracing::debug;

use super::ApiClientError;
use super::request::HttpRequest;
use super::response::CorrespondingRequest;

/// Failure of a [`Transport`] to execute a request.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// The reqwest client failed (connection refused, reset, timeout, ...).
    Reqwest(reqwest::Error),
    /// Any other I/O failure, mostly raised by custom transports.
    Io(std::io::Error),
}

/// Records the request as it is actually put on the wire.
///
/// A capture lives for a single call. The transport records the final request, including
/// the headers it adds itself, so that diagnostics show what the server really received.
/// When nothing is recorded, the assembled request is used instead.
#[derive(Debug, Default)]
pub struct RequestCapture {
    request: Option<CorrespondingRequest>,
}

impl RequestCapture {
    /// Records the final reqwest request.
    pub fn record(&mut self, request: &Request) {
        self.request = Some(CorrespondingRequest::from(request));
    }

    /// Records an already built snapshot, for transports not based on reqwest.
    pub fn record_snapshot(&mut self, request: CorrespondingRequest) {
        self.request = Some(request);
    }

    /// The recorded request, if any.
    pub fn captured(&self) -> Option<&CorrespondingRequest> {
        self.request.as_ref()
    }

    fn take(&mut self) -> Option<CorrespondingRequest> {
        self.request.take()
    }
}

/// Sends a request and returns the response with its body still unread.
///
/// The default implementation is [`ReqwestTransport`]; tests usually provide an in-memory one.
pub trait Transport: Send + Sync {
    /// Sends the request.
    ///
    /// Implementations should [`record`](RequestCapture::record) the final request
    /// before sending it.
    fn send(
        &self,
        request: HttpRequest,
        capture: &mut RequestCapture,
    ) -> impl Future<Output = Result<reqwest::Response, TransportError>> + Send;
}

/// A [`Transport`] backed by a [`reqwest::Client`].
///
/// The transport sets the `Host` header, its default headers, and `Accept: */*` when the
/// request has no `Accept`, so that the recorded request matches what is transmitted.
/// Default headers configured on the [`reqwest::Client`] itself are not visible here,
/// prefer [`with_default_headers`](Self::with_default_headers).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    default_headers: HeaderMap,
}

impl ReqwestTransport {
    /// Creates a transport using the given client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            default_headers: HeaderMap::new(),
        }
    }

    /// Adds headers sent with every request, unless the request sets them itself.
    #[must_use]
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// The underlying client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The headers sent with every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    fn build_request(&self, request: HttpRequest) -> Request {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut result = Request::new(method, url);
        *result.headers_mut() = headers;

        if let Some(body) = body {
            let req_headers = result.headers_mut();
            req_headers.typed_insert(headers::ContentType::from(body.content_type));
            req_headers.typed_insert(headers::ContentLength(body.data.len() as u64));
            *result.body_mut() = Some(Body::from(body.data));
        }

        let req_headers = result.headers_mut();
        for name in self.default_headers.keys() {
            if !req_headers.contains_key(name) {
                for value in self.default_headers.get_all(name) {
                    req_headers.append(name, value.clone());
                }
            }
        }
        if !req_headers.contains_key(ACCEPT) {
            req_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        }
        if let Some(host) = host_header(result.url()) {
            result.headers_mut().entry(HOST).or_insert(host);
        }

        result
    }
}

/// The `Host` header the HTTP/1 client would derive from the URL.
fn host_header(url: &Url) -> Option<HeaderValue> {
    let host = url.host_str()?;
    let host = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    HeaderValue::from_str(&host).ok()
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        capture: &mut RequestCapture,
    ) -> Result<reqwest::Response, TransportError> {
        let request = self.build_request(request);
        capture.record(&request);
        let response = self.client.execute(request).await?;
        Ok(response)
    }
}

/// A response received for a request, the body still unread.
#[derive(Debug)]
pub(in crate::client) struct Exchange {
    pub(in crate::client) request: CorrespondingRequest,
    pub(in crate::client) response: reqwest::Response,
}

/// Sends the request with a fresh capture.
pub(in crate::client) async fn invoke<T>(
    transport: &T,
    request: HttpRequest,
) -> Result<Exchange, ApiClientError>
where
    T: Transport,
{
    let assembled = CorrespondingRequest::from(&request);
    let mut capture = RequestCapture::default();

    debug!(?request, "sending...");
    let result = transport.send(request, &mut capture).await;
    let request = capture.take().unwrap_or(assembled);

    match result {
        Ok(response) => {
            debug!(?response, "...receiving");
            Ok(Exchange { request, response })
        }
        Err(source) => {
            debug!(%source, url = request.url(), "transport failure");
            Err(ApiClientError::Transport { request, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use http::{HeaderMap, HeaderValue, Method};

    use super::*;
    use crate::client::request::HttpBody;

    fn post_pet() -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.append(http::header::ACCEPT, HeaderValue::from_static("application/json"));
        HttpRequest {
            method: Method::POST,
            url: "http://localhost:8080/pets".parse().expect("valid url"),
            headers,
            body: Some(HttpBody {
                content_type: mime::APPLICATION_JSON,
                data: bytes::Bytes::from_static(br#"{"name":"Rex"}"#),
            }),
        }
    }

    struct FailingTransport {
        record: bool,
    }

    impl Transport for FailingTransport {
        async fn send(
            &self,
            request: HttpRequest,
            capture: &mut RequestCapture,
        ) -> Result<reqwest::Response, TransportError> {
            if self.record {
                let mut snapshot = CorrespondingRequest::from(&request);
                snapshot.push_header("x-wire", "recorded");
                capture.record_snapshot(snapshot);
            }
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset").into())
        }
    }

    #[test]
    fn test_reqwest_request_carries_body_headers() {
        let request = ReqwestTransport::default().build_request(post_pet());

        let mut capture = RequestCapture::default();
        capture.record(&request);

        let captured = capture.captured().expect("recorded");
        insta::assert_debug_snapshot!(captured.headers(), @r#"
        [
            (
                "accept",
                "application/json",
            ),
            (
                "content-type",
                "application/json",
            ),
            (
                "content-length",
                "14",
            ),
            (
                "host",
                "localhost:8080",
            ),
        ]
        "#);
        assert_eq!(captured.method(), "POST");
    }

    #[test]
    fn test_reqwest_request_carries_default_headers() {
        let mut defaults = HeaderMap::new();
        defaults.insert("x-tenant", HeaderValue::from_static("acme"));
        defaults.insert(ACCEPT, HeaderValue::from_static("text/html"));
        let transport = ReqwestTransport::default().with_default_headers(defaults);
        let mut get_pet = post_pet();
        get_pet.method = Method::GET;
        get_pet.url = "https://pets.example.com/pets/1".parse().expect("valid url");
        get_pet.headers.clear();
        get_pet.body = None;

        let request = transport.build_request(get_pet);

        let captured = CorrespondingRequest::from(&request);
        insta::assert_debug_snapshot!(captured.headers(), @r#"
        [
            (
                "x-tenant",
                "acme",
            ),
            (
                "accept",
                "text/html",
            ),
            (
                "host",
                "pets.example.com",
            ),
        ]
        "#);
    }

    #[test]
    fn test_request_headers_take_precedence_over_defaults() {
        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("text/html"));
        let transport = ReqwestTransport::default().with_default_headers(defaults);

        let request = transport.build_request(post_pet());

        let accept = request.headers().get_all(ACCEPT).iter().collect::<Vec<_>>();
        assert_eq!(accept, vec!["application/json"]);
    }

    #[test]
    fn test_reqwest_request_defaults_accept_to_any() {
        let mut request = post_pet();
        request.headers.clear();

        let request = ReqwestTransport::default().build_request(request);

        assert_eq!(request.headers().get(ACCEPT), Some(&HeaderValue::from_static("*/*")));
    }

    #[tokio::test]
    async fn test_invoke_failure_falls_back_to_assembled_request() {
        let transport = FailingTransport { record: false };

        let error = invoke(&transport, post_pet())
            .await
            .expect_err("should fail");

        assert!(error.is_io());
        let request = error.corresponding_request().expect("request snapshot");
        assert_eq!(request.url(), "http://localhost:8080/pets");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("x-wire"), None);
        insta::assert_snapshot!(error, @"Error executing request POST http://localhost:8080/pets: connection reset");
    }

    #[tokio::test]
    async fn test_invoke_failure_prefers_captured_request() {
        let transport = FailingTransport { record: true };

        let error = invoke(&transport, post_pet())
            .await
            .expect_err("should fail");

        let request = error.corresponding_request().expect("request snapshot");
        assert_eq!(request.header("X-Wire"), Some("recorded"));
    }
}
