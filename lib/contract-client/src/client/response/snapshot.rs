use http::{HeaderMap, StatusCode};

use crate::client::request::HttpRequest;

/// Diagnostic snapshot of a request: URL, method, and headers as transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrespondingRequest {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
}

impl CorrespondingRequest {
    /// Creates a snapshot.
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers,
        }
    }

    /// The request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request headers, in transmission order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The first value of a header, the name is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(in crate::client) fn push_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

impl From<&reqwest::Request> for CorrespondingRequest {
    fn from(request: &reqwest::Request) -> Self {
        Self::new(
            request.url().as_str(),
            request.method().as_str(),
            header_pairs(request.headers()),
        )
    }
}

impl From<&HttpRequest> for CorrespondingRequest {
    fn from(request: &HttpRequest) -> Self {
        let mut result = Self::new(
            request.url.as_str(),
            request.method.as_str(),
            header_pairs(&request.headers),
        );
        if let Some(body) = &request.body {
            result.push_header("content-type", body.content_type.as_ref());
            result.push_header("content-length", &body.data.len().to_string());
        }
        result
    }
}

/// Diagnostic snapshot of a response whose body could not be read.
#[derive(Debug, Clone)]
pub struct IncompleteResponse {
    request: CorrespondingRequest,
    status: StatusCode,
    reason: Option<String>,
    content_type: Option<String>,
    headers: HeaderMap,
}

impl IncompleteResponse {
    pub(in crate::client) fn new(
        request: CorrespondingRequest,
        status: StatusCode,
        reason: Option<String>,
        content_type: Option<String>,
        headers: HeaderMap,
    ) -> Self {
        Self {
            request,
            status,
            reason,
            content_type,
            headers,
        }
    }

    /// The request this response answers.
    pub fn request(&self) -> &CorrespondingRequest {
        &self.request
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// The reason phrase sent by the server, or the canonical one of the status code.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// The raw `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
