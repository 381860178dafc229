use bytes::Bytes;
use http::header::{ACCEPT, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use mime::Mime;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::io::AsyncReadExt;
use url::Url;

use super::accept::accept_header_value;
use super::media::is_json_media_type;
use super::operation::{BodyEntity, Operation, RequestBody};
use super::ApiClientError;

/// Unreserved characters (RFC 3986) stay readable in path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A concrete request, ready to be handed to a [`Transport`](super::Transport).
///
/// The `Content-Type` header is not part of [`headers`](Self::headers): it belongs to the
/// [`HttpBody`] and is set by the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The absolute URL, path parameters substituted and query parameters appended.
    pub url: Url,
    /// Header parameters followed by the negotiated `Accept` header.
    pub headers: HeaderMap,
    /// The encoded body, if any.
    pub body: Option<HttpBody>,
}

/// An encoded request body tagged with its content type.
#[derive(derive_more::Debug, Clone)]
pub struct HttpBody {
    /// The declared content type.
    pub content_type: Mime,
    /// The encoded bytes.
    #[debug("{} bytes", data.len())]
    pub data: Bytes,
}

impl HttpRequest {
    /// Assembles the request of a validated operation.
    ///
    /// The request body descriptor has been taken out of the operation, as its entity
    /// may be a byte source consumed here.
    pub(in crate::client) async fn assemble(
        base_url: &str,
        operation: &Operation,
        body: Option<RequestBody>,
    ) -> Result<Self, ApiClientError> {
        let url = Self::build_url(base_url, operation)?;
        let headers = Self::build_headers(operation)?;
        let body = match body {
            Some(body) => encode_body(body).await?,
            None => None,
        };

        Ok(Self {
            method: operation.method().clone(),
            url,
            headers,
            body,
        })
    }

    pub(in crate::client) fn build_url(
        base_url: &str,
        operation: &Operation,
    ) -> Result<Url, ApiClientError> {
        let mut path = operation.path().to_string();
        for parameter in operation.path_parameters() {
            // required path parameters are checked by validation
            let value = parameter.serialized_value().unwrap_or_default();
            let placeholder = ["{", parameter.name(), "}"].concat();
            let encoded = utf8_percent_encode(&value, PATH_SEGMENT).to_string();
            path = path.replace(&placeholder, &encoded);
        }

        let mut url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
        .parse::<Url>()?;

        let query = operation
            .query_parameters()
            .filter_map(|parameter| {
                parameter
                    .serialized_value()
                    .map(|value| (parameter.name(), value))
            })
            .collect::<Vec<_>>();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    pub(in crate::client) fn build_headers(
        operation: &Operation,
    ) -> Result<HeaderMap, ApiClientError> {
        let mut headers = HeaderMap::new();

        for parameter in operation.header_parameters() {
            if let Some(value) = parameter.serialized_value() {
                headers.append(
                    HeaderName::from_bytes(parameter.name().as_bytes())?,
                    HeaderValue::from_str(&value)?,
                );
            }
        }

        if let Some(accept) = accept_header_value(operation.accepted_media_types()) {
            headers.append(ACCEPT, HeaderValue::from_str(&accept)?);
        }

        Ok(headers)
    }
}

async fn encode_body(body: RequestBody) -> Result<Option<HttpBody>, ApiClientError> {
    let (content_type, entity) = body.into_parts();
    let Some(entity) = entity else {
        return Ok(None);
    };

    // raw entities are sent as-is, even with a JSON content type
    let data = match entity {
        BodyEntity::Bytes(bytes) => bytes,
        BodyEntity::Reader(mut reader) => {
            let mut buffer = Vec::new();
            reader
                .read_to_end(&mut buffer)
                .await
                .map_err(|source| ApiClientError::BodySerialization { source })?;
            Bytes::from(buffer)
        }
        BodyEntity::Structured(value) if is_json_media_type(&content_type) => {
            serde_json::to_vec(&value)?.into()
        }
        BodyEntity::Text(text) if is_json_media_type(&content_type) => {
            serde_json::to_vec(&text)?.into()
        }
        BodyEntity::Structured(serde_json::Value::String(text)) | BodyEntity::Text(text) => {
            text.into()
        }
        BodyEntity::Structured(value) => value.to_string().into(),
    };

    Ok(Some(HttpBody { content_type, data }))
}
