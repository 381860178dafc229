use super::operation::ParameterLocation;
use super::response::{CorrespondingRequest, IncompleteResponse, UnexpectedResponse};
use super::transport::TransportError;

/// Errors that can occur when executing an operation with the [`ApiClient`](super::ApiClient).
///
/// Three families are covered:
/// - **validation** failures, raised before any network activity ([`is_validation`](Self::is_validation)),
/// - **I/O** failures of the transport or while reading the response body ([`is_io`](Self::is_io)),
///   always carrying a diagnostic snapshot,
/// - assembly and usage errors (invalid URL, header, media type, entity type).
///
/// A response that does not match the contract is *not* an error: it is returned as
/// [`GenericResponse::Unexpected`](super::GenericResponse::Unexpected).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// A required parameter is bound to no value.
    #[display("Parameter '{name}' ({location}) is required but missing")]
    #[from(skip)]
    MissingParameter {
        /// The parameter name.
        name: String,
        /// Where the parameter belongs in the request.
        location: ParameterLocation,
    },

    /// The request body is required but no entity was provided.
    #[display("Request body is required but missing")]
    #[from(skip)]
    MissingRequestBody,

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// Invalid base URI configuration.
    HttpError(http::Error),

    /// A media type declared in the operation cannot be parsed.
    #[display("Invalid media type '{media_type}': {error}")]
    #[from(skip)]
    InvalidMediaType {
        /// The offending media type.
        media_type: String,
        /// The parse error.
        error: mime::FromStrError,
    },

    /// Invalid base path configuration.
    #[display("Invalid base path: {error}")]
    #[from(skip)]
    InvalidBasePath {
        /// Description of why the base path is invalid.
        error: String,
    },

    /// The structured request entity cannot be encoded as JSON.
    JsonEncoding(serde_json::Error),

    /// The request body stream failed while being read into memory.
    #[display("Error serializing request body: {source}")]
    #[from(skip)]
    BodySerialization {
        /// The I/O error raised by the body source.
        source: std::io::Error,
    },

    /// The transport failed to execute the request.
    #[display("Error executing request {} {}: {source}", request.method(), request.url())]
    #[from(skip)]
    Transport {
        /// The request as far as it was transmitted.
        request: CorrespondingRequest,
        /// The transport failure.
        source: TransportError,
    },

    /// The response body could not be read.
    #[display("Error reading response body (status {})", response.status())]
    #[from(skip)]
    ResponseBody {
        /// What was known of the response before the body failed.
        response: Box<IncompleteResponse>,
        /// The read failure.
        source: reqwest::Error,
    },

    /// The response was asserted to be defined, but it does not match the contract.
    #[display("Response is not defined in the contract: {}", response.message())]
    #[from(skip)]
    UndefinedResponse {
        /// The unexpected response.
        response: Box<UnexpectedResponse>,
    },

    /// The entity of a defined response was requested as a different Rust type.
    #[display("Entity of type '{actual}' cannot be read as '{expected}'")]
    #[from(skip)]
    EntityType {
        /// The requested Rust type.
        expected: &'static str,
        /// The Rust type resolved by the contract.
        actual: &'static str,
    },
}

impl ApiClientError {
    /// Returns `true` for contract violations detected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingParameter { .. } | Self::MissingRequestBody)
    }

    /// Returns `true` for transport failures and response body read failures.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ResponseBody { .. })
    }

    /// The request snapshot attached to this error, if any.
    pub fn corresponding_request(&self) -> Option<&CorrespondingRequest> {
        match self {
            Self::Transport { request, .. } => Some(request),
            Self::ResponseBody { response, .. } => Some(response.request()),
            Self::UndefinedResponse { response } => Some(response.request()),
            _ => None,
        }
    }

    /// The partial response attached to a body read failure.
    pub fn incomplete_response(&self) -> Option<&IncompleteResponse> {
        match self {
            Self::ResponseBody { response, .. } => Some(response),
            _ => None,
        }
    }
}
