//! # Contract Client
//!
//! Execute HTTP operations described by an API contract, and classify every response
//! against the contract's response table.
//!
//! An [`Operation`] describes one call: method, path template, parameters, request body, and
//! the ordered `(status, content type, target type)` definitions of its responses. The
//! [`ApiClient`] turns it into a request, sends it once, and returns a [`GenericResponse`]:
//! - **[`DefinedResponse`]** - the response matches a definition, its entity is decoded to the target type
//! - **[`UnexpectedResponse`]** - the response matches no definition, or its JSON body does not decode
//!
//! A contract mismatch is a value, not an error: errors are kept for validation failures
//! (nothing is sent) and I/O failures (with a diagnostic snapshot of the request or the response).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contract_client::{ApiClient, BodyEntity, Operation, ParameterLocation, ResponseType, StatusMatcher};
//! use http::Method;
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Debug, Serialize, Deserialize)]
//! # struct Pet { name: String }
//! # #[derive(Debug, Deserialize)]
//! # struct Error { message: String }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_base_url("http://localhost:8080/api")?
//!     .build()?;
//!
//! let rex = Pet { name: "Rex".to_string() };
//! let operation = Operation::builder("/{petStoreId}/pets", Method::POST)
//!     .parameter("petStoreId", ParameterLocation::Path, true, Some("store-1".into()))
//!     .parameter("dryRun", ParameterLocation::Query, false, Some(true.into()))
//!     .request_body("application/json", true, Some(BodyEntity::json(&rex)?))
//!     .response(201, "application/json", ResponseType::json::<Pet>())
//!     .response(StatusMatcher::Default, "application/json", ResponseType::json::<Error>())
//!     .build()?;
//!
//! let response = client.execute(operation).await?.into_defined()?;
//! if response.is_successful() {
//!     let created = response.into_entity::<Pet>()?;
//!     println!("created {}", created.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Content negotiation
//!
//! The `Accept` header lists the distinct media types of the response table: JSON media types
//! first, then the others with `; q=0.5`.
//!
//! ## Response classification
//!
//! Definitions with the exact status code are consulted first, then the status class
//! ([`StatusMatcher::Class`]), then `default`. Within them, the first definition whose media
//! type matches the `Content-Type` wins (`*/*` and `type/*` wildcards are supported). A response
//! without `Content-Type` matches a definition declared without content, as long as its body is
//! empty. See [`Operation::classify`].
//!
//! ## Response targets
//!
//! - [`ResponseType::json`] - the body is decoded with serde, a decode failure is an [`UnexpectedResponse`]
//! - [`ResponseType::text`] - the body as text
//! - [`ResponseType::stream`] - the live body, as a [`ResponseStream`] owned by the caller
//!
//! ## Custom transport
//!
//! The client sends requests through a [`Transport`], [`ReqwestTransport`] by default.
//! A transport records the request as actually sent in the per-call [`RequestCapture`],
//! it is the snapshot attached to transport errors.

mod client;

// Public API - only expose user-facing types and functions
pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, BodyEntity, CorrespondingRequest, DefinedContent,
    DefinedResponse, GenericResponse, HttpBody, HttpRequest, IncompleteResponse, JsonDecoder,
    Operation, OperationBuilder, ParamValue, Parameter, ParameterLocation, RequestBody,
    RequestCapture, ReqwestTransport, ResponseDefinition, ResponseStream, ResponseType,
    StatusMatcher, Transport, TransportError, UnexpectedResponse, Verdict, is_json_media_type,
};
