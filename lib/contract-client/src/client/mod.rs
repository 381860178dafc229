use tracing::debug;

mod accept;
mod classify;
pub use self::classify::Verdict;

mod builder;
pub use self::builder::ApiClientBuilder;

mod error;
pub use self::error::ApiClientError;

mod media;
pub use self::media::is_json_media_type;

mod operation;
pub use self::operation::{
    BodyEntity, DefinedContent, JsonDecoder, Operation, OperationBuilder, ParamValue, Parameter,
    ParameterLocation, RequestBody, ResponseDefinition, ResponseType, StatusMatcher,
};

mod request;
pub use self::request::{HttpBody, HttpRequest};

mod response;
pub use self::response::{
    CorrespondingRequest, DefinedResponse, GenericResponse, IncompleteResponse, ResponseStream,
    UnexpectedResponse,
};

mod transport;
pub use self::transport::{ReqwestTransport, RequestCapture, Transport, TransportError};


/// HTTP client executing operations described by a contract.
///
/// Each call to [`execute`](Self::execute) validates the operation, assembles the request,
/// sends it once through the [`Transport`], and classifies the response against the
/// operation's response table. Use [`ApiClientBuilder`] to create instances.
///
/// # Example
///
/// ```rust,no_run
/// use contract_client::{ApiClient, GenericResponse, Operation, ParameterLocation, ResponseType};
/// use http::Method;
/// # use serde::Deserialize;
/// # #[derive(Debug, Deserialize)]
/// # struct Pet { name: String }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_host("petstore.example.com")
///     .with_base_path("/v1")?
///     .build()?;
///
/// let operation = Operation::builder("/pets/{petId}", Method::GET)
///     .parameter("petId", ParameterLocation::Path, true, Some(12.into()))
///     .response(200, "application/json", ResponseType::json::<Pet>())
///     .no_content_response(404)
///     .build()?;
///
/// match client.execute(operation).await? {
///     GenericResponse::Defined(response) => {
///         if let Some(pet) = response.entity::<Pet>() {
///             println!("found {}", pet.name);
///         }
///     }
///     GenericResponse::Unexpected(response) => eprintln!("{}", response.message()),
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// The client holds no per-call state: it can be cloned and shared, concurrent calls
/// only share the transport.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
}

// Create
impl ApiClient {
    /// Starts configuring a client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }
}

impl<T> ApiClient<T>
where
    T: Transport,
{
    /// The base URL operation paths are appended to, without trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes an operation.
    ///
    /// A response that does not match the contract is returned as
    /// [`GenericResponse::Unexpected`], it is not an error.
    ///
    /// # Errors
    ///
    /// - a validation error ([`ApiClientError::is_validation`]) if a required parameter or the
    ///   required body has no value, nothing is sent,
    /// - an assembly error if the URL, a header, or the body cannot be built,
    /// - an I/O error ([`ApiClientError::is_io`]) if the transport fails or the response body
    ///   cannot be read, carrying a diagnostic snapshot.
    pub async fn execute(&self, mut operation: Operation) -> Result<GenericResponse, ApiClientError> {
        operation.validate()?;
        debug!(method = %operation.method(), path = operation.path(), "executing operation");

        let body = operation.take_request_body();
        let request = HttpRequest::assemble(&self.base_url, &operation, body).await?;
        let exchange = transport::invoke(&self.transport, request).await?;

        GenericResponse::materialize(&operation, exchange).await
    }
}
