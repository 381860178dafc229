//! Declarative description of one HTTP operation.
//!
//! An [`Operation`] is built per call, usually by generated client code, with the
//! [`OperationBuilder`]:
//!
//! - [`Parameter`] - a scalar value bound to a path, query, or header parameter
//! - [`RequestBody`] - the request body descriptor with its [`BodyEntity`]
//! - [`ResponseDefinition`] - one `(status, content type, target type)` entry of the ordered response table

use http::Method;
use indexmap::IndexMap;
use mime::Mime;

use super::{ApiClientError, media};

mod body;
pub use self::body::{BodyEntity, RequestBody};

mod definition;
pub use self::definition::{
    DefinedContent, JsonDecoder, ResponseDefinition, ResponseType, StatusMatcher,
};

mod parameter;
pub use self::parameter::{ParamValue, Parameter, ParameterLocation};

/// An immutable description of one HTTP operation and its response contract.
///
/// # Example
///
/// ```rust
/// use contract_client::{Operation, ParamValue, ParameterLocation, ResponseType, StatusMatcher};
/// use http::Method;
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct Pet { name: String }
/// # #[derive(Deserialize)]
/// # struct Error { message: String }
///
/// # fn example() -> Result<(), contract_client::ApiClientError> {
/// let operation = Operation::builder("/{petStoreId}/pets", Method::GET)
///     .parameter("petStoreId", ParameterLocation::Path, true, Some(ParamValue::from("store-1")))
///     .parameter("limit", ParameterLocation::Query, false, None)
///     .response(200, "application/json", ResponseType::json::<Vec<Pet>>())
///     .no_content_response(204)
///     .response(StatusMatcher::Default, "application/json", ResponseType::json::<Error>())
///     .build()?;
///
/// assert_eq!(operation.accepted_media_types().count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Operation {
    method: Method,
    path: String,
    path_parameters: IndexMap<String, Parameter>,
    query_parameters: IndexMap<String, Parameter>,
    header_parameters: IndexMap<String, Parameter>,
    request_body: Option<RequestBody>,
    responses: Vec<ResponseDefinition>,
}

impl Operation {
    /// Starts describing an operation.
    pub fn builder(path: impl Into<String>, method: Method) -> OperationBuilder {
        OperationBuilder::new(path, method)
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path template, with `{name}` placeholders.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameters, in declaration order.
    pub fn path_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.path_parameters.values()
    }

    /// Query parameters, in declaration order.
    pub fn query_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.query_parameters.values()
    }

    /// Header parameters, in declaration order.
    pub fn header_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.header_parameters.values()
    }

    /// All parameters: path, then query, then header.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.path_parameters()
            .chain(self.query_parameters())
            .chain(self.header_parameters())
    }

    /// The request body descriptor.
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.request_body.as_ref()
    }

    /// The response table, in declaration order.
    pub fn responses(&self) -> &[ResponseDefinition] {
        &self.responses
    }

    /// Distinct media types declared in the response table, in declaration order.
    pub fn accepted_media_types(&self) -> impl Iterator<Item = &Mime> {
        let mut seen: Vec<&Mime> = Vec::new();
        self.responses
            .iter()
            .filter_map(|definition| definition.content())
            .map(DefinedContent::content_type)
            .filter(move |media_type| {
                if seen.contains(media_type) {
                    false
                } else {
                    seen.push(*media_type);
                    true
                }
            })
    }

    /// Selects the definitions covering a status code.
    ///
    /// Definitions with the exact code are returned if any, otherwise definitions of the
    /// status class, otherwise the `default` definitions. Declaration order is kept.
    pub fn select_response_definitions(&self, status: u16) -> Vec<&ResponseDefinition> {
        let matching = self
            .responses
            .iter()
            .filter(|definition| definition.status().matches(status));
        let Some(best) = matching
            .clone()
            .map(|definition| definition.status().precedence())
            .min()
        else {
            return Vec::new();
        };

        matching
            .filter(|definition| definition.status().precedence() == best)
            .collect()
    }

    /// Checks that every required parameter and the required body have a value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::MissingRequestBody`] or [`ApiClientError::MissingParameter`].
    pub fn validate(&self) -> Result<(), ApiClientError> {
        if let Some(body) = &self.request_body {
            body.validate()?;
        }
        for parameter in self.parameters() {
            parameter.validate()?;
        }
        Ok(())
    }

    pub(in crate::client) fn take_request_body(&mut self) -> Option<RequestBody> {
        self.request_body.take()
    }
}

/// Builder for [`Operation`], shaped after the way generated client code describes a call.
#[derive(Debug)]
pub struct OperationBuilder {
    method: Method,
    path: String,
    path_parameters: IndexMap<String, Parameter>,
    query_parameters: IndexMap<String, Parameter>,
    header_parameters: IndexMap<String, Parameter>,
    request_body: Option<RequestBody>,
    responses: Vec<ResponseDefinition>,
    error: Option<ApiClientError>,
}

impl OperationBuilder {
    /// Starts describing an operation.
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            method,
            path: path.into(),
            path_parameters: IndexMap::new(),
            query_parameters: IndexMap::new(),
            header_parameters: IndexMap::new(),
            request_body: None,
            responses: Vec::new(),
            error: None,
        }
    }

    /// Declares a parameter and binds its value.
    ///
    /// Declaring the same name twice at the same location replaces the first declaration.
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        location: ParameterLocation,
        required: bool,
        value: Option<ParamValue>,
    ) -> Self {
        let name = name.into();
        let parameter = Parameter::new(name.clone(), location, required, value);
        let parameters = match location {
            ParameterLocation::Path => &mut self.path_parameters,
            ParameterLocation::Query => &mut self.query_parameters,
            ParameterLocation::Header => &mut self.header_parameters,
        };
        parameters.insert(name, parameter);
        self
    }

    /// Declares the request body.
    pub fn request_body(
        mut self,
        content_type: &str,
        required: bool,
        entity: Option<BodyEntity>,
    ) -> Self {
        if let Some(content_type) = self.media_type(content_type) {
            self.request_body = Some(RequestBody::new(content_type, required, entity));
        }
        self
    }

    /// Appends a response definition with content.
    pub fn response(
        mut self,
        status: impl Into<StatusMatcher>,
        content_type: &str,
        target: ResponseType,
    ) -> Self {
        if let Some(content_type) = self.media_type(content_type) {
            self.responses
                .push(ResponseDefinition::new(status.into(), content_type, target));
        }
        self
    }

    /// Appends a response definition declaring no content.
    pub fn no_content_response(mut self, status: impl Into<StatusMatcher>) -> Self {
        self.responses
            .push(ResponseDefinition::no_content(status.into()));
        self
    }

    /// Builds the operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidMediaType`] for the first media type that could not be parsed.
    pub fn build(self) -> Result<Operation, ApiClientError> {
        let Self {
            method,
            path,
            path_parameters,
            query_parameters,
            header_parameters,
            request_body,
            responses,
            error,
        } = self;

        if let Some(error) = error {
            return Err(error);
        }

        Ok(Operation {
            method,
            path,
            path_parameters,
            query_parameters,
            header_parameters,
            request_body,
            responses,
        })
    }

    fn media_type(&mut self, media_type: &str) -> Option<Mime> {
        match media::parse(media_type) {
            Ok(media_type) => Some(media_type),
            Err(error) => {
                self.error.get_or_insert(error);
                None
            }
        }
    }
}
