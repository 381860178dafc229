//! Results of an executed operation.
//!
//! This module provides:
//!
//! - [`GenericResponse`] - either a [`DefinedResponse`] matching the contract, or an [`UnexpectedResponse`]
//! - [`ResponseStream`] - the live body handed over for stream targets
//! - [`CorrespondingRequest`] and [`IncompleteResponse`] - diagnostic snapshots attached to errors

use std::any::{Any, type_name};

use http::StatusCode;

use super::ApiClientError;
use super::operation::ResponseType;

mod materialize;

mod snapshot;
pub use self::snapshot::{CorrespondingRequest, IncompleteResponse};

mod stream;
pub use self::stream::ResponseStream;

/// The result of an executed operation.
///
/// A response that does not match the contract is a normal result, callers inspect it
/// or turn it into an error with [`into_defined`](Self::into_defined).
#[derive(Debug)]
pub enum GenericResponse {
    /// The response matches a definition of the contract.
    Defined(DefinedResponse),
    /// The response matches no definition, or its JSON body cannot be decoded.
    Unexpected(UnexpectedResponse),
}

impl GenericResponse {
    /// The status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::Defined(response) => response.status(),
            Self::Unexpected(response) => response.status(),
        }
    }

    /// The raw `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Defined(response) => response.content_type(),
            Self::Unexpected(response) => response.content_type(),
        }
    }

    /// The request this response answers.
    pub fn request(&self) -> &CorrespondingRequest {
        match self {
            Self::Defined(response) => response.request(),
            Self::Unexpected(response) => response.request(),
        }
    }

    /// Returns `true` if the response matches the contract.
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Asserts the response matches the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UndefinedResponse`] for an unexpected response.
    pub fn into_defined(self) -> Result<DefinedResponse, ApiClientError> {
        match self {
            Self::Defined(response) => Ok(response),
            Self::Unexpected(response) => Err(ApiClientError::UndefinedResponse {
                response: Box::new(response),
            }),
        }
    }
}

/// A decoded JSON entity, with the name of its Rust type.
#[derive(derive_more::Debug)]
#[debug("{type_name}")]
pub(in crate::client) struct DecodedEntity {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl DecodedEntity {
    pub(in crate::client) fn new(type_name: &'static str, value: Box<dyn Any + Send + Sync>) -> Self {
        Self { type_name, value }
    }
}

#[derive(Debug)]
pub(in crate::client) enum Entity {
    Empty,
    Value(DecodedEntity),
    Text(String),
    Stream(ResponseStream),
}

impl Entity {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => type_name::<()>(),
            Self::Value(value) => value.type_name,
            Self::Text(_) => type_name::<String>(),
            Self::Stream(_) => type_name::<ResponseStream>(),
        }
    }
}

/// A response matching a definition of the contract.
#[derive(Debug)]
pub struct DefinedResponse {
    request: CorrespondingRequest,
    status: StatusCode,
    reason: Option<String>,
    content_type: Option<String>,
    response_type: Option<ResponseType>,
    entity: Entity,
}

impl DefinedResponse {
    pub(in crate::client) fn new(
        request: CorrespondingRequest,
        status: StatusCode,
        reason: Option<String>,
        content_type: Option<String>,
        response_type: Option<ResponseType>,
        entity: Entity,
    ) -> Self {
        Self {
            request,
            status,
            reason,
            content_type,
            response_type,
            entity,
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

    /// The reason phrase sent by the server.
    ///
    /// Falls back to the canonical phrase of the status code, `None` for an unknown code.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// The raw `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The target resolved by the contract, `None` for a definition without content.
    pub fn response_type(&self) -> Option<ResponseType> {
        self.response_type
    }

    /// Returns `true` for a `2XX` status code.
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the response carries no entity.
    pub fn is_empty(&self) -> bool {
        matches!(self.entity, Entity::Empty)
    }

    /// The entity, if it is a `T`.
    ///
    /// Text entities can be read as a [`String`].
    pub fn entity<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        match &self.entity {
            Entity::Value(decoded) => decoded.value.downcast_ref(),
            Entity::Text(text) => (text as &dyn Any).downcast_ref(),
            Entity::Empty | Entity::Stream(_) => None,
        }
    }

    /// The text entity.
    pub fn text(&self) -> Option<&str> {
        match &self.entity {
            Entity::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Takes the entity as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::EntityType`] if the entity is not a `T`.
    pub fn into_entity<T>(self) -> Result<T, ApiClientError>
    where
        T: Any,
    {
        let actual = self.entity.type_name();
        let value: Box<dyn Any> = match self.entity {
            Entity::Value(decoded) => decoded.value,
            Entity::Text(text) => Box::new(text),
            Entity::Stream(stream) => Box::new(stream),
            Entity::Empty => Box::new(()),
        };

        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| ApiClientError::EntityType {
                expected: type_name::<T>(),
                actual,
            })
    }

    /// Takes the live body of a stream target.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::EntityType`] if the target is not a stream.
    pub fn into_stream(self) -> Result<ResponseStream, ApiClientError> {
        self.into_entity()
    }
}

/// A response that does not match the contract.
#[derive(Debug, Clone)]
pub struct UnexpectedResponse {
    request: CorrespondingRequest,
    status: StatusCode,
    reason: Option<String>,
    content_type: Option<String>,
    body: String,
    message: String,
}

impl UnexpectedResponse {
    pub(in crate::client) fn new(
        request: CorrespondingRequest,
        status: StatusCode,
        reason: Option<String>,
        content_type: Option<String>,
        body: String,
        message: String,
    ) -> Self {
        Self {
            request,
            status,
            reason,
            content_type,
            body,
            message,
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

    /// The reason phrase sent by the server.
    ///
    /// Falls back to the canonical phrase of the status code, `None` for an unknown code.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// The raw `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The body, as text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Why the response does not match the contract.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pet {
        name: String,
    }

    fn request() -> CorrespondingRequest {
        CorrespondingRequest::new("http://localhost/pets/1", "GET", Vec::new())
    }

    fn defined(entity: Entity) -> DefinedResponse {
        DefinedResponse::new(
            request(),
            StatusCode::OK,
            Some("OK".to_string()),
            Some("application/json".to_string()),
            None,
            entity,
        )
    }

    fn rex() -> Entity {
        let pet = Pet {
            name: "Rex".to_string(),
        };
        Entity::Value(DecodedEntity::new(type_name::<Pet>(), Box::new(pet)))
    }

    #[test]
    fn test_entity_downcast() {
        let response = defined(rex());

        assert_eq!(
            response.entity::<Pet>().map(|pet| pet.name.as_str()),
            Some("Rex")
        );
        assert!(response.entity::<String>().is_none());
        assert!(response.is_successful());
        assert_eq!(response.reason(), Some("OK"));
    }

    #[test]
    fn test_into_entity_with_wrong_type() {
        let response = defined(rex());

        let error = response.into_entity::<String>().expect_err("should fail");

        assert!(matches!(
            error,
            ApiClientError::EntityType { expected: "alloc::string::String", actual } if actual.ends_with("Pet")
        ));
    }

    #[test]
    fn test_text_entity_is_a_string() {
        let response = defined(Entity::Text("Hello".to_string()));

        assert_eq!(response.text(), Some("Hello"));
        assert_eq!(response.entity::<String>().map(String::as_str), Some("Hello"));
        assert_eq!(response.into_entity::<String>().expect("a string"), "Hello");
    }

    #[test]
    fn test_empty_entity() {
        let response = defined(Entity::Empty);

        assert!(response.is_empty());
        assert!(response.text().is_none());
        let error = response.into_stream().expect_err("should fail");
        insta::assert_snapshot!(error, @"Entity of type '()' cannot be read as 'contract_client::client::response::stream::ResponseStream'");
    }

    #[test]
    fn test_unexpected_response_into_defined_fails() {
        let response = GenericResponse::Unexpected(UnexpectedResponse::new(
            request(),
            StatusCode::IM_A_TEAPOT,
            Some("Short and stout".to_string()),
            Some("text/html".to_string()),
            "<p>teapot</p>".to_string(),
            "The combination of status code 418 and content type text/html is not defined in the contract"
                .to_string(),
        ));

        assert!(!response.is_defined());
        assert_eq!(response.status(), 418);
        let GenericResponse::Unexpected(unexpected) = &response else {
            panic!("expected an unexpected response");
        };
        assert_eq!(unexpected.reason(), Some("Short and stout"));
        let error = response.into_defined().expect_err("should fail");
        assert_eq!(
            error.corresponding_request().map(CorrespondingRequest::url),
            Some("http://localhost/pets/1")
        );
        insta::assert_snapshot!(error, @"Response is not defined in the contract: The combination of status code 418 and content type text/html is not defined in the contract");
    }
}
