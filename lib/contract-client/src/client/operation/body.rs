use bytes::Bytes;
use mime::Mime;
use serde::Serialize;
use tokio::io::AsyncRead;

use crate::client::ApiClientError;

/// The entity sent as request body.
///
/// How the entity is encoded depends on the declared content type of the
/// [`RequestBody`]: structured values and text are encoded as JSON for a
/// JSON-compatible content type, raw bytes and readers are always sent as-is.
#[derive(derive_more::Debug)]
pub enum BodyEntity {
    /// A structured value.
    Structured(serde_json::Value),
    /// A text value.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// A byte source, read to completion before the request is sent.
    Reader(#[debug(skip)] Box<dyn AsyncRead + Send + Sync + Unpin>),
}

impl BodyEntity {
    /// Creates a structured entity from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::JsonEncoding`] if the value cannot be represented as JSON.
    pub fn json<T>(value: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        Ok(Self::Structured(value))
    }

    /// Creates an entity from a byte source.
    pub fn reader(reader: impl AsyncRead + Send + Sync + Unpin + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }
}

impl From<serde_json::Value> for BodyEntity {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

impl From<String> for BodyEntity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for BodyEntity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for BodyEntity {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

impl From<Bytes> for BodyEntity {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

/// The request body descriptor of an operation.
#[derive(Debug)]
pub struct RequestBody {
    content_type: Mime,
    required: bool,
    entity: Option<BodyEntity>,
}

impl RequestBody {
    /// Creates a request body descriptor.
    pub fn new(content_type: Mime, required: bool, entity: Option<BodyEntity>) -> Self {
        Self {
            content_type,
            required,
            entity,
        }
    }

    /// The declared content type.
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// Whether the contract requires an entity.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The entity, if any.
    pub fn entity(&self) -> Option<&BodyEntity> {
        self.entity.as_ref()
    }

    pub(in crate::client) fn into_parts(self) -> (Mime, Option<BodyEntity>) {
        (self.content_type, self.entity)
    }

    pub(in crate::client) fn validate(&self) -> Result<(), ApiClientError> {
        if self.required && self.entity.is_none() {
            return Err(ApiClientError::MissingRequestBody);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Serialize)]
    struct Pet {
        name: String,
    }

    #[test]
    fn test_json_entity_from_serializable() {
        let entity = BodyEntity::json(&Pet {
            name: "Rex".to_string(),
        })
        .expect("should serialize");

        insta::assert_debug_snapshot!(entity, @r#"
        Structured(
            Object {
                "name": String("Rex"),
            },
        )
        "#);
    }

    #[test]
    fn test_reader_entity_debug_skips_source() {
        let entity = BodyEntity::reader(&b"raw"[..]);

        let debug = format!("{entity:?}");
        assert!(debug.starts_with("Reader("), "unexpected debug output: {debug}");
        assert!(!debug.contains("raw"));
    }

    #[test]
    fn test_required_body_without_entity_fails_validation() {
        let body = RequestBody::new(mime::APPLICATION_JSON, true, None);

        let error = body.validate().expect_err("should fail");
        assert!(matches!(error, ApiClientError::MissingRequestBody));
    }

    #[test]
    fn test_optional_body_without_entity_is_valid() {
        let body = RequestBody::new(mime::TEXT_PLAIN, false, None);

        body.validate().expect("should be valid");
        assert!(body.entity().is_none());
    }
}
