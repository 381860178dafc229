use std::any::{Any, type_name};
use std::fmt;

use mime::Mime;
use serde::de::DeserializeOwned;

/// Matches the status code of a response definition.
///
/// When selecting definitions for an actual status code, exact codes win over
/// classes, and classes win over `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StatusMatcher {
    /// An exact status code, e.g. `200`.
    #[display("{_0}")]
    Code(u16),
    /// A status class, e.g. `Class(4)` for `4XX`.
    #[display("{_0}XX")]
    Class(u8),
    /// The `default` response of the contract.
    #[display("default")]
    Default,
}

impl StatusMatcher {
    /// Checks whether the matcher covers the status code.
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Code(code) => *code == status,
            Self::Class(class) => status / 100 == u16::from(*class),
            Self::Default => true,
        }
    }

    pub(in crate::client) fn precedence(&self) -> u8 {
        match self {
            Self::Code(_) => 0,
            Self::Class(_) => 1,
            Self::Default => 2,
        }
    }
}

impl From<u16> for StatusMatcher {
    fn from(value: u16) -> Self {
        Self::Code(value)
    }
}

impl From<http::StatusCode> for StatusMatcher {
    fn from(value: http::StatusCode) -> Self {
        Self::Code(value.as_u16())
    }
}

type DecodeFn = fn(&str) -> Result<Box<dyn Any + Send + Sync>, serde_json::Error>;

/// Decodes JSON text into a Rust type chosen when the operation is described.
#[derive(Clone, Copy)]
pub struct JsonDecoder {
    type_name: &'static str,
    decode: DecodeFn,
}

impl JsonDecoder {
    /// The name of the Rust type this decoder produces.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(in crate::client) fn decode(
        &self,
        text: &str,
    ) -> Result<Box<dyn Any + Send + Sync>, serde_json::Error> {
        (self.decode)(text)
    }
}

impl fmt::Debug for JsonDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonDecoder").field(&self.type_name).finish()
    }
}

impl PartialEq for JsonDecoder {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

fn decode_json<T>(text: &str) -> Result<Box<dyn Any + Send + Sync>, serde_json::Error>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let value = serde_json::from_str::<T>(text)?;
    Ok(Box::new(value))
}

/// The target of a response definition with content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseType {
    /// A structured entity decoded from JSON.
    Json(JsonDecoder),
    /// The body as text.
    Text,
    /// The live, unread body; the caller owns it.
    Stream,
}

impl ResponseType {
    /// A structured entity of type `T`, decoded from JSON.
    pub fn json<T>() -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self::Json(JsonDecoder {
            type_name: type_name::<T>(),
            decode: decode_json::<T>,
        })
    }

    /// The body as text.
    pub fn text() -> Self {
        Self::Text
    }

    /// The live body as a [`ResponseStream`](crate::ResponseStream).
    pub fn stream() -> Self {
        Self::Stream
    }

    /// The name of the Rust type produced for this target.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Json(decoder) => decoder.type_name(),
            Self::Text => type_name::<String>(),
            Self::Stream => type_name::<crate::ResponseStream>(),
        }
    }
}

/// Content of a response definition: a media type matcher and the target type.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedContent {
    content_type: Mime,
    target: ResponseType,
}

impl DefinedContent {
    /// The media type matcher, possibly with `*` wildcards.
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// The target type.
    pub fn target(&self) -> ResponseType {
        self.target
    }
}

/// One entry of the response table of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDefinition {
    status: StatusMatcher,
    content: Option<DefinedContent>,
}

impl ResponseDefinition {
    /// A definition with content.
    pub fn new(status: StatusMatcher, content_type: Mime, target: ResponseType) -> Self {
        Self {
            status,
            content: Some(DefinedContent {
                content_type,
                target,
            }),
        }
    }

    /// A definition declaring no content.
    pub fn no_content(status: StatusMatcher) -> Self {
        Self {
            status,
            content: None,
        }
    }

    /// The status matcher.
    pub fn status(&self) -> StatusMatcher {
        self.status
    }

    /// The content, `None` when the definition declares no content.
    pub fn content(&self) -> Option<&DefinedContent> {
        self.content.as_ref()
    }

    /// Whether the definition declares no content.
    pub fn has_no_content(&self) -> bool {
        self.content.is_none()
    }
}
