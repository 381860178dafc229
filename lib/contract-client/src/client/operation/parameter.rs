use std::fmt;

use crate::client::ApiClientError;

/// Where a parameter is placed in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParameterLocation {
    /// Substituted into a `{name}` placeholder of the path template.
    #[display("path")]
    Path,
    /// Appended to the query string.
    #[display("query")]
    Query,
    /// Sent as a request header.
    #[display("header")]
    Header,
}

/// A scalar parameter value.
///
/// Values are serialized with their canonical textual form (see the [`Display`](fmt::Display)
/// implementation): dates as ISO-8601 `YYYY-MM-DD`, instants as RFC 3339.
///
/// # Example
///
/// ```rust
/// use contract_client::ParamValue;
///
/// let date: jiff::civil::Date = "2024-03-01".parse().expect("valid date");
/// assert_eq!(ParamValue::from(date).to_string(), "2024-03-01");
/// assert_eq!(ParamValue::from(true).to_string(), "true");
/// assert_eq!(ParamValue::from(42).to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum ParamValue {
    /// A string value, sent as-is.
    String(String),
    /// A boolean, `true` or `false`.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer.
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// A calendar date, `YYYY-MM-DD`.
    Date(jiff::civil::Date),
    /// An instant, RFC 3339 in UTC.
    Timestamp(jiff::Timestamp),
    /// An instant with its offset, RFC 3339 with the zone offset.
    Zoned(jiff::Zoned),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value.into())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{value}"),
            Self::Timestamp(value) => write!(f, "{value}"),
            Self::Zoned(value) => {
                write!(f, "{}", value.timestamp().display_with_offset(value.offset()))
            }
        }
    }
}

/// A parameter declared by an operation, bound to its (possibly absent) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    location: ParameterLocation,
    required: bool,
    value: Option<ParamValue>,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        required: bool,
        value: Option<ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            value,
        }
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter location.
    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    /// Whether the contract requires a value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The bound value.
    pub fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    /// The canonical textual form of the bound value.
    pub(in crate::client) fn serialized_value(&self) -> Option<String> {
        self.value.as_ref().map(ToString::to_string)
    }

    pub(in crate::client) fn validate(&self) -> Result<(), ApiClientError> {
        if self.required && self.value.is_none() {
            return Err(ApiClientError::MissingParameter {
                name: self.name.clone(),
                location: self.location,
            });
        }
        Ok(())
    }
}
