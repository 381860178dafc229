use mime::Mime;

use super::media::is_compatible;
use super::operation::{Operation, ResponseType};

/// How a response relates to the contract of an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// No definition covers the status code and content type.
    Undefined,
    /// A definition declaring no content covers the response.
    NoContent,
    /// A definition with content covers the response, the body goes to this target.
    Target(ResponseType),
}

impl Operation {
    /// Classifies a response against the response table.
    ///
    /// A non-empty body without content type is always undefined. Otherwise the
    /// definitions selected for the status code (see
    /// [`select_response_definitions`](Self::select_response_definitions)) are scanned in
    /// declaration order: a missing content type matches the first definition without
    /// content, a present content type matches the first compatible definition.
    pub fn classify(
        &self,
        status: u16,
        content_type: Option<&Mime>,
        body_is_empty: bool,
    ) -> Verdict {
        if content_type.is_none() && !body_is_empty {
            return Verdict::Undefined;
        }

        for definition in self.select_response_definitions(status) {
            match (content_type, definition.content()) {
                (None, None) => return Verdict::NoContent,
                (Some(actual), Some(content)) if is_compatible(actual, content.content_type()) => {
                    return Verdict::Target(content.target());
                }
                _ => {}
            }
        }

        Verdict::Undefined
    }
}
