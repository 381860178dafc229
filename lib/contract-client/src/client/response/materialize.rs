use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use hyper::ext::ReasonPhrase;
use mime::Mime;
use tracing::{debug, warn};

use super::{
    CorrespondingRequest, DecodedEntity, DefinedResponse, Entity, GenericResponse,
    IncompleteResponse, ResponseStream, UnexpectedResponse,
};
use crate::client::ApiClientError;
use crate::client::classify::Verdict;
use crate::client::media::is_json_media_type;
use crate::client::operation::{JsonDecoder, Operation, ResponseType};
use crate::client::transport::Exchange;

/// What is known of a response before its body is read.
struct ResponseHead {
    request: CorrespondingRequest,
    status: StatusCode,
    reason: Option<String>,
    content_type: Option<String>,
    media_type: Option<Mime>,
    headers: HeaderMap,
}

/// The reason phrase sent by the server, or the canonical one of the status code.
fn reason_phrase(response: &reqwest::Response) -> Option<String> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
}

impl ResponseHead {
    fn new(request: CorrespondingRequest, response: &reqwest::Response) -> Self {
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let media_type = content_type
            .as_deref()
            .and_then(|content_type| match content_type.parse::<Mime>() {
                Ok(media_type) => Some(media_type),
                Err(error) => {
                    warn!(content_type, %error, "unparsable response content type");
                    None
                }
            });

        Self {
            request,
            status: response.status(),
            reason: reason_phrase(response),
            content_type,
            media_type,
            headers,
        }
    }

    fn classify(&self, operation: &Operation, body_is_empty: bool) -> Verdict {
        let status = self.status.as_u16();
        match (&self.content_type, &self.media_type) {
            // declared but unparsable, nothing can match
            (Some(_), None) => Verdict::Undefined,
            (_, media_type) => operation.classify(status, media_type.as_ref(), body_is_empty),
        }
    }

    fn body_error(self, source: reqwest::Error) -> ApiClientError {
        let Self {
            request,
            status,
            reason,
            content_type,
            media_type: _,
            headers,
        } = self;
        let response = IncompleteResponse::new(request, status, reason, content_type, headers);
        ApiClientError::ResponseBody {
            response: Box::new(response),
            source,
        }
    }

    fn defined(self, response_type: Option<ResponseType>, entity: Entity) -> GenericResponse {
        GenericResponse::Defined(DefinedResponse::new(
            self.request,
            self.status,
            self.reason,
            self.content_type,
            response_type,
            entity,
        ))
    }

    fn unexpected(self, body: String, message: String) -> GenericResponse {
        warn!(
            status = self.status.as_u16(),
            content_type = self.content_type.as_deref(),
            url = self.request.url(),
            "{message}"
        );
        GenericResponse::Unexpected(UnexpectedResponse::new(
            self.request,
            self.status,
            self.reason,
            self.content_type,
            body,
            message,
        ))
    }
}

impl GenericResponse {
    /// Classifies the response against the operation and reads its body accordingly.
    ///
    /// The body is released on every path except for stream targets.
    pub(in crate::client) async fn materialize(
        operation: &Operation,
        exchange: Exchange,
    ) -> Result<Self, ApiClientError> {
        let Exchange { request, response } = exchange;
        let head = ResponseHead::new(request, &response);
        let mut body = ResponseStream::new(response);

        let body_is_empty = match body.is_empty().await {
            Ok(body_is_empty) => body_is_empty,
            Err(source) => return Err(head.body_error(source)),
        };

        let verdict = head.classify(operation, body_is_empty);
        debug!(?verdict, status = head.status.as_u16(), body_is_empty, "response classified");

        let target = match verdict {
            Verdict::Undefined => {
                let text = match body.text(head.media_type.as_ref()).await {
                    Ok(text) => text,
                    Err(source) => return Err(head.body_error(source)),
                };
                let message = format!(
                    "The combination of status code {} and content type {} is not defined in the contract",
                    head.status.as_u16(),
                    head.content_type.as_deref().unwrap_or("(none)")
                );
                return Ok(head.unexpected(text, message));
            }
            Verdict::NoContent => {
                drop(body);
                return Ok(head.defined(None, Entity::Empty));
            }
            Verdict::Target(target) => target,
        };

        match target {
            ResponseType::Stream => Ok(head.defined(Some(target), Entity::Stream(body))),
            ResponseType::Text => match body.text(head.media_type.as_ref()).await {
                Ok(text) => Ok(head.defined(Some(target), Entity::Text(text))),
                Err(source) => Err(head.body_error(source)),
            },
            ResponseType::Json(decoder) => {
                let text = match body.text(head.media_type.as_ref()).await {
                    Ok(text) => text,
                    Err(source) => return Err(head.body_error(source)),
                };
                if head.media_type.as_ref().is_some_and(is_json_media_type) {
                    Ok(decode(head, decoder, text))
                } else {
                    let message = format!(
                        "Content-Type not supported by client: {}",
                        head.content_type.as_deref().unwrap_or_default()
                    );
                    Ok(head.unexpected(text, message))
                }
            }
        }
    }
}

fn decode(head: ResponseHead, decoder: JsonDecoder, text: String) -> GenericResponse {
    match decoder.decode(&text) {
        Ok(value) => {
            let entity = Entity::Value(DecodedEntity::new(decoder.type_name(), value));
            head.defined(Some(ResponseType::Json(decoder)), entity)
        }
        Err(error) => {
            let message = format!(
                "JSON response from server cannot be parsed to {}: {error}",
                decoder.type_name()
            );
            head.unexpected(text, message)
        }
    }
}
