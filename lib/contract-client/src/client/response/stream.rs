use bytes::{Bytes, BytesMut};
use encoding_rs::{Encoding, UTF_8};
use http::{HeaderMap, StatusCode};
use mime::Mime;

/// The live body of a response, handed over to the caller unread.
///
/// The caller owns the underlying connection: dropping the stream releases it,
/// unread bytes are discarded.
#[derive(Debug)]
pub struct ResponseStream {
    response: reqwest::Response,
    peeked: Option<Bytes>,
}

impl ResponseStream {
    pub(in crate::client) fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            peeked: None,
        }
    }

    /// The status code of the response.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Reads the next chunk of the body, `None` once the body is complete.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the connection fails while reading.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, reqwest::Error> {
        if let Some(chunk) = self.peeked.take() {
            return Ok(Some(chunk));
        }
        self.response.chunk().await
    }

    /// Reads the remaining body.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the connection fails while reading.
    pub async fn bytes(mut self) -> Result<Bytes, reqwest::Error> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    /// Checks whether the body is empty, keeping the first chunk for later reads.
    pub(in crate::client) async fn is_empty(&mut self) -> Result<bool, reqwest::Error> {
        if self.peeked.is_some() {
            return Ok(false);
        }
        while let Some(chunk) = self.response.chunk().await? {
            if !chunk.is_empty() {
                self.peeked = Some(chunk);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reads the remaining body as text, decoded with the `charset` of the media type.
    ///
    /// Without a known charset the body is read as UTF-8. Malformed sequences are replaced.
    pub(in crate::client) async fn text(
        self,
        media_type: Option<&Mime>,
    ) -> Result<String, reqwest::Error> {
        let encoding = media_type
            .and_then(|media_type| media_type.get_param(mime::CHARSET))
            .and_then(|charset| Encoding::for_label(charset.as_str().as_bytes()))
            .unwrap_or(UTF_8);
        let bytes = self.bytes().await?;
        let (text, _, _) = encoding.decode(&bytes);
        Ok(text.into_owned())
    }
}
