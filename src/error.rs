use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

use crate::state::ParserState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while parsing a multipart stream and while
/// assembling its parts into [`FormData`](crate::FormData).
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// A byte was found where the boundary line grammar mandates `CR`, `-` or
    /// `LF`.
    #[display(fmt = "malformed boundary line: unexpected byte {:?}", "char::from(*byte)")]
    MalformedBoundaryLine { byte: u8 },

    /// A header line was not terminated by `CRLF`.
    #[display(fmt = "malformed header line: expected LF, found {:?}", "char::from(*byte)")]
    MalformedHeaderLine { byte: u8 },

    /// A header name was empty or contained a byte other than an ASCII letter
    /// or `-`.
    #[display(
        fmt = "invalid header field: unexpected byte {:?} at position {}",
        "char::from(*byte)",
        position
    )]
    InvalidHeaderField { byte: u8, position: usize },

    /// The multipart stream ended before a clean completion.
    #[display(fmt = "stream ended unexpectedly in state {:?}", state)]
    UnexpectedEndOfStream { state: ParserState },

    /// The parser was given an empty boundary token.
    #[display(fmt = "multipart boundary must not be empty")]
    EmptyBoundary,

    /// The parser already failed on an earlier call.
    #[display(fmt = "multipart parser was used after a failure")]
    ParserPoisoned,

    /// The `Content-Type` header is not `multipart/*`.
    #[display(fmt = "Content-Type is not multipart")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,

    /// Failed to decode the part's raw header name to
    /// [`HeaderName`](http::header::HeaderName) type.
    #[display(fmt = "failed to decode part's raw header name: {:?} {}", name, cause)]
    DecodeHeaderName { name: String, cause: BoxError },

    /// Failed to decode the part's raw header value to
    /// [`HeaderValue`](http::header::HeaderValue) type.
    #[display(fmt = "failed to decode part's raw header value: {}", cause)]
    DecodeHeaderValue { value: Vec<u8>, cause: BoxError },

    /// An unknown field is detected when
    /// [`allowed_fields`](crate::Constraints::allowed_fields) are set.
    #[display(fmt = "unknown field received: {}", "field_name.as_deref().unwrap_or(\"<unknown>\")")]
    UnknownField { field_name: Option<String> },

    /// The incoming field size exceeded the maximum limit.
    #[display(
        fmt = "field '{}' exceeded the maximum size limit: {} bytes",
        "field_name.as_deref().unwrap_or(\"<unknown>\")",
        limit
    )]
    FieldSizeExceeded { limit: u64, field_name: Option<String> },

    /// The incoming stream size exceeded the maximum limit.
    #[display(fmt = "stream size exceeded the maximum limit: {} bytes", limit)]
    StreamSizeExceeded { limit: u64 },

    /// Stream read failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),

    /// Failed to decode a value as `JSON` in [`Value::json`](crate::Value::json).
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    #[display(fmt = "failed to decode field data as JSON: {}", _0)]
    DecodeJson(serde_json::Error),
}

impl Error {
    /// Returns `true` for errors raised by the parser on malformed input, as
    /// opposed to limits, I/O or header conversion.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedBoundaryLine { .. }
                | Error::MalformedHeaderLine { .. }
                | Error::InvalidHeaderField { .. }
                | Error::UnexpectedEndOfStream { .. }
        )
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
