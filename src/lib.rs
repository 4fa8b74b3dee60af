//! An incremental parser for `multipart/*` bodies, and a `multipart/form-data`
//! assembler built on top of it.
//!
//! [`MultipartParser`] is push based: feed it chunks of any size with
//! [`write`](MultipartParser::write), finish with [`end`](MultipartParser::end),
//! and it reports part boundaries, headers and body bytes to a [`Handler`]
//! without buffering whole parts.
//!
//! [`FormData`] collects those events into text fields and files.
//!
//! # Examples
//!
//! ```
//! use partwise::FormData;
//!
//! # fn run() -> partwise::Result<()> {
//! let content_type = "multipart/form-data; boundary=X-BOUNDARY";
//! let body = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\r\n--X-BOUNDARY--\r\n";
//!
//! let boundary = partwise::parse_boundary(content_type)?;
//! let form = FormData::from_bytes(body.as_bytes(), boundary)?;
//!
//! assert_eq!(form.text("My Field"), Some("abcd"));
//!
//! let file = form.file("File Field").unwrap();
//! assert_eq!(file.file_name(), "a-text-file.txt");
//! assert_eq!(&file.bytes()[..], b"Hello world");
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Features
//!
//! - `json`: [`Value::json`] deserializes an entry with `serde_json`.
//! - `tokio-io`: [`FormData::from_reader`] reads from a tokio `AsyncRead`.
//! - `log`: traces part boundaries and failures through the `log` crate.

#![cfg_attr(nightly, feature(doc_cfg))]

#[cfg(feature = "log")]
macro_rules! trace {
    ($($t:tt)*) => (::log::trace!($($t)*));
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($t:tt)*) => {};
}

pub use bytes;
pub use constraints::Constraints;
pub use error::Error;
pub use field::{File, Value};
pub use form_data::{FormData, FormDataParser};
pub use handler::Handler;
pub use multipart::MultipartParser;
pub use size_limit::SizeLimit;
pub use state::ParserState;

mod boundary;
mod constants;
mod constraints;
mod content_disposition;
mod error;
mod field;
mod form_data;
mod handler;
mod helpers;
mod multipart;
mod size_limit;
mod state;

/// A Result type often returned from methods that can have `partwise` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// Any `multipart/*` type is accepted.
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> crate::Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(crate::Error::DecodeContentType)?;

    if m.type_() != mime::MULTIPART {
        return Err(crate::Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(crate::Error::NoBoundary)
}
