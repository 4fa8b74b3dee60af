use bytes::{Bytes, BytesMut};
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use http::header::HeaderMap;
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;

/// One entry of a [`FormData`](crate::FormData).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A part without a filename, decoded to text.
    Text(String),
    /// A part with a filename, kept as raw bytes.
    File(File),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            Value::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Value::Text(_) => None,
            Value::File(file) => Some(file),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Value::File(_))
    }

    /// Deserializes the value as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        let res = match self {
            Value::Text(text) => serde_json::from_str(text),
            Value::File(file) => serde_json::from_slice(&file.bytes()),
        };

        res.map_err(crate::Error::DecodeJson)
    }
}

/// An uploaded file, as the chunks its body arrived in.
#[derive(Debug, Clone)]
pub struct File {
    file_name: String,
    content_type: Option<mime::Mime>,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
}

impl File {
    /// The filename from the `Content-Disposition` header, reduced to its last
    /// path segment.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The parsed `Content-Type` header of the part, if any.
    pub fn content_type(&self) -> Option<&mime::Mime> {
        self.content_type.as_ref()
    }

    /// All headers of the part.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|chunk| chunk.is_empty())
    }

    /// The whole body as one contiguous buffer.
    pub fn bytes(&self) -> Bytes {
        match self.chunks.len() {
            0 => Bytes::new(),
            1 => self.chunks[0].clone(),
            _ => {
                let mut buf = BytesMut::with_capacity(self.len());
                for chunk in &self.chunks {
                    buf.extend_from_slice(chunk);
                }
                buf.freeze()
            }
        }
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.file_name == other.file_name
            && self.content_type == other.content_type
            && self.headers == other.headers
            && self.bytes() == other.bytes()
    }
}

/// Collects the body of one part, chosen once its headers are known.
pub(crate) enum Accumulator {
    Text(TextAccumulator),
    File(FileAccumulator),
}

impl Accumulator {
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        match self {
            Accumulator::Text(text) => text.push(bytes),
            Accumulator::File(file) => file.push(bytes),
        }
    }

    pub(crate) fn finish(self) -> Value {
        match self {
            Accumulator::Text(text) => Value::Text(text.finish()),
            Accumulator::File(file) => Value::File(file.finish()),
        }
    }
}

/// Incrementally decodes text, so multi-byte sequences may straddle chunks.
pub(crate) struct TextAccumulator {
    decoder: Decoder,
    text: String,
}

impl TextAccumulator {
    /// Uses the `charset` parameter of the part's content type when it names
    /// a known encoding, UTF-8 otherwise.
    pub(crate) fn new(content_type: Option<&mime::Mime>) -> Self {
        let encoding = content_type
            .and_then(|mime| mime.get_param(mime::CHARSET))
            .and_then(|charset| Encoding::for_label(charset.as_str().as_bytes()))
            .unwrap_or(UTF_8);

        TextAccumulator {
            decoder: encoding.new_decoder(),
            text: String::new(),
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.decode(bytes, false);
    }

    pub(crate) fn finish(mut self) -> String {
        self.decode(&[], true);
        self.text
    }

    fn decode(&mut self, mut src: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or_else(|| src.len().saturating_mul(3).saturating_add(16));
            self.text.reserve(needed);

            let (result, read, _) = self.decoder.decode_to_string(src, &mut self.text, last);
            src = &src[read..];

            if let CoderResult::InputEmpty = result {
                break;
            }
        }
    }
}

pub(crate) struct FileAccumulator {
    file_name: String,
    content_type: Option<mime::Mime>,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
}

impl FileAccumulator {
    pub(crate) fn new(file_name: String, content_type: Option<mime::Mime>, headers: HeaderMap) -> Self {
        FileAccumulator {
            file_name,
            content_type,
            headers,
            chunks: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.chunks.push(Bytes::copy_from_slice(bytes));
    }

    pub(crate) fn finish(self) -> File {
        File {
            file_name: self.file_name,
            content_type: self.content_type,
            headers: self.headers,
            chunks: self.chunks,
        }
    }
}
