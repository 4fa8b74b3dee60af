use std::mem;

use bytes::Bytes;
use futures_util::pin_mut;
use futures_util::stream::{Stream, StreamExt};
use http::header::{self, HeaderMap};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

use crate::constraints::Constraints;
use crate::content_disposition::ContentDisposition;
use crate::field::{Accumulator, FileAccumulator, TextAccumulator, Value};
use crate::helpers;
use crate::{File, Handler, MultipartParser};

/// The parts of a `multipart/form-data` body, in the order they arrived.
///
/// Several entries may share a name.
///
/// # Examples
///
/// ```
/// use partwise::FormData;
///
/// let body = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
/// let form = FormData::from_bytes(body.as_bytes(), "X-BOUNDARY").unwrap();
///
/// assert_eq!(form.text("my_text_field"), Some("abcd"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, Value)>,
}

impl FormData {
    pub fn new() -> FormData {
        FormData::default()
    }

    /// Parses a complete in-memory body.
    pub fn from_bytes<B: AsRef<str>>(body: &[u8], boundary: B) -> crate::Result<FormData> {
        FormData::from_bytes_with_constraints(body, boundary, Constraints::default())
    }

    pub fn from_bytes_with_constraints<B: AsRef<str>>(
        body: &[u8],
        boundary: B,
        constraints: Constraints,
    ) -> crate::Result<FormData> {
        let mut parser = FormDataParser::with_constraints(boundary, constraints)?;
        parser.write(body)?;
        parser.finish()
    }

    /// Parses a body delivered as a stream of chunks.
    ///
    /// # Examples
    ///
    /// ```
    /// use partwise::FormData;
    /// use bytes::Bytes;
    /// use std::convert::Infallible;
    /// use futures_util::stream::once;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
    ///
    /// let form = FormData::from_stream(stream, "X-BOUNDARY").await.unwrap();
    /// assert_eq!(form.text("my_text_field"), Some("abcd"));
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    pub async fn from_stream<S, O, E, B>(stream: S, boundary: B) -> crate::Result<FormData>
    where
        S: Stream<Item = Result<O, E>>,
        O: Into<Bytes>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        B: AsRef<str>,
    {
        FormData::from_stream_with_constraints(stream, boundary, Constraints::default()).await
    }

    pub async fn from_stream_with_constraints<S, O, E, B>(
        stream: S,
        boundary: B,
        constraints: Constraints,
    ) -> crate::Result<FormData>
    where
        S: Stream<Item = Result<O, E>>,
        O: Into<Bytes>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        B: AsRef<str>,
    {
        let mut parser = FormDataParser::with_constraints(boundary, constraints)?;

        pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|err| crate::Error::StreamReadFailed(err.into()))?.into();
            parser.write(&chunk)?;
        }

        parser.finish()
    }

    /// Parses a body read from an [`AsyncRead`].
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use partwise::FormData;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let reader = data.as_bytes();
    ///
    /// let form = FormData::from_reader(reader, "X-BOUNDARY").await.unwrap();
    /// assert_eq!(form.text("my_text_field"), Some("abcd"));
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub async fn from_reader<R, B>(reader: R, boundary: B) -> crate::Result<FormData>
    where
        R: AsyncRead,
        B: AsRef<str>,
    {
        FormData::from_stream(ReaderStream::new(reader), boundary).await
    }

    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub async fn from_reader_with_constraints<R, B>(
        reader: R,
        boundary: B,
        constraints: Constraints,
    ) -> crate::Result<FormData>
    where
        R: AsyncRead,
        B: AsRef<str>,
    {
        FormData::from_stream_with_constraints(ReaderStream::new(reader), boundary, constraints).await
    }

    pub fn append<N: Into<String>>(&mut self, name: N, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// The first entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// The first entry with the given name, if it is a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// The first entry with the given name, if it is a file.
    pub fn file(&self, name: &str) -> Option<&File> {
        self.get(name).and_then(Value::as_file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FormData {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Assembles [`FormData`] from a body pushed in chunk by chunk.
///
/// # Examples
///
/// ```
/// use partwise::FormDataParser;
///
/// let mut parser = FormDataParser::new("X").unwrap();
/// parser.write(b"--X\r\nContent-Disposition: form-data; name=\"a\"; filename=\"a.txt\"\r\n").unwrap();
/// parser.write(b"\r\nfile body\r\n--X--").unwrap();
///
/// let form = parser.finish().unwrap();
/// assert_eq!(&form.file("a").unwrap().bytes()[..], b"file body");
/// ```
pub struct FormDataParser {
    parser: MultipartParser<FormDataHandler>,
    received: u64,
    stream_size_limit: u64,
}

impl FormDataParser {
    pub fn new<B: AsRef<str>>(boundary: B) -> crate::Result<FormDataParser> {
        FormDataParser::with_constraints(boundary, Constraints::default())
    }

    pub fn with_constraints<B: AsRef<str>>(boundary: B, constraints: Constraints) -> crate::Result<FormDataParser> {
        let stream_size_limit = constraints.size_limit.whole_stream;
        let parser = MultipartParser::new(boundary, FormDataHandler::new(constraints))?;

        Ok(FormDataParser {
            parser,
            received: 0,
            stream_size_limit,
        })
    }

    pub fn write(&mut self, chunk: &[u8]) -> crate::Result<()> {
        self.received += chunk.len() as u64;

        if self.received > self.stream_size_limit {
            return Err(crate::Error::StreamSizeExceeded {
                limit: self.stream_size_limit,
            });
        }

        self.parser.write(chunk)
    }

    /// Checks that the body was complete and returns the assembled entries.
    pub fn finish(mut self) -> crate::Result<FormData> {
        self.parser.end()?;
        Ok(self.parser.into_handler().form)
    }
}

/// Per-part bookkeeping, reset on every part begin.
#[derive(Default)]
struct PartContext {
    headers: HeaderMap,
    disposition: ContentDisposition,
    content_type: Option<mime::Mime>,
    size: u64,
    size_limit: u64,
    accumulator: Option<Accumulator>,
}

struct FormDataHandler {
    constraints: Constraints,
    form: FormData,
    header_field: Vec<u8>,
    header_value: Vec<u8>,
    part: PartContext,
}

impl FormDataHandler {
    fn new(constraints: Constraints) -> Self {
        FormDataHandler {
            constraints,
            form: FormData::new(),
            header_field: Vec::new(),
            header_value: Vec::new(),
            part: PartContext::default(),
        }
    }

    fn check_allowed(&self) -> crate::Result<()> {
        let field_name = self.part.disposition.field_name.as_deref();

        if !self.constraints.is_it_allowed(field_name) {
            return Err(crate::Error::UnknownField {
                field_name: field_name.map(str::to_owned),
            });
        }

        Ok(())
    }
}

impl Handler for FormDataHandler {
    fn on_part_begin(&mut self) -> crate::Result<()> {
        self.part = PartContext::default();
        self.header_field.clear();
        self.header_value.clear();
        Ok(())
    }

    fn on_header_field(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.header_field.extend_from_slice(bytes);
        Ok(())
    }

    fn on_header_value(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.header_value.extend_from_slice(bytes);
        Ok(())
    }

    fn on_header_end(&mut self) -> crate::Result<()> {
        let name = helpers::append_raw_header(&mut self.part.headers, &self.header_field, &self.header_value)?;

        if name == header::CONTENT_DISPOSITION {
            self.part.disposition = ContentDisposition::parse(&String::from_utf8_lossy(&self.header_value));
        } else if name == header::CONTENT_TYPE {
            self.part.content_type = String::from_utf8_lossy(&self.header_value).parse::<mime::Mime>().ok();
        }

        self.header_field.clear();
        self.header_value.clear();
        Ok(())
    }

    fn on_headers_end(&mut self) -> crate::Result<()> {
        self.check_allowed()?;

        let field_name = self.part.disposition.field_name.as_deref();
        self.part.size_limit = self.constraints.size_limit.extract_size_limit_for(field_name);

        let accumulator = if self.part.disposition.is_file() {
            let file_name = self.part.disposition.file_name.clone().unwrap_or_default();
            let headers = mem::take(&mut self.part.headers);
            Accumulator::File(FileAccumulator::new(file_name, self.part.content_type.clone(), headers))
        } else {
            Accumulator::Text(TextAccumulator::new(self.part.content_type.as_ref()))
        };
        self.part.accumulator = Some(accumulator);

        trace!("multipart field {:?} headers parsed", self.part.disposition.field_name);
        Ok(())
    }

    fn on_part_data(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.part.size += bytes.len() as u64;

        if self.part.size > self.part.size_limit {
            return Err(crate::Error::FieldSizeExceeded {
                limit: self.part.size_limit,
                field_name: self.part.disposition.field_name.clone(),
            });
        }

        if let Some(ref mut accumulator) = self.part.accumulator {
            accumulator.push(bytes);
        }

        Ok(())
    }

    fn on_part_end(&mut self) -> crate::Result<()> {
        let value = match self.part.accumulator.take() {
            Some(accumulator) => accumulator.finish(),
            None => {
                self.check_allowed()?;
                Value::Text(String::new())
            }
        };
        let name = self.part.disposition.field_name.take().unwrap_or_default();

        self.form.append(name, value);
        Ok(())
    }
}
