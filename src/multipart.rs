use crate::boundary::Boundary;
use crate::constants::{self, COLON, CR, HYPHEN, LF, SPACE};
use crate::state::{MarkKind, Marks, ParserState};
use crate::Handler;

/// An incremental parser for `multipart/*` bodies.
///
/// Bytes are pushed in with [`write`](MultipartParser::write) in chunks of any
/// size and the parser reports what it finds to its [`Handler`]. Splitting the
/// same body at different offsets produces the same events, except that a
/// header name, header value or body may arrive in more pieces.
///
/// # Examples
///
/// ```
/// use partwise::{Handler, MultipartParser};
///
/// #[derive(Default)]
/// struct Collect(Vec<u8>);
///
/// impl Handler for Collect {
///     fn on_part_data(&mut self, bytes: &[u8]) -> partwise::Result<()> {
///         self.0.extend_from_slice(bytes);
///         Ok(())
///     }
/// }
///
/// # fn run() -> partwise::Result<()> {
/// let mut parser = MultipartParser::new("X", Collect::default())?;
///
/// parser.write(b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhel")?;
/// parser.write(b"lo\r\n--X--")?;
/// parser.end()?;
///
/// assert_eq!(parser.into_handler().0, b"hello");
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct MultipartParser<H> {
    boundary: Boundary,
    lookbehind: Vec<u8>,
    state: ParserState,
    index: usize,
    matched_part_boundary: bool,
    matched_last_boundary: bool,
    marks: Marks,
    poisoned: bool,
    handler: H,
}

impl<H: Handler> MultipartParser<H> {
    /// Creates a parser for the given boundary token, as found in the
    /// `boundary` parameter of the `Content-Type` header.
    pub fn new<B: AsRef<str>>(boundary: B, handler: H) -> crate::Result<Self> {
        let boundary = Boundary::new(boundary.as_ref())?;
        let lookbehind = vec![0; boundary.len() + constants::LOOKBEHIND_PADDING];

        Ok(MultipartParser {
            boundary,
            lookbehind,
            state: ParserState::StartBoundary,
            // The opening delimiter line is not preceded by CRLF.
            index: constants::CRLF.len(),
            matched_part_boundary: false,
            matched_last_boundary: false,
            marks: Marks::default(),
            poisoned: false,
            handler,
        })
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Feeds the next chunk of the body.
    ///
    /// Any error is fatal for the whole body: the parser is poisoned and every
    /// later call fails with [`Error::ParserPoisoned`](crate::Error::ParserPoisoned).
    pub fn write(&mut self, chunk: &[u8]) -> crate::Result<()> {
        if self.poisoned {
            return Err(crate::Error::ParserPoisoned);
        }

        let res = self.process(chunk);
        if res.is_err() {
            trace!("multipart write failed in state {:?}: {:?}", self.state, res);
            self.poisoned = true;
        }

        res
    }

    /// Signals that the body is complete.
    ///
    /// Succeeds when the closing boundary was consumed, or when the stream
    /// stopped right after a delimiter line in a way that still closes the
    /// current part, in which case the final part end is reported.
    pub fn end(&mut self) -> crate::Result<()> {
        if self.poisoned {
            return Err(crate::Error::ParserPoisoned);
        }

        let clean = match self.state {
            ParserState::HeaderFieldStart => self.index == 0,
            ParserState::PartData => self.index == self.boundary.len(),
            ParserState::End => return Ok(()),
            _ => false,
        };

        if !clean {
            trace!("multipart stream ended unexpectedly in state {:?}", self.state);
            self.poisoned = true;
            return Err(crate::Error::UnexpectedEndOfStream { state: self.state });
        }

        self.state = ParserState::End;
        trace!("multipart stream ended without closing delimiter");

        if let Err(err) = self.handler.on_part_end() {
            self.poisoned = true;
            return Err(err);
        }

        Ok(())
    }

    fn process(&mut self, data: &[u8]) -> crate::Result<()> {
        let len = data.len();
        let boundary_len = self.boundary.len();
        let boundary_end = boundary_len - 1;

        let mut state = self.state;
        let mut index = self.index;
        let mut i = 0;

        while i < len {
            let mut c = data[i];

            match state {
                ParserState::StartBoundary => {
                    if index == boundary_len {
                        match c {
                            HYPHEN => self.matched_last_boundary = true,
                            CR => {}
                            _ => return Err(crate::Error::MalformedBoundaryLine { byte: c }),
                        }
                        index += 1;
                    } else if index == boundary_len + 1 {
                        if self.matched_last_boundary && c == HYPHEN {
                            self.matched_last_boundary = false;
                            state = ParserState::End;
                        } else if !self.matched_last_boundary && c == LF {
                            index = 0;
                            trace!("multipart part begins");
                            self.handler.on_part_begin()?;
                            state = ParserState::HeaderFieldStart;
                        } else {
                            return Err(crate::Error::MalformedBoundaryLine { byte: c });
                        }
                    } else {
                        // Resynchronise on a full `\r\n--boundary` after any mismatch.
                        if c != self.boundary.at(index) {
                            index = 0;
                        }
                        if c == self.boundary.at(index) {
                            index += 1;
                        }
                    }
                }
                ParserState::HeaderFieldStart => {
                    state = ParserState::HeaderField;
                    self.marks.set(MarkKind::HeaderField, i);
                    index = 0;
                    continue;
                }
                ParserState::HeaderField => {
                    if c == CR {
                        // Only a blank line may end the header block; a name without a colon is malformed.
                        if index > 0 {
                            return Err(crate::Error::InvalidHeaderField { byte: c, position: index });
                        }
                        self.marks.clear(MarkKind::HeaderField);
                        state = ParserState::HeadersAlmostDone;
                    } else {
                        index += 1;

                        if c == COLON {
                            if index == 1 {
                                return Err(crate::Error::InvalidHeaderField { byte: c, position: 0 });
                            }
                            self.data_callback(MarkKind::HeaderField, data, i, true)?;
                            state = ParserState::HeaderValueStart;
                        } else if c != HYPHEN && !c.is_ascii_alphabetic() {
                            return Err(crate::Error::InvalidHeaderField {
                                byte: c,
                                position: index - 1,
                            });
                        }
                    }
                }
                ParserState::HeaderValueStart => {
                    if c != SPACE {
                        self.marks.set(MarkKind::HeaderValue, i);
                        state = ParserState::HeaderValue;
                        continue;
                    }
                }
                ParserState::HeaderValue => match memchr::memchr(CR, &data[i..]) {
                    Some(offset) => {
                        i += offset;
                        self.data_callback(MarkKind::HeaderValue, data, i, true)?;
                        self.handler.on_header_end()?;
                        state = ParserState::HeaderValueAlmostDone;
                    }
                    None => break,
                },
                ParserState::HeaderValueAlmostDone => {
                    if c != LF {
                        return Err(crate::Error::MalformedHeaderLine { byte: c });
                    }
                    state = ParserState::HeaderFieldStart;
                }
                ParserState::HeadersAlmostDone => {
                    if c != LF {
                        return Err(crate::Error::MalformedHeaderLine { byte: c });
                    }
                    self.handler.on_headers_end()?;
                    state = ParserState::PartDataStart;
                }
                ParserState::PartDataStart => {
                    state = ParserState::PartData;
                    self.marks.set(MarkKind::PartData, i);
                    continue;
                }
                ParserState::PartData => {
                    let prev_index = index;

                    if index == 0 {
                        // No boundary can start within the next `boundary_len` bytes
                        // unless the last of them occurs in the boundary.
                        i += boundary_end;
                        while i < len && !self.boundary.contains(data[i]) {
                            i += boundary_len;
                        }
                        i -= boundary_end;

                        if i >= len {
                            break;
                        }
                        c = data[i];
                    }

                    if index < boundary_len {
                        if self.boundary.at(index) == c {
                            if index == 0 {
                                self.data_callback(MarkKind::PartData, data, i, true)?;
                            }
                            index += 1;
                        } else {
                            index = 0;
                        }
                    } else if index == boundary_len {
                        index += 1;
                        match c {
                            CR => self.matched_part_boundary = true,
                            HYPHEN => self.matched_last_boundary = true,
                            _ => index = 0,
                        }
                    } else if index == boundary_len + 1 {
                        if self.matched_part_boundary {
                            index = 0;
                            if c == LF {
                                self.matched_part_boundary = false;
                                trace!("multipart part ends, next part begins");
                                self.handler.on_part_end()?;
                                self.handler.on_part_begin()?;
                                state = ParserState::HeaderFieldStart;
                                i += 1;
                                continue;
                            }
                        } else if self.matched_last_boundary && c == HYPHEN {
                            self.matched_last_boundary = false;
                            trace!("multipart closing delimiter reached");
                            self.handler.on_part_end()?;
                            state = ParserState::End;
                        } else {
                            index = 0;
                        }
                    }

                    if index > 0 {
                        self.lookbehind[index - 1] = c;
                    } else if prev_index > 0 {
                        // The candidate boundary was a false lead, its bytes belong to the body.
                        self.matched_part_boundary = false;
                        self.matched_last_boundary = false;
                        self.handler.on_part_data(&self.lookbehind[..prev_index])?;
                        self.marks.set(MarkKind::PartData, i);
                        // `c` may open a new candidate, look at it again.
                        continue;
                    }
                }
                ParserState::End => break,
            }

            i += 1;
        }

        self.data_callback(MarkKind::HeaderField, data, len, false)?;
        self.data_callback(MarkKind::HeaderValue, data, len, false)?;
        self.data_callback(MarkKind::PartData, data, len, false)?;

        self.state = state;
        self.index = index;

        Ok(())
    }

    /// Emits `data[mark..end]` for an open mark. A cleared mark is closed, an
    /// uncleared one carries over to offset 0 of the next chunk.
    fn data_callback(&mut self, kind: MarkKind, data: &[u8], end: usize, clear: bool) -> crate::Result<()> {
        let start = match *self.marks.slot(kind) {
            Some(start) => start,
            None => return Ok(()),
        };

        if clear {
            self.marks.clear(kind);
        } else {
            self.marks.set(kind, 0);
        }

        if start == end {
            return Ok(());
        }

        let bytes = &data[start..end];
        match kind {
            MarkKind::HeaderField => self.handler.on_header_field(bytes),
            MarkKind::HeaderValue => self.handler.on_header_value(bytes),
            MarkKind::PartData => self.handler.on_part_data(bytes),
        }
    }
}
