/// Receives the events produced by a [`MultipartParser`](crate::MultipartParser).
///
/// Every method defaults to a no-op. Byte-range events may fire several times
/// for one logical header name, header value or body, once for every chunk
/// that carries a piece of it, so implementations must append rather than
/// replace. The slices are only valid for the duration of the call.
///
/// Returning an error aborts the running [`write`](crate::MultipartParser::write)
/// or [`end`](crate::MultipartParser::end) call and poisons the parser.
pub trait Handler {
    /// A new part starts; its headers follow.
    fn on_part_begin(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// A piece of a header name.
    fn on_header_field(&mut self, _bytes: &[u8]) -> crate::Result<()> {
        Ok(())
    }

    /// A piece of a header value.
    fn on_header_value(&mut self, _bytes: &[u8]) -> crate::Result<()> {
        Ok(())
    }

    /// The current header line is complete.
    fn on_header_end(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// The header block of the current part is complete.
    fn on_headers_end(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// A piece of the current part's body.
    fn on_part_data(&mut self, _bytes: &[u8]) -> crate::Result<()> {
        Ok(())
    }

    /// The current part is complete.
    fn on_part_end(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

/// Discards every event. Useful to validate a body without keeping it.
impl Handler for () {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_part_begin(&mut self) -> crate::Result<()> {
        (**self).on_part_begin()
    }

    fn on_header_field(&mut self, bytes: &[u8]) -> crate::Result<()> {
        (**self).on_header_field(bytes)
    }

    fn on_header_value(&mut self, bytes: &[u8]) -> crate::Result<()> {
        (**self).on_header_value(bytes)
    }

    fn on_header_end(&mut self) -> crate::Result<()> {
        (**self).on_header_end()
    }

    fn on_headers_end(&mut self) -> crate::Result<()> {
        (**self).on_headers_end()
    }

    fn on_part_data(&mut self, bytes: &[u8]) -> crate::Result<()> {
        (**self).on_part_data(bytes)
    }

    fn on_part_end(&mut self) -> crate::Result<()> {
        (**self).on_part_end()
    }
}
