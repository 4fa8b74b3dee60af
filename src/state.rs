/// Where in the multipart grammar the parser currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Scanning for the opening boundary line.
    StartBoundary,
    HeaderFieldStart,
    HeaderField,
    HeaderValueStart,
    HeaderValue,
    /// Expecting the `LF` that closes a header line.
    HeaderValueAlmostDone,
    /// Expecting the `LF` of the blank line that closes the header block.
    HeadersAlmostDone,
    PartDataStart,
    PartData,
    /// The closing boundary was consumed; further input is ignored.
    End,
}

/// One open slice start per callback kind, valid within the current chunk.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Marks {
    pub(crate) header_field: Option<usize>,
    pub(crate) header_value: Option<usize>,
    pub(crate) part_data: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkKind {
    HeaderField,
    HeaderValue,
    PartData,
}

impl Marks {
    pub(crate) fn slot(&mut self, kind: MarkKind) -> &mut Option<usize> {
        match kind {
            MarkKind::HeaderField => &mut self.header_field,
            MarkKind::HeaderValue => &mut self.header_value,
            MarkKind::PartData => &mut self.part_data,
        }
    }

    pub(crate) fn set(&mut self, kind: MarkKind, offset: usize) {
        *self.slot(kind) = Some(offset);
    }

    pub(crate) fn clear(&mut self, kind: MarkKind) {
        *self.slot(kind) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_are_independent() {
        let mut marks = Marks::default();
        marks.set(MarkKind::HeaderField, 3);
        marks.set(MarkKind::PartData, 7);
        marks.clear(MarkKind::HeaderField);

        assert_eq!(marks.header_field, None);
        assert_eq!(marks.header_value, None);
        assert_eq!(marks.part_data, Some(7));
        assert_eq!(*marks.slot(MarkKind::PartData), Some(7));
    }
}
