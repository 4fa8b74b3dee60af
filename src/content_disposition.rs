use crate::constants;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ContentDisposition {
    pub(crate) field_name: Option<String>,
    pub(crate) file_name: Option<String>,
}

impl ContentDisposition {
    pub(crate) fn parse(value: &str) -> ContentDisposition {
        let field_name = constants::CONTENT_DISPOSITION_FIELD_NAME_RE
            .captures(value)
            .and_then(|cap| cap.get(2).or_else(|| cap.get(3)))
            .map(|m| m.as_str().to_owned());

        let file_name = constants::CONTENT_DISPOSITION_FILE_NAME_RE
            .captures(value)
            .and_then(|cap| cap.get(2).or_else(|| cap.get(3)))
            .map(|m| decode_file_name(m.as_str()));

        ContentDisposition { field_name, file_name }
    }

    /// Parts carrying a non-empty filename are files, everything else is text.
    pub(crate) fn is_file(&self) -> bool {
        self.file_name.as_deref().map_or(false, |name| !name.is_empty())
    }
}

/// Strips any Windows-style directory prefix, then undoes `%22` quoting and
/// four-digit numeric character references.
fn decode_file_name(raw: &str) -> String {
    let base = match raw.rfind('\\') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    let unquoted = base.replace("%22", "\"");

    let decoded = constants::NUMERIC_CHAR_REF_RE
        .replace_all(&unquoted, |cap: &regex::Captures| {
            cap[1]
                .parse::<u32>()
                .ok()
                .and_then(std::char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| cap[0].to_owned())
        })
        .into_owned();

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_field() {
        let cd = ContentDisposition::parse(r#"form-data; name="field1""#);
        assert_eq!(cd.field_name.as_deref(), Some("field1"));
        assert_eq!(cd.file_name, None);
        assert!(!cd.is_file());
    }

    #[test]
    fn test_parse_file_field() {
        let cd = ContentDisposition::parse(r#"form-data; name="upload"; filename="a.txt""#);
        assert_eq!(cd.field_name.as_deref(), Some("upload"));
        assert_eq!(cd.file_name.as_deref(), Some("a.txt"));
        assert!(cd.is_file());
    }

    #[test]
    fn test_empty_file_name_is_text() {
        let cd = ContentDisposition::parse(r#"form-data; name="upload"; filename="""#);
        assert_eq!(cd.file_name.as_deref(), Some(""));
        assert!(!cd.is_file());
    }

    #[test]
    fn test_unterminated_file_name_token_is_ignored() {
        let cd = ContentDisposition::parse(r#"form-data; name="upload"; filename="a.txt";x"#);
        assert_eq!(cd.file_name, None);
    }

    #[test]
    fn test_decode_file_name() {
        assert_eq!(decode_file_name(r"C:\Users\me\report.pdf"), "report.pdf");
        assert_eq!(decode_file_name("say %22hi%22.txt"), "say \"hi\".txt");
        assert_eq!(decode_file_name("caf&#0233;.txt"), "café.txt");
        assert_eq!(decode_file_name("&#0065;&#0066;"), "AB");
        assert_eq!(decode_file_name("plain.txt"), "plain.txt");
    }
}
