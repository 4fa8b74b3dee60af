use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Converts one accumulated header line into typed form and appends it.
pub(crate) fn append_raw_header(headers: &mut HeaderMap, name: &[u8], value: &[u8]) -> crate::Result<HeaderName> {
    let name = HeaderName::from_bytes(name).map_err(|err| crate::Error::DecodeHeaderName {
        name: String::from_utf8_lossy(name).into_owned(),
        cause: err.into(),
    })?;

    let value = HeaderValue::from_bytes(value).map_err(|err| crate::Error::DecodeHeaderValue {
        value: value.to_owned(),
        cause: err.into(),
    })?;

    headers.append(name.clone(), value);

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_append_raw_header() {
        let mut headers = HeaderMap::new();

        let name = append_raw_header(&mut headers, b"Content-Type", b"text/plain").unwrap();
        assert_eq!(name, header::CONTENT_TYPE);

        append_raw_header(&mut headers, b"X-Tag", b"a").unwrap();
        append_raw_header(&mut headers, b"x-tag", b"b").unwrap();

        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_append_raw_header_rejects_control_bytes() {
        let mut headers = HeaderMap::new();
        let err = append_raw_header(&mut headers, b"X-Tag", b"a\x00b").unwrap_err();
        assert!(matches!(err, crate::Error::DecodeHeaderValue { .. }));
    }

    #[test]
    fn test_append_raw_header_rejects_del_in_file_name() {
        let mut headers = HeaderMap::new();

        let err = append_raw_header(&mut headers, b"Content-Disposition", b"form-data; filename=\"x\x7f.txt\"").unwrap_err();
        assert!(matches!(err, crate::Error::DecodeHeaderValue { .. }));
        assert!(headers.is_empty());
    }
}
