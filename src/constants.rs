use lazy_static::lazy_static;
use regex::Regex;

pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = std::u64::MAX;
pub(crate) const DEFAULT_PER_FIELD_SIZE_LIMIT: u64 = std::u64::MAX;

pub(crate) const BOUNDARY_EXT: &[u8] = b"--";
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Extra room in the lookbehind buffer past the boundary itself.
pub(crate) const LOOKBEHIND_PADDING: usize = 8;

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const SPACE: u8 = b' ';
pub(crate) const HYPHEN: u8 = b'-';
pub(crate) const COLON: u8 = b':';

lazy_static! {
    // quoted-string or token, RFC 2616 section 19.5.1
    pub(crate) static ref CONTENT_DISPOSITION_FIELD_NAME_RE: Regex =
        Regex::new(r#"(?i)\bname=("([^"]*)"|([^()<>@,;:\\"/\[\]?={}\s\t]+))"#).unwrap();
    pub(crate) static ref CONTENT_DISPOSITION_FILE_NAME_RE: Regex =
        Regex::new(r#"(?i)\bfilename=("(.*?)"|([^()<>@,;:\\"/\[\]?={}\s\t]+))($|;\s)"#).unwrap();
    pub(crate) static ref NUMERIC_CHAR_REF_RE: Regex = Regex::new(r"&#(\d{4});").unwrap();
}
