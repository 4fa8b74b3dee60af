use bytes::Bytes;
use futures_util::stream;
use partwise::{Constraints, Error, FormData, MultipartParser, SizeLimit, Value};

const BODY: &str = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

fn char_stream(data: &'static str) -> impl futures_util::stream::Stream<Item = partwise::Result<Bytes>> {
    stream::iter(
        data.chars()
            .map(|ch| ch.to_string())
            .map(|part| partwise::Result::Ok(Bytes::copy_from_slice(part.as_bytes()))),
    )
}

#[tokio::test]
async fn test_multipart_basic() {
    let form = FormData::from_stream(char_stream(BODY), "X-BOUNDARY").await.unwrap();

    let entries: Vec<_> = form.iter().collect();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].0, "My Field");
    assert_eq!(entries[0].1, &Value::Text("abcd".to_owned()));

    assert_eq!(entries[1].0, "File Field");
    let file = entries[1].1.as_file().unwrap();
    assert_eq!(file.file_name(), "a-text-file.txt");
    assert_eq!(file.content_type(), Some(&mime::TEXT_PLAIN));
    assert_eq!(&file.bytes()[..], &b"Hello world\nHello\r\nWorld\rAgain"[..]);
}

#[tokio::test]
async fn test_multipart_empty() {
    let form = FormData::from_stream(char_stream("--X-BOUNDARY--\r\n"), "X-BOUNDARY")
        .await
        .unwrap();

    assert!(form.is_empty());
}

#[tokio::test]
async fn test_multipart_boundary_from_content_type() {
    let boundary = partwise::parse_boundary("multipart/form-data; boundary=X-BOUNDARY").unwrap();
    let form = FormData::from_stream(char_stream(BODY), boundary).await.unwrap();

    assert_eq!(form.text("My Field"), Some("abcd"));
}

#[tokio::test]
async fn test_multipart_truncated_stream() {
    let err = FormData::from_stream(char_stream(&BODY[..BODY.len() - 20]), "X-BOUNDARY")
        .await
        .unwrap_err();

    assert!(err.is_parse_error());
}

#[tokio::test]
async fn test_multipart_stream_read_failure() {
    let chunks = vec![
        Ok(Bytes::from_static(b"--X-BOUNDARY\r\n")),
        Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset")),
    ];

    let err = FormData::from_stream(stream::iter(chunks), "X-BOUNDARY")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::StreamReadFailed(_)));
}

#[tokio::test]
async fn test_multipart_constraints() {
    let constraints = Constraints::new()
        .allowed_fields(vec!["My Field", "File Field"])
        .size_limit(SizeLimit::new().per_field(30).for_field("My Field", 3));

    let err = FormData::from_stream_with_constraints(char_stream(BODY), "X-BOUNDARY", constraints)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        Error::FieldSizeExceeded {
            limit: 3,
            field_name: Some("My Field".to_owned())
        }
    );
}

#[tokio::test]
async fn test_multipart_binary_file() {
    let mut body = b"--b\r\nContent-Disposition: form-data; name=\"bin\"; filename=\"C:\\\\tmp\\\\blob.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    body.extend_from_slice(&payload);
    body.extend_from_slice(b"\r\n--b--\r\n");

    let chunks: Vec<partwise::Result<Bytes>> = body.chunks(7).map(|c| Ok(Bytes::copy_from_slice(c))).collect();
    let form = FormData::from_stream(stream::iter(chunks), "b").await.unwrap();

    let file = form.file("bin").unwrap();
    assert_eq!(file.file_name(), "blob.bin");
    assert_eq!(file.content_type(), Some(&mime::APPLICATION_OCTET_STREAM));
    assert_eq!(file.len(), payload.len());
    assert_eq!(&file.bytes()[..], &payload[..]);
}

#[cfg(feature = "tokio-io")]
#[tokio::test]
async fn test_multipart_from_reader() {
    let form = FormData::from_reader(BODY.as_bytes(), "X-BOUNDARY").await.unwrap();
    assert_eq!(form.len(), 2);
}

#[test]
fn test_parser_validates_without_handler() {
    let mut parser = MultipartParser::new("X-BOUNDARY", ()).unwrap();

    for chunk in BODY.as_bytes().chunks(5) {
        parser.write(chunk).unwrap();
    }

    parser.end().unwrap();
    assert_eq!(parser.state(), partwise::ParserState::End);
}
