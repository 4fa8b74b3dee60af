use tokio::io::AsyncRead;
// Import partwise types.
use partwise::FormData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate an `AsyncRead` and the content type from somewhere e.g. server request body.
    let (reader, content_type) = get_async_reader_from_somewhere().await;

    // Extract the boundary and parse the whole body.
    let boundary = partwise::parse_boundary(content_type)?;
    let form = FormData::from_reader(reader, boundary).await?;

    for (name, value) in form.iter() {
        match value.as_file() {
            Some(file) => println!("Name: {:?}, File Name: {:?}, Size: {}", name, file.file_name(), file.len()),
            None => println!("Name: {:?}, Content: {:?}", name, value.as_text()),
        }
    }

    Ok(())
}

// Generate an `AsyncRead` and the content type from somewhere e.g. server request body.
async fn get_async_reader_from_somewhere() -> (impl AsyncRead, &'static str) {
    let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

    (data.as_bytes(), "multipart/form-data; boundary=X-BOUNDARY")
}
