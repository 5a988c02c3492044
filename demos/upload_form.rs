use std::io::Read;

// Import formstream types.
use formstream::FormStream;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create an empty form; the boundary is generated here.
    let mut form = FormStream::new();

    // Add the text fields, then the file. The file is opened but not read.
    form.add_fields(vec![("chat_id", "88743"), ("caption", "march report")])?;
    form.add_file("document", "Cargo.toml")?;

    // Turn the form into a request with Content-Type and Content-Length set.
    let request = form.into_request(http::Request::post("https://api.example.com/upload"))?;

    println!("{}: {}", CONTENT_TYPE, request.headers()[CONTENT_TYPE].to_str()?);
    println!("{}: {}", CONTENT_LENGTH, request.headers()[CONTENT_LENGTH].to_str()?);

    // A real client would stream this body over the wire.
    let mut body = Vec::new();
    request.into_body().read_to_end(&mut body)?;
    println!("streamed {} body bytes", body.len());

    Ok(())
}
