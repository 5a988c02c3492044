//! A streaming builder for `multipart/form-data` request bodies.
//!
//! Multipart encoding usually forces a choice: buffer the whole body to learn
//! its length, or stream it and give up `Content-Length`. For the common
//! upload shape (a handful of text fields plus one, possibly huge, file)
//! neither is necessary. The body is assembled as three concatenated
//! segments: an in-memory header segment holding every text part and the file
//! part's header, the file content read lazily from its source, and the fixed
//! closing boundary. The total length is known as soon as the file's size is,
//! and the file is only read while the body streams out.
//!
//! # Examples
//!
//! ```
//! use std::io::Read;
//!
//! use formstream::FormStream;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut form = FormStream::new();
//! form.add_field("caption", "march report")?;
//! form.add_file("file", "Cargo.toml")?;
//!
//! let content_length = form.content_length();
//!
//! let mut body = Vec::new();
//! form.into_reader().read_to_end(&mut body)?;
//! assert_eq!(body.len() as u64, content_length);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! To hand the body to an HTTP client, either consume the stream from
//! [`FormStream::into_reader`] yourself, or let [`FormStream::into_request`]
//! assemble a complete [`http::Request`] with the `Content-Type` and
//! `Content-Length` headers already in place.

pub use chain::ChainedReader;
pub use error::Error;
pub use form_stream::{BodyReader, FormStream};

mod boundary;
mod chain;
mod constants;
mod content_disposition;
mod error;
mod form_stream;

/// A Result type often returned from methods that can have `formstream`
/// errors.
pub type Result<T> = std::result::Result<T, Error>;
