use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::{Buf, Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::chain::ChainedReader;
use crate::{boundary, constants, content_disposition, Error};

/// Represents a `multipart/form-data` request body under construction.
///
/// Text parts and the file part's header are rendered into an in-memory
/// segment as they are added, and the closing boundary is rendered up front.
/// The file content itself stays behind its reader until the body streams
/// out, so [`content_length`](FormStream::content_length) is exact without a
/// single content byte being read.
///
/// The file part is always the last part of the body. Once it is declared,
/// adding anything else fails with [`Error::PartAfterFile`].
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// use formstream::FormStream;
///
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut form = FormStream::new();
/// form.add_field("purpose", "backup")?;
/// form.add_reader("file", "notes.txt", 5, "hello".as_bytes())?;
///
/// let content_length = form.content_length();
///
/// let mut body = Vec::new();
/// form.into_reader().read_to_end(&mut body)?;
/// assert_eq!(body.len() as u64, content_length);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub struct FormStream {
    boundary: String,
    content_type: String,
    head: BytesMut,
    file: Option<FileSource>,
    tail: Bytes,
}

struct FileSource {
    reader: Box<dyn Read + Send>,
    len: u64,
}

impl FormStream {
    /// Creates an empty form with a freshly generated boundary.
    ///
    /// The boundary, the `Content-Type` value and the closing segment are
    /// fixed from this point on; only parts accumulate.
    pub fn new() -> FormStream {
        let boundary = boundary::generate();
        let content_type = format!("{}; {}={}", mime::MULTIPART_FORM_DATA, mime::BOUNDARY.as_str(), boundary);
        let tail = Bytes::from(format!(
            "{}{}{}{}{}",
            constants::CRLF,
            constants::BOUNDARY_EXT,
            boundary,
            constants::BOUNDARY_EXT,
            constants::CRLF
        ));

        FormStream {
            boundary,
            content_type,
            head: BytesMut::new(),
            file: None,
            tail,
        }
    }

    /// Appends one text part holding `value`.
    ///
    /// Text parts land ahead of the file part in the body, so add them before
    /// declaring the file. The value is written as-is; the name has quotes
    /// and backslashes escaped, and is refused if it contains CR or LF.
    pub fn add_field(&mut self, name: &str, value: &str) -> crate::Result<()> {
        if self.file.is_some() {
            return Err(Error::PartAfterFile(name.to_owned()));
        }

        let header = content_disposition::render_field(name)?;
        self.open_part();
        self.head.extend_from_slice(header.as_bytes());
        self.head.extend_from_slice(value.as_bytes());

        #[cfg(feature = "log")]
        log::trace!("text part '{}' added, {} value bytes", name, value.len());

        Ok(())
    }

    /// Appends one text part per `(name, value)` entry, in iteration order.
    ///
    /// Insertion-ordered inputs keep their order in the body; for unordered
    /// maps such as `HashMap` the part order is unspecified. Stops at the
    /// first entry that fails; entries appended before that stay in the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use formstream::FormStream;
    ///
    /// # fn run() -> formstream::Result<()> {
    /// let mut form = FormStream::new();
    /// form.add_fields(vec![("chat_id", "88743"), ("caption", "march report")])?;
    /// # Ok(())
    /// # }
    /// # run().unwrap();
    /// ```
    pub fn add_fields<I, K, V>(&mut self, fields: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in fields {
            self.add_field(name.as_ref(), value.as_ref())?;
        }

        Ok(())
    }

    /// Declares the file part: renders its header and stores `reader` without
    /// touching it.
    ///
    /// `reader` is first read when the stream from
    /// [`into_reader`](FormStream::into_reader) reaches the file segment, and
    /// at most `len` bytes are taken from it, so a source that grew after
    /// `len` was captured cannot break the advertised length. A source that
    /// shrank yields a body shorter than advertised, which the peer will
    /// reject.
    pub fn add_reader<R>(&mut self, name: &str, file_name: &str, len: u64, reader: R) -> crate::Result<()>
    where
        R: Read + Send + 'static,
    {
        if self.file.is_some() {
            return Err(Error::PartAfterFile(name.to_owned()));
        }

        let header = content_disposition::render_file(name, file_name)?;
        self.open_part();
        self.head.extend_from_slice(header.as_bytes());
        self.file = Some(FileSource {
            reader: Box::new(reader.take(len)),
            len,
        });

        #[cfg(feature = "log")]
        log::trace!("file part '{}' declared, {} content bytes", name, len);

        Ok(())
    }

    /// Declares the file part from a path.
    ///
    /// The file is opened and its length captured immediately, but nothing is
    /// read from it until the body streams. The part's file name is the
    /// path's final component.
    ///
    /// # Examples
    ///
    /// ```
    /// use formstream::FormStream;
    ///
    /// # fn run() -> formstream::Result<()> {
    /// let mut form = FormStream::new();
    /// form.add_file("manifest", "Cargo.toml")?;
    /// assert!(form.content_length() > 0);
    /// # Ok(())
    /// # }
    /// # run().unwrap();
    /// ```
    pub fn add_file<P>(&mut self, name: &str, path: P) -> crate::Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::NoFileName { path: path.to_owned() })?;

        let file = File::open(path).map_err(|cause| Error::FileSourceFailed {
            path: path.to_owned(),
            cause,
        })?;
        let metadata = file.metadata().map_err(|cause| Error::FileSourceFailed {
            path: path.to_owned(),
            cause,
        })?;

        if !metadata.is_file() {
            return Err(Error::NotAFile { path: path.to_owned() });
        }

        self.add_reader(name, file_name, metadata.len(), file)
    }

    /// Fills the whole form in one call: every entry of `fields` as a text
    /// part, then the file at `path` under the name `file_field`.
    ///
    /// Stops at the first failure; parts added before it stay in the body.
    pub fn add_form<P, I, K, V>(&mut self, file_field: &str, path: P, fields: I) -> crate::Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.add_fields(fields)?;
        self.add_file(file_field, path)
    }

    /// The boundary token separating the parts of this body.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value for this body, in the form
    /// `multipart/form-data; boundary=<token>`.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The exact byte length of the stream
    /// [`into_reader`](FormStream::into_reader) will produce.
    ///
    /// Pure arithmetic over the finished segments and the declared file
    /// length; before the file part is declared this is the length of a
    /// fields-only body.
    pub fn content_length(&self) -> u64 {
        let file_len = self.file.as_ref().map_or(0, |file| file.len);

        file_len
            .saturating_add(self.head.len() as u64)
            .saturating_add(self.tail.len() as u64)
    }

    /// Turns the form into its byte stream: the header segment, then the file
    /// content read lazily from its source, then the closing boundary.
    ///
    /// With no file declared the stream is the header segment followed
    /// directly by the closing boundary, a well-formed fields-only body.
    pub fn into_reader(self) -> BodyReader {
        #[cfg(feature = "log")]
        log::trace!(
            "streaming body: {} header bytes, {} file bytes, {} closing bytes",
            self.head.len(),
            self.file.as_ref().map_or(0, |file| file.len),
            self.tail.len()
        );

        let mut sources: Vec<Box<dyn Read + Send>> = Vec::with_capacity(3);
        sources.push(Box::new(self.head.freeze().reader()));
        if let Some(file) = self.file {
            sources.push(file.reader);
        }
        sources.push(Box::new(self.tail.reader()));

        BodyReader {
            sources: ChainedReader::new(sources),
        }
    }

    /// Assembles an outbound request: sets `Content-Type` and
    /// `Content-Length` on the supplied builder and finishes it with the
    /// streaming body.
    ///
    /// # Examples
    ///
    /// ```
    /// use formstream::FormStream;
    ///
    /// # fn run() -> formstream::Result<()> {
    /// let mut form = FormStream::new();
    /// form.add_field("note", "weekly report")?;
    ///
    /// let request = form.into_request(http::Request::post("https://api.example.com/upload"))?;
    /// assert!(request.headers().contains_key(http::header::CONTENT_LENGTH));
    /// # Ok(())
    /// # }
    /// # run().unwrap();
    /// ```
    pub fn into_request(self, builder: http::request::Builder) -> crate::Result<http::Request<BodyReader>> {
        let builder = builder
            .header(CONTENT_TYPE, self.content_type.as_str())
            .header(CONTENT_LENGTH, self.content_length());

        builder.body(self.into_reader()).map_err(Error::RequestBuildFailed)
    }

    /// Writes the boundary line that opens the next part. Every part after
    /// the first also terminates the previous part's content.
    fn open_part(&mut self) {
        if !self.head.is_empty() {
            self.head.extend_from_slice(constants::CRLF.as_bytes());
        }
        self.head.extend_from_slice(constants::BOUNDARY_EXT.as_bytes());
        self.head.extend_from_slice(self.boundary.as_bytes());
        self.head.extend_from_slice(constants::CRLF.as_bytes());
    }
}

impl Default for FormStream {
    fn default() -> FormStream {
        FormStream::new()
    }
}

/// The byte stream of a finished [`FormStream`].
///
/// Reading never fails on the in-memory segments; an I/O failure from the
/// file source surfaces from `read` at the point it occurs and abandons the
/// remainder of the stream. The file source is released as soon as its
/// segment is exhausted, or when this reader is dropped.
pub struct BodyReader {
    sources: ChainedReader<Box<dyn Read + Send>>,
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.sources.read(buf)
    }
}
