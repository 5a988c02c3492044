use std::fmt::{self, Debug, Display, Formatter};
use std::io;
use std::path::PathBuf;

use derive_more::Display;

/// A set of errors that can occur while assembling a multipart body and in
/// other operations.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// A part name or file name contains CR or LF, which no part header line
    /// can carry.
    #[display(fmt = "part name contains CR or LF: {:?}", _0)]
    InvalidPartName(String),

    /// A part was added after the file part. The file part must stay the
    /// final part of the body.
    #[display(fmt = "cannot add part {:?} after the file part", _0)]
    PartAfterFile(String),

    /// Opening the file behind a path, or reading its metadata, failed.
    #[display(fmt = "failed to open file source '{}': {}", "path.display()", cause)]
    FileSourceFailed { path: PathBuf, cause: io::Error },

    /// The path points at something other than a regular file, so its length
    /// cannot stand in for a content length.
    #[display(fmt = "not a regular file: '{}'", "path.display()")]
    NotAFile { path: PathBuf },

    /// The path has no final component to use as the part's file name.
    #[display(fmt = "cannot derive a file name from path '{}'", "path.display()")]
    NoFileName { path: PathBuf },

    /// The request builder rejected the body or one of the headers.
    #[display(fmt = "failed to assemble the http request: {}", _0)]
    RequestBuildFailed(http::Error),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
