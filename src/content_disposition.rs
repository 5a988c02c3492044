use std::borrow::Cow;

use crate::constants;
use crate::Error;

/// Renders the header block of a text part, from the `Content-Disposition`
/// line through the blank line that precedes the value.
pub(crate) fn render_field(name: &str) -> crate::Result<String> {
    let name = escape(name)?;

    Ok(format!(
        "Content-Disposition: form-data; name=\"{}\"{}",
        name,
        constants::CRLF_CRLF
    ))
}

/// Renders the header block of the file part. The part content type is fixed
/// to `application/octet-stream`; the content itself streams separately.
pub(crate) fn render_file(name: &str, file_name: &str) -> crate::Result<String> {
    let name = escape(name)?;
    let file_name = escape(file_name)?;

    Ok(format!(
        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{}Content-Type: {}{}",
        name,
        file_name,
        constants::CRLF,
        mime::APPLICATION_OCTET_STREAM,
        constants::CRLF_CRLF
    ))
}

/// Quotes `"` and `\` the way multipart readers unquote them. CR and LF have
/// no quoted form inside a header line, so they are refused outright.
fn escape(raw: &str) -> crate::Result<Cow<'_, str>> {
    if raw.contains('\r') || raw.contains('\n') {
        return Err(Error::InvalidPartName(raw.to_owned()));
    }

    if raw.contains('\\') || raw.contains('"') {
        Ok(Cow::Owned(raw.replace('\\', "\\\\").replace('"', "\\\"")))
    } else {
        Ok(Cow::Borrowed(raw))
    }
}
