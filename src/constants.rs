pub(crate) const BOUNDARY_EXT: &'static str = "--";
pub(crate) const CRLF: &'static str = "\r\n";
pub(crate) const CRLF_CRLF: &'static str = "\r\n\r\n";

pub(crate) const BOUNDARY_TOKEN_LEN: usize = 32;
