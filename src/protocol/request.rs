use bytes::Bytes;

use crate::protocol::{HeaderSet, StartLine};

/// A fully parsed request: start line, headers and the decoded body.
///
/// Constructed once per request cycle by the request decoder and discarded
/// after its response has been written. The body holds the logical payload,
/// i.e. bytes after chunked de-framing and content decoding.
#[derive(Debug, Clone)]
pub struct Request {
    start_line: StartLine,
    headers: HeaderSet,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(start_line: StartLine, headers: HeaderSet, body: Bytes) -> Self {
        Self { start_line, headers, body }
    }

    pub fn start_line(&self) -> &StartLine {
        &self.start_line
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
