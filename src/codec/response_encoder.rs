//! Serializer for outgoing responses.
//!
//! Turns a [`ResponseParts`] value into wire bytes: status line, header
//! fields in insertion order, the blank separator line and the body.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::HttpError;
use crate::response::ResponseParts;

/// Initial buffer size reserved for the status line and headers.
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for complete HTTP/1.1 responses implementing the [`Encoder`] trait.
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<ResponseParts> for ResponseEncoder {
    type Error = HttpError;

    fn encode(&mut self, parts: ResponseParts, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE + parts.body.len());

        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", parts.status, parts.reason).map_err(HttpError::from)?;

        for field in parts.headers.iter() {
            dst.put_slice(field.name().as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(field.value().as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        dst.put_slice(&parts.body);
        Ok(())
    }
}

/// Writer over `BytesMut` that skips intermediate allocation, since the
/// buffer space is already reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::protocol::{HeaderField, HeaderSet};

    use super::*;

    #[test]
    fn encodes_status_line_headers_and_body() {
        let mut headers = HeaderSet::new();
        headers.push(HeaderField::new("Content-Length", "2"));
        headers.push(HeaderField::new("Vary", "accept-encoding, accept"));

        let parts = ResponseParts {
            status: 200,
            reason: "OK".to_string(),
            headers,
            body: Bytes::from_static(b"hi"),
        };

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(parts, &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nVary: accept-encoding, accept\r\n\r\nhi".as_slice()
        );
    }
}
