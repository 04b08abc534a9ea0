//! Decoder for bodies framed by a `Content-Length` header.
//!
//! Reads exactly the declared number of bytes and never more, so that the
//! bytes of a pipelined follow-up request stay in the buffer. See
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::protocol::{HttpError, PayloadItem};

/// A decoder for payloads with a known content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// Bytes still to be read from the payload.
    length: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }
}

impl Decoder for LengthDecoder {
    type Item = PayloadItem;
    type Error = HttpError;

    /// Yields chunks until the declared length is consumed.
    ///
    /// # Returns
    /// * `Ok(Some(PayloadItem::Chunk(bytes)))` when payload bytes are available
    /// * `Ok(Some(PayloadItem::Eof))` once the declared length is fully read
    /// * `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.length == 0 {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let len = cmp::min(self.length, src.len() as u64);
        let bytes = src.split_to(len as usize).freeze();

        self.length -= bytes.len() as u64;
        Ok(Some(PayloadItem::Chunk(bytes)))
    }

    /// A stream that ends before the declared length is delivered is a
    /// framing violation.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(item) => Ok(Some(item)),
            None => Err(HttpError::protocol(400, "Content-Length and real body size are different.")),
        }
    }
}
