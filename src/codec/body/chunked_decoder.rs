//! Decoder for chunked transfer encoding.
//!
//! Each chunk is a hexadecimal size line followed by that many data bytes and
//! a line terminator; a zero size ends the body. Compared to
//! [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1)
//! two simplifications apply: chunk extensions are not supported (a size line
//! that is not pure hex reads as zero and terminates the body), and trailer
//! fields are not consumed — the blank line after the last chunk is left in
//! the buffer, where the connection loop treats it as an idle line before the
//! next request. A stream that ends before the zero chunk yields whatever was
//! accumulated instead of failing.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{HttpError, PayloadItem};

/// A decoder for chunked transfer encoded payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    /// Bytes remaining in the chunk currently being read.
    remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the hexadecimal chunk size line.
    Size,
    /// Read chunk data.
    Data,
    /// Consume the line terminator after chunk data.
    DataEnd,
    /// A zero-size chunk was seen.
    End,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: ChunkedState::Size, remaining: 0 }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = HttpError;

    /// Decodes chunked data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when chunk data is decoded
    /// - `Ok(Some(PayloadItem::Eof))` when the zero-size chunk is reached
    /// - `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                ChunkedState::Size => {
                    let Some(line) = split_line(src) else {
                        return Ok(None);
                    };
                    let size = u64::from_str_radix(line.trim(), 16).unwrap_or(0);
                    if size == 0 {
                        trace!("finished reading chunked data");
                        self.state = ChunkedState::End;
                        return Ok(Some(PayloadItem::Eof));
                    }
                    self.remaining = size;
                    self.state = ChunkedState::Data;
                }

                ChunkedState::Data => {
                    if src.is_empty() {
                        return Ok(None);
                    }
                    let len = std::cmp::min(self.remaining, src.len() as u64);
                    let bytes = src.split_to(len as usize).freeze();
                    self.remaining -= bytes.len() as u64;
                    if self.remaining == 0 {
                        self.state = ChunkedState::DataEnd;
                    }
                    trace!(len = bytes.len(), "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                ChunkedState::DataEnd => {
                    if split_line(src).is_none() {
                        return Ok(None);
                    }
                    self.state = ChunkedState::Size;
                }

                ChunkedState::End => return Ok(Some(PayloadItem::Eof)),
            }
        }
    }

    /// End of stream before the zero chunk returns what was accumulated.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(item) => Ok(Some(item)),
            None => Ok(Some(PayloadItem::Eof)),
        }
    }
}

/// Splits one terminator-stripped line off the front of the buffer.
fn split_line(src: &mut BytesMut) -> Option<String> {
    let newline = src.iter().position(|b| *b == b'\n')?;
    let line = src.split_to(newline + 1);
    let mut end = newline;
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    Some(String::from_utf8_lossy(&line[..end]).into_owned())
}
