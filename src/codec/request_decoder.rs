//! Streaming HTTP request decoder.
//!
//! [`RequestDecoder`] consumes raw connection bytes and produces fully
//! materialized [`Request`] values. It runs a three-phase state machine:
//!
//! 1. **Start line**: parse method, target and version
//! 2. **Headers**: collect fields until the blank separator line, skipping
//!    recoverable syntax errors, then validate the set
//! 3. **Body**: read the payload under the framing mode the headers declare
//!    (`Content-Length` or chunked), then run the content-decoding pipeline
//!
//! An empty line where a start line was expected is not an error: it means no
//! request has arrived yet, surfaced as [`HttpError::WaitingForData`] so the
//! connection retries. The decoder never consumes bytes past the current
//! request's framing boundary, keeping pipelined requests intact.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::{PayloadDecoder, decode_content, gunzip};
use crate::ensure;
use crate::protocol::{
    HeaderField, HeaderLineError, HeaderSet, HttpError, PayloadItem, Request, StartLine, TransferEncoding,
};

/// Maximum size in bytes of a single start or header line.
const MAX_LINE_BYTES: usize = 8 * 1024;

/// Maximum number of header fields in a request.
const MAX_HEADER_NUM: usize = 64;

/// A decoder producing one [`Request`] per call once enough bytes arrived.
pub struct RequestDecoder {
    state: DecodeState,
}

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    StartLine,
    Headers {
        start_line: StartLine,
        headers: HeaderSet,
    },
    Body {
        start_line: StartLine,
        headers: HeaderSet,
        payload: PayloadDecoder,
        body: BytesMut,
    },
}

/// What the state-machine step decided, evaluated outside the state borrow.
enum Step {
    Continue,
    BeginHeaders(StartLine),
    BeginBody,
    Finish,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Ends the header phase: validates the set, selects the framing mode and
    /// moves to the body phase.
    fn begin_body(&mut self) -> Result<(), HttpError> {
        let DecodeState::Headers { start_line, headers } = std::mem::take(&mut self.state) else {
            unreachable!("begin_body outside header phase")
        };
        headers.validate()?;
        let payload = select_payload(&headers)?;
        self.state = DecodeState::Body { start_line, headers, payload, body: BytesMut::new() };
        Ok(())
    }

    /// Ends the body phase: undoes transfer compression and content codings,
    /// resets the machine and assembles the request.
    fn finish(&mut self) -> Result<Request, HttpError> {
        let DecodeState::Body { start_line, headers, payload, body } = std::mem::take(&mut self.state) else {
            unreachable!("finish outside body phase")
        };

        let raw = body.freeze().to_vec();
        let decoded = if payload.is_chunked() {
            match headers.compress_type_after_chunk() {
                TransferEncoding::Gzip => gunzip(&raw)?,
                _ => decode_body(raw, &headers)?,
            }
        } else {
            decode_body(raw, &headers)?
        };

        trace!(body_len = decoded.len(), "decoded request");
        Ok(Request::new(start_line, headers, Bytes::from(decoded)))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: DecodeState::StartLine }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = HttpError;

    /// Attempts to decode one request from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request was decoded
    /// - `Ok(None)`: need more data
    /// - `Err(HttpError::WaitingForData)`: an idle line was consumed, no
    ///   request has started yet
    /// - `Err(_)`: a protocol violation
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let step = match &mut self.state {
                DecodeState::StartLine => {
                    let Some(line) = split_line(src)? else {
                        return Ok(None);
                    };
                    if line.is_empty() {
                        return Err(HttpError::WaitingForData);
                    }
                    Step::BeginHeaders(StartLine::parse(&line)?)
                }

                DecodeState::Headers { headers, .. } => {
                    let Some(line) = split_line(src)? else {
                        return Ok(None);
                    };
                    if line.is_empty() {
                        Step::BeginBody
                    } else {
                        match HeaderField::parse(&line) {
                            Ok(field) => {
                                ensure!(
                                    headers.len() < MAX_HEADER_NUM,
                                    HttpError::protocol(400, format!("more than {MAX_HEADER_NUM} header fields"))
                                );
                                headers.push(field);
                            }
                            Err(HeaderLineError::SpaceBeforeColon) => {
                                return Err(HttpError::protocol(
                                    400,
                                    "Header field name don't allow space before colon.",
                                ));
                            }
                            Err(e) => trace!(reason = %e, "skipping malformed header line"),
                        }
                        Step::Continue
                    }
                }

                DecodeState::Body { payload, body, .. } => match payload.decode(src)? {
                    Some(PayloadItem::Chunk(bytes)) => {
                        body.extend_from_slice(&bytes);
                        Step::Continue
                    }
                    Some(PayloadItem::Eof) => Step::Finish,
                    None => return Ok(None),
                },
            };

            match step {
                Step::Continue => {}
                Step::BeginHeaders(start_line) => {
                    self.state = DecodeState::Headers { start_line, headers: HeaderSet::new() };
                }
                Step::BeginBody => self.begin_body()?,
                Step::Finish => return Ok(Some(self.finish()?)),
            }
        }
    }

    /// Handles the end of the byte stream.
    ///
    /// - mid start line: nothing to answer, the connection just closes
    /// - mid headers: the request completes with no body (header reading
    ///   stops at end-of-stream)
    /// - mid body: the framing decoder decides — a `Content-Length` shortfall
    ///   is a 400, a chunked body keeps what was accumulated
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match &mut self.state {
            DecodeState::StartLine => Ok(None),

            DecodeState::Headers { .. } => {
                let DecodeState::Headers { start_line, headers } = std::mem::take(&mut self.state) else {
                    unreachable!()
                };
                Ok(Some(Request::new(start_line, headers, Bytes::new())))
            }

            DecodeState::Body { .. } => loop {
                let DecodeState::Body { payload, body, .. } = &mut self.state else { unreachable!() };
                match payload.decode_eof(src)? {
                    Some(PayloadItem::Chunk(bytes)) => body.extend_from_slice(&bytes),
                    Some(PayloadItem::Eof) => return Ok(Some(self.finish()?)),
                    None => return Ok(None),
                }
            },
        }
    }
}

/// Selects the framing mode for the request body.
///
/// A non-empty `Transfer-Encoding` must include `chunked`; otherwise the
/// `Content-Length` count applies, where zero means no body.
fn select_payload(headers: &HeaderSet) -> Result<PayloadDecoder, HttpError> {
    if !headers.transfer_encodings().is_empty() {
        ensure!(headers.is_chunked(), HttpError::protocol(400, "Transfer-Encoding is invalid."));
        return Ok(PayloadDecoder::chunked());
    }
    match headers.content_length()? {
        0 => Ok(PayloadDecoder::empty()),
        length => Ok(PayloadDecoder::fix_length(length as u64)),
    }
}

/// Runs the content-decoding pipeline over a non-empty body.
fn decode_body(raw: Vec<u8>, headers: &HeaderSet) -> Result<Vec<u8>, HttpError> {
    if raw.is_empty() {
        return Ok(raw);
    }
    decode_content(raw, &headers.content_encodings())
}

/// Splits one terminator-stripped line off the front of the buffer.
///
/// Returns `None` when no full line is buffered yet, and fails once an
/// unterminated line outgrows [`MAX_LINE_BYTES`].
fn split_line(src: &mut BytesMut) -> Result<Option<String>, HttpError> {
    let Some(newline) = src.iter().position(|b| *b == b'\n') else {
        ensure!(
            src.len() <= MAX_LINE_BYTES,
            HttpError::protocol(400, format!("header line exceeds the {MAX_LINE_BYTES} byte limit"))
        );
        return Ok(None);
    };

    let line = src.split_to(newline + 1);
    let mut end = newline;
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    Ok(Some(String::from_utf8_lossy(&line[..end]).into_owned()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use indoc::indoc;

    use crate::protocol::Method;

    use super::*;

    fn decode_all(raw: &[u8]) -> Result<Option<Request>, HttpError> {
        let mut buffer = BytesMut::from(raw);
        RequestDecoder::new().decode(&mut buffer)
    }

    #[test]
    fn get_without_body() {
        let raw = indoc! {"
            GET / HTTP/1.1
            Host: localhost
            Header1: aaa
            Header2: bbb ccc

        "};

        let request = decode_all(raw.as_bytes()).unwrap().unwrap();
        assert_eq!(request.start_line().method(), Method::Get);
        assert_eq!(request.start_line().target(), "/");
        assert_eq!(request.headers().first("HEADER1").unwrap().value(), "aaa");
        assert_eq!(request.headers().first("HEADER2").unwrap().value(), "bbb ccc");
        assert!(request.body().is_empty());
    }

    #[test]
    fn post_with_fixed_length_body() {
        let raw = indoc! {"
            POST / HTTP/1.1
            Host: localhost
            Content-Length: 12

            aaaaa
            bbbbb
        "};

        let request = decode_all(raw.as_bytes()).unwrap().unwrap();
        assert_eq!(request.start_line().method(), Method::Post);
        assert_eq!(request.body(), b"aaaaa\nbbbbb\n");
    }

    #[test]
    fn content_length_mismatch() {
        let raw = indoc! {"
            POST / HTTP/1.1
            Host: localhost
            Content-Length: 14

            aaaaa
            bbbbb
        "};

        let mut buffer = BytesMut::from(raw.as_bytes());
        let mut decoder = RequestDecoder::new();
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        let err = decoder.decode_eof(&mut buffer).unwrap_err();
        assert_eq!(err.to_string(), "Content-Length and real body size are different.");
    }

    #[test]
    fn never_reads_past_the_declared_length() {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhelloGET / HTTP/1.1\r\n");

        let mut buffer = BytesMut::from(&raw[..]);
        let mut decoder = RequestDecoder::new();

        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(request.body(), b"hello");
        assert_eq!(&buffer[..], b"GET / HTTP/1.1\r\n");
    }

    #[test]
    fn chunked_body() {
        let raw = b"POST / HTTP/1.1\r\nHost: localhost\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n5\r\nhello\r\n0\r\n";

        let request = decode_all(raw).unwrap().unwrap();
        assert_eq!(request.body(), b"hellohello");
    }

    #[test]
    fn non_chunked_transfer_encoding_is_invalid() {
        let raw = indoc! {"
            POST / HTTP/1.1
            Host: localhost
            Transfer-Encoding: gzip

        "};

        let err = decode_all(raw.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Transfer-Encoding is invalid.");
    }

    #[test]
    fn gzip_content_encoding_is_decoded() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hellohellohello").unwrap();
        let gzipped = encoder.finish().unwrap();

        let mut raw = Vec::new();
        raw.extend_from_slice(b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Encoding: gzip\r\n");
        raw.extend_from_slice(format!("Content-Length: {}\r\n\r\n", gzipped.len()).as_bytes());
        raw.extend_from_slice(&gzipped);

        let request = decode_all(&raw).unwrap().unwrap();
        assert_eq!(request.body(), b"hellohellohello");
    }

    #[test]
    fn empty_first_line_means_no_request_yet() {
        let mut buffer = BytesMut::from(&b"\r\nGET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
        let mut decoder = RequestDecoder::new();

        assert!(matches!(decoder.decode(&mut buffer), Err(HttpError::WaitingForData)));

        // the idle line is consumed; the next attempt parses the request
        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(request.start_line().method(), Method::Get);
    }

    #[test]
    fn malformed_header_lines_are_skipped() {
        let raw = indoc! {"
            GET / HTTP/1.1
            Host: localhost
            this line has no colon
            Good: yes

        "};

        let request = decode_all(raw.as_bytes()).unwrap().unwrap();
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers().first("GOOD").unwrap().value(), "yes");
    }

    #[test]
    fn space_before_colon_is_a_protocol_error() {
        let raw = "GET / HTTP/1.1\r\nHost : localhost\r\n\r\n";
        let err = decode_all(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, HttpError::Protocol { status: 400, .. }));
    }

    #[test]
    fn missing_host_fails_validation() {
        let raw = "GET / HTTP/1.1\r\nAccept: */*\r\n\r\n";
        let err = decode_all(raw.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Request require only one Host header.");
    }

    #[test]
    fn eof_during_headers_completes_the_request() {
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n"[..]);
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert_eq!(request.start_line().method(), Method::Get);
        assert!(request.body().is_empty());
    }

    #[test]
    fn eof_during_chunked_body_keeps_accumulated_bytes() {
        let mut buffer =
            BytesMut::from(&b"POST / HTTP/1.1\r\nHost: localhost\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n"[..]);
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn partial_input_asks_for_more() {
        let mut buffer = BytesMut::from(&b"GET / HT"[..]);
        let mut decoder = RequestDecoder::new();
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"TP/1.1\r\nHost: localhost\r\n\r\n");
        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(request.start_line().target(), "/");
    }
}
