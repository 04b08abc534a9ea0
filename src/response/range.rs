//! Byte-range resolution and response status selection.
//!
//! Given the fully materialized response payload and the first requested
//! range, this decides between 200, 206 and 416 and computes the
//! `Content-Range` value. The range's `end` bound is used directly as an
//! exclusive slice bound; clients relying on RFC 7233's inclusive last-byte
//! semantics receive one byte less, and the `Content-Range` echoes the bounds
//! as requested. This matches the long-standing behavior of the wire format
//! tests and must not be "fixed" in isolation.

use bytes::Bytes;

use crate::protocol::RangeSpec;

/// The payload after range resolution: response status plus the bytes to
/// actually send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangedPayload {
    pub status: u16,
    pub reason: &'static str,
    pub content_range: Option<String>,
    pub body: Bytes,
}

/// Resolves the first requested range against the payload.
///
/// No range means a plain 200 with the full body. A satisfiable range yields
/// 206 with the `[start, end)` slice; an `end` past the payload (or an empty
/// resolved window) yields 416 with an empty body and a
/// `bytes */<len>` content range.
pub fn apply_range(body: Bytes, range: Option<&RangeSpec>) -> RangedPayload {
    let Some(range) = range else {
        return RangedPayload { status: 200, reason: "OK", content_range: None, body };
    };

    let len = body.len();
    let (start, end) = match (range.start, range.end) {
        // suffix range: the last `end` bytes
        (None, Some(end)) => (len.saturating_sub(end), len),
        (Some(start), None) => (start, len),
        (Some(start), Some(end)) => (start, end),
        // the parser guarantees at least one bound
        (None, None) => (0, len),
    };

    if end > len || start > end {
        return RangedPayload {
            status: 416,
            reason: "Range Not Satisfiable",
            content_range: Some(format!("bytes */{len}")),
            body: Bytes::new(),
        };
    }

    RangedPayload {
        status: 206,
        reason: "Partial Content",
        content_range: Some(format!("bytes {start}-{end}/{len}")),
        body: body.slice(start..end),
    }
}
