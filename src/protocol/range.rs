//! `Range` header parsing.
//!
//! Only the `bytes` unit is supported. A parsed header may contain several
//! byte ranges; the response engine honors the first one only.

use crate::protocol::HttpError;

/// One byte range of a `Range` header.
///
/// At least one bound is present: a missing `start` means "the last `end`
/// bytes" and a missing `end` means "from `start` to the end of the body".
/// The `end` bound is used by the response engine as an exclusive slice
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

/// Parses a `Range` header value such as `bytes=0-499, -500`.
///
/// # Errors
///
/// Returns a 400 protocol error for a non-`bytes` unit or an item that is not
/// `N-`, `-N` or `N-M`.
pub fn parse_ranges(value: &str) -> Result<Vec<RangeSpec>, HttpError> {
    let rest = value
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(|| HttpError::protocol(400, "Only bytes bytes-unit supported."))?;

    let invalid = || HttpError::protocol(400, format!("Invalid Range header: {value}."));

    let mut ranges = Vec::new();
    for item in rest.split(',') {
        let item = item.trim();
        if let Some(suffix) = item.strip_prefix('-') {
            let end = suffix.parse::<usize>().map_err(|_| invalid())?;
            ranges.push(RangeSpec { start: None, end: Some(end) });
        } else if let Some(prefix) = item.strip_suffix('-') {
            let start = prefix.parse::<usize>().map_err(|_| invalid())?;
            ranges.push(RangeSpec { start: Some(start), end: None });
        } else {
            let (start, end) = item.split_once('-').ok_or_else(invalid)?;
            ranges.push(RangeSpec {
                start: Some(start.parse::<usize>().map_err(|_| invalid())?),
                end: Some(end.parse::<usize>().map_err(|_| invalid())?),
            });
        }
    }
    Ok(ranges)
}
