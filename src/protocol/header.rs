//! Header field model and typed accessors.
//!
//! Header lines are parsed into [`HeaderField`] values whose names are folded
//! to uppercase, so every later lookup is case-insensitive by construction.
//! [`HeaderSet`] keeps fields in insertion order (serialization order for
//! responses) and permits duplicates except where the protocol forbids them
//! (`Host`, `Content-Length`), which [`HeaderSet::validate`] and
//! [`HeaderSet::content_length`] enforce.

use std::fmt;

use thiserror::Error;

use crate::ensure;
use crate::protocol::accept::{AcceptEntry, parse_accept};
use crate::protocol::accept_encoding::{AcceptEncoding, parse_accept_encoding};
use crate::protocol::coding::{ContentCoding, TransferEncoding};
use crate::protocol::error::HttpError;
use crate::protocol::range::{RangeSpec, parse_ranges};

/// One header field: a name and its line-terminator-free value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: String,
    value: String,
}

/// Error produced when a single header line cannot be parsed.
///
/// All variants except [`HeaderLineError::SpaceBeforeColon`] are recoverable:
/// the request decoder skips the offending line and keeps reading. Whitespace
/// before the colon is an obs-fold smuggling vector and escalates to a 400.
#[derive(Debug, Error)]
pub enum HeaderLineError {
    #[error("header line {0:?} has no colon")]
    MissingColon(String),

    #[error("header field name don't allow space before colon")]
    SpaceBeforeColon,

    #[error("header line {0:?} has an invalid field name")]
    InvalidFieldName(String),

    #[error("header line {0:?} has an empty value")]
    EmptyValue(String),
}

impl HeaderField {
    /// Builds a field verbatim. Used for response headers, which keep the
    /// casing they are given.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Parses one header line, splitting at the first colon.
    ///
    /// The field name is folded to uppercase and the value is trimmed of
    /// surrounding whitespace.
    pub fn parse(line: &str) -> Result<HeaderField, HeaderLineError> {
        let (name, value) =
            line.split_once(':').ok_or_else(|| HeaderLineError::MissingColon(line.to_string()))?;

        if name.ends_with(' ') || name.ends_with('\t') {
            return Err(HeaderLineError::SpaceBeforeColon);
        }
        if name.is_empty() || !name.chars().all(is_visible_ascii) {
            return Err(HeaderLineError::InvalidFieldName(line.to_string()));
        }
        if value.is_empty() {
            return Err(HeaderLineError::EmptyValue(line.to_string()));
        }

        Ok(HeaderField { name: name.to_ascii_uppercase(), value: value.trim().to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

fn is_visible_ascii(c: char) -> bool {
    ('\u{21}'..='\u{7e}').contains(&c)
}

/// The `Content-Type` of a request body, split at the first `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub media_type: String,
    pub parameter: Option<String>,
}

/// An ordered collection of header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    fields: Vec<HeaderField>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: HeaderField) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    /// All fields with the given name, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderField> {
        self.fields.iter().filter(move |field| field.name().eq_ignore_ascii_case(name))
    }

    /// The first field with the given name.
    pub fn first(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|field| field.name().eq_ignore_ascii_case(name))
    }

    /// Checks the field-existence rules a request must satisfy: exactly one
    /// `Host`, and an `Expect` value of `100-continue` if any.
    pub fn validate(&self) -> Result<(), HttpError> {
        ensure!(
            self.get_all("HOST").count() == 1,
            HttpError::protocol(400, "Request require only one Host header.")
        );
        if let Some(expect) = self.first("EXPECT") {
            ensure!(
                expect.value().eq_ignore_ascii_case("100-continue"),
                HttpError::protocol(417, "Expectation Failed")
            );
        }
        Ok(())
    }

    /// The declared body length: 0 when the header is absent.
    ///
    /// # Errors
    ///
    /// Duplicate `Content-Length` fields or a non-numeric value are a 400.
    pub fn content_length(&self) -> Result<usize, HttpError> {
        let fields: Vec<_> = self.get_all("CONTENT-LENGTH").collect();
        ensure!(fields.len() < 2, HttpError::protocol(400, "Multiple Content-Length is not allowed."));
        match fields.first() {
            None => Ok(0),
            Some(field) => field
                .value()
                .parse::<usize>()
                .map_err(|_| HttpError::protocol(400, format!("Content-Length:{} is not number.", field.value()))),
        }
    }

    /// Every transfer coding, across all `Transfer-Encoding` occurrences, in
    /// declaration order.
    pub fn transfer_encodings(&self) -> Vec<TransferEncoding> {
        self.get_all("TRANSFER-ENCODING")
            .flat_map(|field| field.value().split(','))
            .map(TransferEncoding::from_token)
            .collect()
    }

    pub fn is_chunked(&self) -> bool {
        self.transfer_encodings().contains(&TransferEncoding::Chunked)
    }

    /// The first transfer coding that is not `chunked`, for bodies sent as
    /// `Transfer-Encoding: gzip, chunked`. Defaults to `identity`.
    pub fn compress_type_after_chunk(&self) -> TransferEncoding {
        self.transfer_encodings()
            .into_iter()
            .find(|encoding| *encoding != TransferEncoding::Chunked)
            .unwrap_or(TransferEncoding::Identity)
    }

    /// The content codings applied by the sender, left to right. Decoding
    /// must undo them in that same order.
    pub fn content_encodings(&self) -> Vec<ContentCoding> {
        match self.first("CONTENT-ENCODING") {
            None => vec![ContentCoding::Identity],
            Some(field) => field.value().split(',').map(ContentCoding::from_token).collect(),
        }
    }

    pub fn is_connection_close(&self) -> bool {
        self.first("CONNECTION").is_some_and(|field| field.value() == "close")
    }

    /// The client's encoding preferences, weight-sorted. An absent header
    /// means `identity` is acceptable.
    pub fn accept_encodings(&self) -> Vec<AcceptEncoding> {
        match self.first("ACCEPT-ENCODING") {
            None => vec![AcceptEncoding { coding: ContentCoding::Identity, weight: 1.0 }],
            Some(field) => parse_accept_encoding(field.value()),
        }
    }

    /// The client's media-type preferences, weight-sorted. Empty when the
    /// header is absent.
    pub fn accept(&self) -> Vec<AcceptEntry> {
        match self.first("ACCEPT") {
            None => Vec::new(),
            Some(field) => parse_accept(field.value()),
        }
    }

    /// The requested byte ranges. Empty when the header is absent.
    pub fn ranges(&self) -> Result<Vec<RangeSpec>, HttpError> {
        match self.first("RANGE") {
            None => Ok(Vec::new()),
            Some(field) => parse_ranges(field.value()),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self.first("CONTENT-TYPE") {
            None => ContentType { media_type: "application/octet-stream".to_string(), parameter: None },
            Some(field) => {
                let mut parts = field.value().splitn(2, ';');
                ContentType {
                    media_type: parts.next().unwrap_or("").to_string(),
                    parameter: parts.next().map(str::to_string),
                }
            }
        }
    }

    pub fn content_location(&self) -> Option<&str> {
        self.first("CONTENT-LOCATION").map(HeaderField::value)
    }
}
