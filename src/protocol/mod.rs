//! Core HTTP protocol types.
//!
//! This module holds the data model the rest of the crate is built on:
//!
//! - **Start line** ([`start_line`]): request-line parsing and the
//!   [`Method`] enumeration
//! - **Headers** ([`header`]): the ordered [`HeaderSet`] with its typed,
//!   case-insensitive accessors
//! - **Negotiation** ([`accept`], [`accept_encoding`]): quality-value
//!   parsing for `Accept` and `Accept-Encoding`
//! - **Framing inputs** ([`coding`], [`range`]): transfer/content coding
//!   tokens and byte-range specs
//! - **Messages** ([`message`], [`request`]): body decoder output and the
//!   assembled [`Request`]
//! - **Errors** ([`error`]): the [`HttpError`] taxonomy matched by the
//!   connection loop

mod accept;
pub use accept::{AcceptEntry, AcceptParameter, parse_accept};

mod accept_encoding;
pub use accept_encoding::{AcceptEncoding, parse_accept_encoding};

mod coding;
pub use coding::{ContentCoding, TransferEncoding};

mod error;
pub use error::HttpError;

mod header;
pub use header::{ContentType, HeaderField, HeaderLineError, HeaderSet};

mod message;
pub use message::PayloadItem;

mod method;
pub use method::Method;

mod range;
pub use range::{RangeSpec, parse_ranges};

mod request;
pub use request::Request;

mod start_line;
pub use start_line::StartLine;
