//! Response construction.
//!
//! A parsed request is answered by one of three response behaviors, selected
//! once by method and modeled as a closed union:
//!
//! - [`EchoResponse`]: the default — serializes the request back as a
//!   negotiated representation, sliced by the range engine
//! - [`HeadResponse`]: echo headers without a body
//! - [`OptionsResponse`]: a fixed 204 with an `Allow` header
//!
//! Each variant produces [`ResponseParts`], the status/headers/body value the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder) serializes.

use std::time::SystemTime;

use bytes::Bytes;

use crate::protocol::{HeaderField, HeaderSet, HttpError, Method, Request};

mod echo;
pub use echo::EchoResponse;

mod head;
pub use head::HeadResponse;

mod options;
pub use options::OptionsResponse;

mod range;
pub use range::{RangedPayload, apply_range};

/// A response ready for serialization: status line, header fields in write
/// order, and the body bytes.
#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderSet,
    pub body: Bytes,
}

/// The response behavior chosen for a request.
pub enum Response {
    Echo(EchoResponse),
    Head(HeadResponse),
    Options(OptionsResponse),
}

impl Response {
    /// Selects the behavior by request method.
    pub fn for_request(request: Request) -> Self {
        match request.start_line().method() {
            Method::Head => Self::Head(HeadResponse::new(request)),
            Method::Options => Self::Options(OptionsResponse::new()),
            _ => Self::Echo(EchoResponse::new(request)),
        }
    }

    /// Builds the wire-ready response.
    pub fn into_parts(self) -> Result<ResponseParts, HttpError> {
        match self {
            Self::Echo(echo) => echo.into_parts(),
            Self::Head(head) => head.into_parts(),
            Self::Options(options) => options.into_parts(),
        }
    }
}

/// An error response: the status line carries the failure message as its
/// reason phrase, the body is empty.
pub fn error_parts(status: u16, reason: &str) -> ResponseParts {
    let mut headers = HeaderSet::new();
    headers.push(date_field());
    headers.push(HeaderField::new("Content-Length", "0"));

    ResponseParts { status, reason: reason.to_string(), headers, body: Bytes::new() }
}

/// A `Date` field in RFC 1123 format, stamped at response-build time.
pub(crate) fn date_field() -> HeaderField {
    HeaderField::new("Date", httpdate::fmt_http_date(SystemTime::now()))
}
