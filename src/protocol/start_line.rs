//! Request start-line parsing.
//!
//! The start line is the first line of an HTTP/1.1 request:
//! `method SP request-target SP HTTP-version`. Only origin-form targets are
//! supported and the version token must be exactly `HTTP/1.1`; an `HTTP/1.0`
//! request (or anything that is not three space-separated tokens) is a hard
//! parse failure.

use std::fmt;

use crate::ensure;
use crate::protocol::{HttpError, Method};

/// The parsed request line of an HTTP/1.1 request.
///
/// The request target is kept verbatim, without unescaping. The protocol
/// version is not stored: parsing guarantees it is `HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLine {
    method: Method,
    target: String,
}

impl StartLine {
    /// Parses a terminator-stripped request line.
    ///
    /// # Errors
    ///
    /// Returns a 400 protocol error if the line does not consist of exactly
    /// three space-separated tokens, names an unknown method, or carries a
    /// version other than `HTTP/1.1`.
    pub fn parse(line: &str) -> Result<StartLine, HttpError> {
        let tokens: Vec<&str> = line.split(' ').collect();
        ensure!(tokens.len() == 3, HttpError::protocol(400, "this request is not for HTTP/1.1"));

        let method = Method::from_token(tokens[0])
            .ok_or_else(|| HttpError::protocol(400, format!("HTTP method {} is not implemented", tokens[0])))?;

        ensure!(
            tokens[2] == StartLine::VERSION,
            HttpError::protocol(400, format!("{} is not supported HTTP version", tokens[2]))
        );

        Ok(StartLine { method, target: tokens[1].to_string() })
    }

    /// The only protocol version this server speaks.
    pub const VERSION: &'static str = "HTTP/1.1";

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &'static str {
        Self::VERSION
    }
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.target, Self::VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get() {
        let start_line = StartLine::parse("GET /aaa HTTP/1.1").unwrap();
        assert_eq!(start_line.method(), Method::Get);
        assert_eq!(start_line.target(), "/aaa");
        assert_eq!(start_line.version(), "HTTP/1.1");
    }

    #[test]
    fn parse_two_tokens() {
        let err = StartLine::parse("YEAH /aaa").unwrap_err();
        assert_eq!(err.to_string(), "this request is not for HTTP/1.1");
    }

    #[test]
    fn parse_http10() {
        let err = StartLine::parse("POST /aaa HTTP/1.0").unwrap_err();
        assert_eq!(err.to_string(), "HTTP/1.0 is not supported HTTP version");
    }

    #[test]
    fn parse_unknown_method() {
        let err = StartLine::parse("YEAH /aaa HTTP/1.1").unwrap_err();
        assert_eq!(err.to_string(), "HTTP method YEAH is not implemented");
        assert!(matches!(err, HttpError::Protocol { status: 400, .. }));
    }

    #[test]
    fn display_round_trip() {
        let start_line = StartLine::parse("OPTIONS * HTTP/1.1").unwrap();
        assert_eq!(start_line.to_string(), "OPTIONS * HTTP/1.1");
    }
}
