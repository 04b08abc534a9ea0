//! Transfer and content coding token enumerations.
//!
//! Both enumerations are closed: unknown tokens fold to `identity`, which the
//! decoding pipeline treats as a no-op. Of the compression codings only gzip
//! is actually implemented end to end; `compress` and `deflate` are accepted
//! syntactically and passed through untransformed.

/// A `Transfer-Encoding` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    Chunked,
    Compress,
    Deflate,
    Gzip,
    Identity,
}

impl TransferEncoding {
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "chunked" => Self::Chunked,
            "compress" => Self::Compress,
            "deflate" => Self::Deflate,
            "gzip" => Self::Gzip,
            _ => Self::Identity,
        }
    }
}

/// A content coding, as used by `Content-Encoding` and `Accept-Encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Compress,
    Deflate,
    Gzip,
    Identity,
}

impl ContentCoding {
    /// Every known coding, in the order wildcard expansion enumerates them.
    pub const ALL: [ContentCoding; 4] = [Self::Compress, Self::Deflate, Self::Gzip, Self::Identity];

    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "compress" => Self::Compress,
            "deflate" => Self::Deflate,
            "gzip" => Self::Gzip,
            _ => Self::Identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_encoding_tokens() {
        assert_eq!(TransferEncoding::from_token("chunked"), TransferEncoding::Chunked);
        assert_eq!(TransferEncoding::from_token(" gzip "), TransferEncoding::Gzip);
        assert_eq!(TransferEncoding::from_token("identity"), TransferEncoding::Identity);
        assert_eq!(TransferEncoding::from_token("zstd"), TransferEncoding::Identity);
    }

    #[test]
    fn content_coding_tokens() {
        assert_eq!(ContentCoding::from_token("gzip"), ContentCoding::Gzip);
        assert_eq!(ContentCoding::from_token("compress"), ContentCoding::Compress);
        assert_eq!(ContentCoding::from_token("br"), ContentCoding::Identity);
    }
}
