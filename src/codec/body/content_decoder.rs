//! Content-decoding pipeline for request bodies.
//!
//! `Content-Encoding` lists codings in the order the sender applied them, so
//! decoding walks the list left to right, each stage consuming the previous
//! stage's output. Only gzip is actually implemented; `compress` and
//! `deflate` are recognized but pass through untransformed, and `identity`
//! is a no-op.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::protocol::{ContentCoding, HttpError};

/// Undoes the declared content codings, left to right.
pub fn decode_content(body: Vec<u8>, codings: &[ContentCoding]) -> Result<Vec<u8>, HttpError> {
    let mut body = body;
    for coding in codings {
        match coding {
            ContentCoding::Gzip => body = gunzip(&body)?,
            ContentCoding::Compress | ContentCoding::Deflate | ContentCoding::Identity => {}
        }
    }
    Ok(body)
}

/// Inflates one gzip member.
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, HttpError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(|e| HttpError::unclassified(format!("gzip decode failed: {e}")))?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gzip_round_trip() {
        let original = b"hellohellohello".to_vec();
        let decoded = decode_content(gzip(&original), &[ContentCoding::Gzip]).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn gzip_round_trip_empty_input() {
        let decoded = decode_content(gzip(b""), &[ContentCoding::Gzip]).unwrap();
        assert_eq!(decoded, Vec::<u8>::new());
    }

    #[test]
    fn double_gzip_decodes_left_to_right() {
        let original = b"hellohellohello".to_vec();
        let twice = gzip(&gzip(&original));
        let decoded = decode_content(twice, &[ContentCoding::Gzip, ContentCoding::Gzip]).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn identity_and_unimplemented_codings_pass_through() {
        let body = b"plain".to_vec();
        let decoded = decode_content(
            body.clone(),
            &[ContentCoding::Identity, ContentCoding::Compress, ContentCoding::Deflate],
        )
        .unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn invalid_gzip_is_an_error() {
        assert!(decode_content(b"not gzip".to_vec(), &[ContentCoding::Gzip]).is_err());
    }
}
