use bytes::Bytes;

use crate::protocol::{HeaderField, HeaderSet, HttpError};
use crate::response::{ResponseParts, date_field};

/// OPTIONS variant: a fixed 204 advertising the supported methods.
///
/// Bypasses negotiation entirely; no representation is built.
pub struct OptionsResponse;

impl OptionsResponse {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn into_parts(self) -> Result<ResponseParts, HttpError> {
        let mut headers = HeaderSet::new();
        headers.push(HeaderField::new("Allow", "GET, POST, HEAD, OPTIONS"));
        headers.push(date_field());

        Ok(ResponseParts { status: 204, reason: "No Content".to_string(), headers, body: Bytes::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_204_with_allow() {
        let parts = OptionsResponse::new().into_parts().unwrap();
        assert_eq!(parts.status, 204);
        assert_eq!(parts.reason, "No Content");
        assert_eq!(parts.headers.first("Allow").unwrap().value(), "GET, POST, HEAD, OPTIONS");
        assert!(parts.headers.first("Date").is_some());
        assert!(parts.body.is_empty());
    }
}
