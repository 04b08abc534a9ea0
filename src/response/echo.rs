//! The echo representation: the parsed request serialized back to the client.
//!
//! Content negotiation happens here. The sorted `Accept` list picks the
//! representation (JSON by default, XML on request), the sorted
//! `Accept-Encoding` list picks the outbound coding (gzip or identity), and
//! the range engine slices the encoded payload. A client whose preferences
//! rule out every representation or every coding gets a 406.

use std::io::Write;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;

use crate::protocol::{AcceptEncoding, ContentCoding, HeaderField, HeaderSet, HttpError, Request};
use crate::response::range::apply_range;
use crate::response::{ResponseParts, date_field};

/// Echoes the request back as a negotiated representation.
pub struct EchoResponse {
    request: Request,
}

impl EchoResponse {
    pub(crate) fn new(request: Request) -> Self {
        Self { request }
    }

    pub(crate) fn into_parts(self) -> Result<ResponseParts, HttpError> {
        echo_parts(&self.request, true)
    }
}

/// The serialized form of a request, shared by the JSON and XML renderers.
#[derive(Serialize)]
struct EchoPayload {
    body: String,
    headers: Vec<String>,
    method: String,
    request_target: String,
    version: String,
}

impl EchoPayload {
    fn from_request(request: &Request) -> Self {
        Self {
            body: String::from_utf8_lossy(request.body()).into_owned(),
            headers: request.headers().iter().map(ToString::to_string).collect(),
            method: request.start_line().method().to_string(),
            request_target: request.start_line().target().to_string(),
            version: request.start_line().version().to_string(),
        }
    }
}

/// Builds the status, headers and (optionally) body of an echo response.
///
/// HEAD reuses this with `include_body = false`: the headers are computed
/// exactly as for the equivalent GET, only the body write is suppressed.
pub(crate) fn echo_parts(request: &Request, include_body: bool) -> Result<ResponseParts, HttpError> {
    let representation = build_representation(request)?;

    let coding = negotiate_coding(&request.headers().accept_encodings())?;
    let encoded = match coding {
        ContentCoding::Gzip => gzip_compress(&representation)?,
        _ => representation,
    };

    let ranges = request.headers().ranges()?;
    let ranged = apply_range(Bytes::from(encoded), ranges.first());

    let mut headers = HeaderSet::new();
    headers.push(HeaderField::new("Content-Length", ranged.body.len().to_string()));
    if let Some(content_range) = &ranged.content_range {
        headers.push(HeaderField::new("Content-Range", content_range.clone()));
    }
    headers.push(date_field());
    headers.push(HeaderField::new("Vary", "accept-encoding, accept"));
    headers.push(HeaderField::new("Accept-Range", "bytes"));
    if coding == ContentCoding::Gzip {
        headers.push(HeaderField::new("Content-Encoding", "gzip"));
    }

    Ok(ResponseParts {
        status: ranged.status,
        reason: ranged.reason.to_string(),
        headers,
        body: if include_body { ranged.body } else { Bytes::new() },
    })
}

/// Picks the representation from the sorted `Accept` list.
///
/// An empty list defaults to JSON. Only `application/json` and
/// `application/xml` are offered; a list naming neither is a 406.
fn build_representation(request: &Request) -> Result<Vec<u8>, HttpError> {
    let payload = EchoPayload::from_request(request);

    let accepts = request.headers().accept();
    if accepts.is_empty() {
        return render_json(&payload);
    }

    for accept in &accepts {
        if accept.media_type == "application" && accept.subtype == "json" {
            return render_json(&payload);
        }
        if accept.media_type == "application" && accept.subtype == "xml" {
            return Ok(render_xml(&payload));
        }
    }

    Err(HttpError::protocol(406, "Not Acceptable"))
}

fn render_json(payload: &EchoPayload) -> Result<Vec<u8>, HttpError> {
    serde_json::to_vec(payload).map_err(|e| HttpError::unclassified(format!("json encode failed: {e}")))
}

fn render_xml(payload: &EchoPayload) -> Vec<u8> {
    let mut xml = String::from("<Echo>\n");
    xml.push_str(&format!(" <method>{}</method>\n", escape_xml(&payload.method)));
    xml.push_str(&format!(" <request_target>{}</request_target>\n", escape_xml(&payload.request_target)));
    xml.push_str(&format!(" <version>{}</version>\n", escape_xml(&payload.version)));
    for header in &payload.headers {
        xml.push_str(&format!(" <headers>{}</headers>\n", escape_xml(header)));
    }
    xml.push_str(&format!(" <body>{}</body>\n", escape_xml(&payload.body)));
    xml.push_str("</Echo>");
    xml.into_bytes()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Walks the weight-sorted `Accept-Encoding` list: the first entry naming
/// gzip wins, the first naming identity stops negotiation with no
/// transformation. A list exhausting neither leaves no acceptable coding.
fn negotiate_coding(entries: &[AcceptEncoding]) -> Result<ContentCoding, HttpError> {
    for entry in entries {
        match entry.coding {
            ContentCoding::Gzip => return Ok(ContentCoding::Gzip),
            ContentCoding::Identity => return Ok(ContentCoding::Identity),
            _ => {}
        }
    }
    Err(HttpError::protocol(406, "Not Acceptable"))
}

fn gzip_compress(body: &[u8]) -> Result<Vec<u8>, HttpError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).map_err(|e| HttpError::unclassified(format!("gzip encode failed: {e}")))?;
    encoder.finish().map_err(|e| HttpError::unclassified(format!("gzip encode failed: {e}")))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::protocol::{HeaderSet, StartLine};

    use super::*;

    fn request_with(lines: &[&str], body: &[u8]) -> Request {
        let mut headers = HeaderSet::new();
        for line in lines {
            headers.push(HeaderField::parse(line).unwrap());
        }
        Request::new(StartLine::parse("GET / HTTP/1.1").unwrap(), headers, Bytes::copy_from_slice(body))
    }

    #[test]
    fn defaults_to_json() {
        let request = request_with(&["Host: localhost"], b"");
        let parts = echo_parts(&request, true).unwrap();

        assert_eq!(parts.status, 200);
        let json: serde_json::Value = serde_json::from_slice(&parts.body).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["request_target"], "/");
        assert_eq!(json["version"], "HTTP/1.1");
        assert_eq!(json["headers"][0], "HOST: localhost");
        assert_eq!(json["body"], "");
    }

    #[test]
    fn content_length_matches_body() {
        let request = request_with(&["Host: localhost"], b"payload");
        let parts = echo_parts(&request, true).unwrap();
        let content_length = parts.headers.first("Content-Length").unwrap().value().to_string();
        assert_eq!(content_length, parts.body.len().to_string());
    }

    #[test]
    fn renders_xml_on_request() {
        let request = request_with(&["Host: localhost", "Accept: application/xml"], b"x<y");
        let parts = echo_parts(&request, true).unwrap();

        let xml = String::from_utf8(parts.body.to_vec()).unwrap();
        assert!(xml.starts_with("<Echo>"));
        assert!(xml.contains(" <method>GET</method>"));
        assert!(xml.contains(" <headers>HOST: localhost</headers>"));
        assert!(xml.contains(" <body>x&lt;y</body>"));
    }

    #[test]
    fn quality_decides_between_json_and_xml() {
        let request =
            request_with(&["Host: localhost", "Accept: application/json; q=0.5, application/xml"], b"");
        let parts = echo_parts(&request, true).unwrap();
        assert!(parts.body.starts_with(b"<Echo>"));
    }

    #[test]
    fn unacceptable_media_type_is_406() {
        let request = request_with(&["Host: localhost", "Accept: text/html"], b"");
        let err = echo_parts(&request, true).unwrap_err();
        assert!(matches!(err, HttpError::Protocol { status: 406, .. }));
    }

    #[test]
    fn gzip_is_negotiated_and_advertised() {
        let request = request_with(&["Host: localhost", "Accept-Encoding: gzip"], b"");
        let parts = echo_parts(&request, true).unwrap();

        assert_eq!(parts.headers.first("Content-Encoding").unwrap().value(), "gzip");
        let inflated = crate::codec::body::gunzip(&parts.body).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&inflated).unwrap();
        assert_eq!(json["method"], "GET");
    }

    #[test]
    fn identity_preferred_over_lower_weighted_gzip() {
        let request = request_with(&["Host: localhost", "Accept-Encoding: gzip; q=0.5, identity"], b"");
        let parts = echo_parts(&request, true).unwrap();

        assert!(parts.headers.first("Content-Encoding").is_none());
        assert!(serde_json::from_slice::<serde_json::Value>(&parts.body).is_ok());
    }

    #[test]
    fn no_acceptable_coding_is_406() {
        let entries = vec![AcceptEncoding { coding: ContentCoding::Compress, weight: 1.0 }];
        let err = negotiate_coding(&entries).unwrap_err();
        assert!(matches!(err, HttpError::Protocol { status: 406, .. }));
    }

    #[test]
    fn head_omits_the_body_but_keeps_headers() {
        let request = request_with(&["Host: localhost"], b"");
        let full = echo_parts(&request, true).unwrap();
        let head = echo_parts(&request, false).unwrap();

        assert!(head.body.is_empty());
        assert_eq!(
            head.headers.first("Content-Length").unwrap().value(),
            full.headers.first("Content-Length").unwrap().value()
        );
    }

    #[test]
    fn range_slices_the_encoded_payload() {
        let request = request_with(&["Host: localhost", "Range: bytes=1-10"], b"");
        let parts = echo_parts(&request, true).unwrap();

        assert_eq!(parts.status, 206);
        assert_eq!(parts.body.len(), 9);
        let content_range = parts.headers.first("Content-Range").unwrap().value().to_string();
        assert!(content_range.starts_with("bytes 1-10/"));
    }

    #[test]
    fn range_past_the_payload_is_416() {
        let request = request_with(&["Host: localhost", "Range: bytes=0-100000"], b"");
        let parts = echo_parts(&request, true).unwrap();

        assert_eq!(parts.status, 416);
        assert_eq!(parts.headers.first("Content-Length").unwrap().value(), "0");
        assert!(parts.body.is_empty());
        assert!(parts.headers.first("Content-Range").unwrap().value().starts_with("bytes */"));
    }
}
