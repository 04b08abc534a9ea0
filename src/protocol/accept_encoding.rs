//! `Accept-Encoding` parsing and quality-value sorting.

use std::cmp::Ordering;

use crate::protocol::ContentCoding;

/// One entry of a parsed `Accept-Encoding` header.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptEncoding {
    pub coding: ContentCoding,
    pub weight: f64,
}

/// Parses an `Accept-Encoding` header value into a weight-sorted list.
///
/// The value is split on commas; each item may carry a `;q=<float>` parameter
/// (weight 1 when absent, weight 0 when unparsable). A `*` item records a
/// wildcard weight which, when non-zero, is expanded over every known coding
/// not explicitly listed. The result is sorted by descending weight (stable,
/// so equal weights keep encounter order) and zero-weight entries are
/// dropped. A client that ends up accepting nothing still gets `identity` at
/// weight 1, per the RFC 7231 default.
pub fn parse_accept_encoding(value: &str) -> Vec<AcceptEncoding> {
    let mut entries = Vec::new();
    let mut wildcard_weight = 0.0_f64;

    for item in value.split(',') {
        let mut parts = item.splitn(2, ';');
        let token = parts.next().unwrap_or("").trim();
        let weight = match parts.next() {
            None => 1.0,
            Some(parameter) => parameter
                .split_once('=')
                .and_then(|(_, q)| q.trim().parse::<f64>().ok())
                .unwrap_or(0.0),
        };

        if token == "*" {
            wildcard_weight = weight;
            continue;
        }
        entries.push(AcceptEncoding { coding: ContentCoding::from_token(token), weight });
    }

    if wildcard_weight != 0.0 {
        for coding in ContentCoding::ALL {
            if !entries.iter().any(|entry| entry.coding == coding) {
                entries.push(AcceptEncoding { coding, weight: wildcard_weight });
            }
        }
    }

    entries.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    entries.retain(|entry| entry.weight != 0.0);

    if entries.is_empty() {
        return vec![AcceptEncoding { coding: ContentCoding::Identity, weight: 1.0 }];
    }
    entries
}
