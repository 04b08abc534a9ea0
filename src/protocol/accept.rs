//! `Accept` header parsing.

use std::cmp::Ordering;

/// A single `key=value` parameter of an `Accept` entry.
///
/// A parameter without `=` is kept as a bare value with an empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptParameter {
    pub key: String,
    pub value: String,
}

/// One media range of a parsed `Accept` header, e.g. `application/json;q=0.5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptEntry {
    pub media_type: String,
    pub subtype: String,
    pub parameters: Vec<AcceptParameter>,
}

impl AcceptEntry {
    /// The entry's quality value: its `q` parameter, defaulting to 1 when the
    /// parameter is absent or unparsable.
    pub fn weight(&self) -> f64 {
        for parameter in &self.parameters {
            if parameter.key == "q" {
                return parameter.value.parse().unwrap_or(1.0);
            }
        }
        1.0
    }
}

/// Parses an `Accept` header value, sorted by descending quality value.
///
/// The sort is stable: entries of equal weight keep encounter order.
pub fn parse_accept(value: &str) -> Vec<AcceptEntry> {
    let mut entries = Vec::new();

    for item in value.split(',') {
        let mut segments = item.split(';');
        let media_range = segments.next().unwrap_or("");
        let (media_type, subtype) = match media_range.split_once('/') {
            Some((media_type, subtype)) => (media_type.trim(), subtype.trim()),
            None => (media_range.trim(), ""),
        };

        let mut parameters = Vec::new();
        for segment in segments {
            match segment.split_once('=') {
                Some((key, value)) => parameters
                    .push(AcceptParameter { key: key.trim().to_string(), value: value.trim().to_string() }),
                None => parameters
                    .push(AcceptParameter { key: String::new(), value: segment.trim().to_string() }),
            }
        }

        entries.push(AcceptEntry {
            media_type: media_type.to_string(),
            subtype: subtype.to_string(),
            parameters,
        });
    }

    entries.sort_by(|a, b| b.weight().partial_cmp(&a.weight()).unwrap_or(Ordering::Equal));
    entries
}
