//! Request body handling.
//!
//! # Components
//!
//! - [`PayloadDecoder`]: selects between the framing modes
//! - [`LengthDecoder`](length_decoder::LengthDecoder): `Content-Length` framing
//! - [`ChunkedDecoder`](chunked_decoder::ChunkedDecoder): chunked transfer
//!   encoding
//! - [`decode_content`]: the content-decoding (decompression) pipeline that
//!   runs once framing is complete

mod chunked_decoder;
mod content_decoder;
mod length_decoder;
mod payload_decoder;

pub use content_decoder::{decode_content, gunzip};
pub use payload_decoder::PayloadDecoder;
