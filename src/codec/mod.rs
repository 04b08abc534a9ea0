//! Encoding and decoding of HTTP messages.
//!
//! # Architecture
//!
//! - [`RequestDecoder`]: state machine turning connection bytes into
//!   [`Request`](crate::protocol::Request) values, with body framing
//!   delegated to the [`body`] module
//! - [`ResponseEncoder`]: serializes
//!   [`ResponseParts`](crate::response::ResponseParts) back to wire bytes
//!
//! Both sides implement the `tokio-util` codec traits over `BytesMut`.

pub mod body;

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
