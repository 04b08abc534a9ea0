//! A from-scratch HTTP/1.1 echo server.
//!
//! This crate terminates raw byte streams, parses request messages according
//! to the framing rules of RFC 7230/7231 without relying on a pre-built HTTP
//! stack, performs content negotiation and serializes responses including
//! partial-content delivery. Every request is answered with a representation
//! of itself (JSON or XML, selected via `Accept`), which makes the server a
//! convenient wire-level diagnostic tool.
//!
//! # Features
//!
//! - Hand-written request parsing with case-insensitive header lookups by
//!   construction
//! - Body framing via `Content-Length` or chunked transfer encoding
//! - gzip decoding of request bodies and gzip negotiation for responses
//! - Byte-range (`206`/`416`) responses over the echoed representation
//! - Keep-alive connections with strictly sequential request processing
//! - Asynchronous I/O using tokio, one independent task per connection
//!
//! # Example
//!
//! ```no_run
//! use echo_http::server::Server;
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(addr = "127.0.0.1:8080", "start listening");
//!     let server = match Server::bind("127.0.0.1:8080").await {
//!         Ok(server) => server,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     if let Err(e) = server.run().await {
//!         error!(cause = %e, "server error");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the data model — start line, header set with typed
//!   accessors, negotiation entries, range specs and the error taxonomy
//! - [`codec`]: byte-level decoding of requests and encoding of responses
//! - [`response`]: response behaviors (echo, HEAD, OPTIONS), negotiation and
//!   the range engine
//! - [`connection`]: the per-connection read-parse-respond loop
//! - [`server`]: socket binding and the accept loop
//!
//! # Limitations
//!
//! - HTTP/1.1 only, origin-form request targets only
//! - No TLS (use a reverse proxy for HTTPS)
//! - Chunked trailers are not consumed; chunk extensions are not supported
//! - Multi-range requests: only the first range is honored
//! - Of the compression codings only gzip is implemented; `compress` and
//!   `deflate` pass through untransformed
//! - Maximum header line size: 8KB; maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod response;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
