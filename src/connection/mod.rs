//! Per-connection request/response loop.
//!
//! [`HttpConnection`] owns one accepted connection for its whole lifetime:
//! it decodes requests, writes responses, keeps the connection alive between
//! cycles and maps failures to wire-format error responses. The connection
//! is released on every exit path.

mod http_connection;

pub use http_connection::HttpConnection;
