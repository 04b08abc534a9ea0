use bytes::BytesMut;
use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, FramedWrite};
use tracing::{error, info, trace};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::protocol::{HttpError, Request};
use crate::response::{Response, error_parts};

/// Initial capacity of the per-connection read buffer.
const INIT_BUFFER_SIZE: usize = 8 * 1024;

/// Drives the request/response loop of one accepted connection.
///
/// `HttpConnection` reads bytes into a buffer, feeds them to the
/// [`RequestDecoder`] and answers each decoded request, looping while the
/// connection is kept alive. Outcomes of a read-parse cycle:
///
/// - a request: answer it, then loop unless it asked `Connection: close`
/// - [`HttpError::WaitingForData`]: an idle line, retry reading
/// - a protocol violation: answer with its status and message, then close
/// - end of stream: close silently
/// - anything else: answer `503 Service Unavailable`, then close
///
/// Requests are processed strictly in arrival order; the decoder never reads
/// past the current request's framing boundary, so pipelined requests are
/// answered one at a time.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
pub struct HttpConnection<R, W> {
    reader: R,
    buffer: BytesMut,
    decoder: RequestDecoder,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            decoder: RequestDecoder::new(),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Runs the connection until it closes.
    pub async fn process(mut self) -> Result<(), HttpError> {
        loop {
            let request = match self.next_request().await {
                Ok(Some(request)) => request,
                Ok(None) => {
                    info!("no more requests, closing connection");
                    break;
                }
                Err(HttpError::WaitingForData) => continue,
                Err(HttpError::Protocol { status, message }) => {
                    error!(status, %message, "protocol violation, answering and closing");
                    self.framed_write.send(error_parts(status, &message)).await?;
                    break;
                }
                Err(e) => {
                    error!(cause = %e, "request parsing failed, answering 503 and closing");
                    self.framed_write.send(error_parts(503, "Service Unavailable")).await?;
                    break;
                }
            };

            trace!(path = request.start_line().target(), "dispatching request");
            let close_requested = request.headers().is_connection_close();

            match Response::for_request(request).into_parts() {
                Ok(parts) => self.framed_write.send(parts).await?,
                Err(HttpError::Protocol { status, message }) => {
                    error!(status, %message, "request not answerable, closing");
                    self.framed_write.send(error_parts(status, &message)).await?;
                    break;
                }
                Err(e) => {
                    error!(cause = %e, "response construction failed, answering 503 and closing");
                    self.framed_write.send(error_parts(503, "Service Unavailable")).await?;
                    break;
                }
            }

            if close_requested {
                info!("client requested connection close");
                break;
            }
        }

        self.framed_write.get_mut().shutdown().await.map_err(HttpError::from)
    }

    /// Reads until the decoder produces a request or the stream ends.
    async fn next_request(&mut self) -> Result<Option<Request>, HttpError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(request));
            }
            let n = self.reader.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return self.decoder.decode_eof(&mut self.buffer);
            }
        }
    }
}
