//! TCP accept loop.

use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{error, info, warn};

use crate::connection::HttpConnection;

/// The bound listening socket and its accept loop.
///
/// This is the only process-wide state: each accepted connection is handed
/// off to its own spawned task and an independent [`HttpConnection`], with no
/// shared mutable state between them.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Binds the listening socket.
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Server> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Server { listener })
    }

    /// The address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, spawning one task per connection.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (tcp_stream, remote_addr) = match self.listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process().await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                    }
                }
            });
        }
    }
}
