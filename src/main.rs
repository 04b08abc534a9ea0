use echo_http::server::Server;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let addr = std::env::var("ECHO_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!(%addr, "start listening");
    let server = match Server::bind(addr.as_str()).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    if let Err(e) = server.run().await {
        error!(cause = %e, "server error");
    }
}
