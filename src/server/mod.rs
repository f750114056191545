pub mod auth;
pub mod error;
pub mod extractors;
pub mod health;

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::ProviderConfig;
use auth::{AuthContext, TransactionStore};

pub fn run_server(port: u16, provider: ProviderConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(start_server_async(port, provider))
}

/// Async version of `run_server` for embedding in an existing tokio runtime.
pub async fn start_server_async(port: u16, provider: ProviderConfig) -> Result<()> {
    let store = TransactionStore::new(provider.state_ttl);

    // Background sweeper: drop pending logins whose callback never arrived
    auth::store::spawn_sweeper(store.clone());

    let http = reqwest::Client::builder()
        .timeout(provider.exchange_timeout)
        .build()?;

    let ctx = AuthContext {
        store: store.clone(),
        provider: Arc::new(provider),
        http,
    };

    let app = Router::new()
        .merge(auth::routes(ctx))
        .merge(health::routes(store))
        .layer(CorsLayer::permissive());

    println!("authrelay listening at http://localhost:{}", port);
    if let Some(ip) = local_ip() {
        println!("  Network: http://{}:{}", ip, port);
    }

    let listener = bind_with_reuse(port).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Bind a TCP listener with SO_REUSEADDR so restarts reclaim the port instantly.
async fn bind_with_reuse(port: u16) -> Result<tokio::net::TcpListener> {
    let addr: std::net::SocketAddr = format!("0.0.0.0:{port}").parse()?;
    let socket = socket2::Socket::new(
        socket2::Domain::IPV4,
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(tokio::net::TcpListener::from_std(std_listener)?)
}

/// Detect the machine's LAN IP address by opening a UDP socket to a public address.
fn local_ip() -> Option<std::net::IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|a| a.ip())
}
