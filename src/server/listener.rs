use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!(
        "Listening on {} (document root {})",
        cfg.listen_addr,
        cfg.document_root.display()
    );

    serve(listener, cfg).await
}

/// Accepts connections on an already bound listener and hands each one to
/// its own task.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("accept() failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let config = cfg.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, client_address(&peer), config);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
            info!("Closed connection from {}", peer);
        });
    }
}

/// Dotted-quad form of the peer address, unwrapping IPv4-mapped IPv6.
///
/// IPv6 loopback is reported as `127.0.0.1` so the implicit loopback rule
/// covers it.
pub fn client_address(peer: &SocketAddr) -> String {
    match peer.ip() {
        IpAddr::V6(v6) if v6 == Ipv6Addr::LOCALHOST => Ipv4Addr::LOCALHOST.to_string(),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
        ip => ip.to_string(),
    }
}
