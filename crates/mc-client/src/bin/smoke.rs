//! A minimal end-to-end smoke test: resolve a server address, complete a
//! Status-state handshake, and print the status response JSON. Exercises
//! resolution, framing and the state machine without needing a real
//! account — the one CLI surface this workspace keeps.

use mc_client::connection::Connection;
use mc_client::packets::{Handshake, PingRequest, PongResponse, StatusRequest, StatusResponse};
use mc_client::resolve::resolve_address;
use mc_protocol::{ConnectionState, VarInt};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mc_client_smoke=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.next().and_then(|s| s.parse().ok());

    let resolved = resolve_address(&host, port).await?;
    info!("resolved {} to {}", resolved.hostname, resolved.socket_addr);

    let mut conn = Connection::connect(resolved.socket_addr).await?;

    conn.write_packet(&Handshake {
        protocol_version: VarInt(mc_client::PROTOCOL_VERSION),
        server_address: resolved.hostname.clone(),
        server_port: resolved.port,
        next_state: VarInt(1),
    })
    .await?;
    conn.transition(ConnectionState::Status)?;

    conn.write_packet(&StatusRequest {}).await?;
    let status: StatusResponse = conn.read_packet().await?;
    println!("{}", status.json);

    let ping_payload = 0x1234_5678_9abc_def0_i64;
    conn.write_packet(&PingRequest { payload: ping_payload }).await?;
    let pong: PongResponse = conn.read_packet().await?;
    if pong.payload != ping_payload {
        tracing::warn!("pong payload did not match ping payload");
    }

    Ok(())
}
