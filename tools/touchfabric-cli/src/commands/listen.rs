//! Receive touch batches and print them.

use tokio::net::UdpSocket;
use touchfabric_dispatch::osc::decode_touch_batches;

/// Largest UDP payload.
const MAX_DATAGRAM: usize = 65_536;

pub async fn run(bind: String, port: u16, address: String) -> anyhow::Result<()> {
    let socket = UdpSocket::bind((bind.as_str(), port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {bind}:{port}: {e}"))?;
    tracing::info!(local = %socket.local_addr()?, %address, "Listening for touches");

    let mut buf = vec![0u8; MAX_DATAGRAM];
    let mut batches_seen: u64 = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                let (len, peer) = match received {
                    Ok(received) => received,
                    Err(e) => {
                        tracing::warn!(error = %e, "Receive failed");
                        continue;
                    }
                };
                let batches = match decode_touch_batches(&buf[..len], &address) {
                    Ok(batches) => batches,
                    Err(e) => {
                        tracing::warn!(error = %e, %peer, bytes = len, "Dropping undecodable packet");
                        continue;
                    }
                };

                let received_at = chrono::Utc::now().to_rfc3339();
                for touches in batches {
                    batches_seen += 1;
                    let line = serde_json::json!({
                        "received_at": received_at,
                        "from": peer.to_string(),
                        "touches": touches,
                    });
                    println!("{line}");
                }
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!(batches = batches_seen, "Listener stopped");
    Ok(())
}
