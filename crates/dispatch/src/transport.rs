//! Fire-and-forget message transports.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use touchfabric_common::config::NetworkConfig;
use touchfabric_common::error::{TouchFabricError, TouchFabricResult};

use crate::osc::encode_message;

/// Trait for message sinks.
///
/// `send` must not block waiting for the peer; a send that cannot complete
/// immediately is an error and the message is dropped.
pub trait Transport: Send {
    /// Send one message carrying a single string argument.
    fn send(&mut self, address: &str, payload: &str) -> TouchFabricResult<()>;

    /// Human-readable destination for logging.
    fn destination(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, address: &str, payload: &str) -> TouchFabricResult<()> {
        (**self).send(address, payload)
    }

    fn destination(&self) -> String {
        (**self).destination()
    }
}

/// OSC over UDP from an ephemeral, non-blocking local socket.
#[derive(Debug)]
pub struct OscUdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscUdpTransport {
    /// Resolve `host:port` and bind a local socket. No packet is sent.
    pub fn connect(host: &str, port: u16) -> TouchFabricResult<Self> {
        let target = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| TouchFabricError::transport(format!("No address for {host}:{port}")))?;

        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_nonblocking(true)?;

        Ok(Self { socket, target })
    }

    pub fn from_config(config: &NetworkConfig) -> TouchFabricResult<Self> {
        Self::connect(&config.host, config.port)
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Transport for OscUdpTransport {
    fn send(&mut self, address: &str, payload: &str) -> TouchFabricResult<()> {
        let packet = encode_message(address, payload)?;
        let target = self.target;
        self.socket
            .send_to(&packet, target)
            .map_err(|e| TouchFabricError::transport(format!("send to {target} failed: {e}")))?;
        Ok(())
    }

    fn destination(&self) -> String {
        format!("osc.udp://{}", self.target)
    }
}

/// Discards every message.
#[derive(Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, _address: &str, _payload: &str) -> TouchFabricResult<()> {
        Ok(())
    }

    fn destination(&self) -> String {
        "null".to_string()
    }
}

/// A message captured by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub address: String,
    pub payload: String,
}

/// Records messages in memory, optionally failing every send.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<SentMessage>,
    fail: bool,
    attempts: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails, as an unreachable peer would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    /// Number of send calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Forget recorded messages.
    pub fn take(&mut self) -> Vec<SentMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, address: &str, payload: &str) -> TouchFabricResult<()> {
        self.attempts += 1;
        if self.fail {
            return Err(TouchFabricError::transport("destination unreachable"));
        }
        self.sent.push(SentMessage {
            address: address.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osc::decode_messages;

    #[test]
    fn test_udp_transport_delivers_osc_packet() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut transport = OscUdpTransport::connect("127.0.0.1", port).unwrap();
        transport.send("/touches", "[]").unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        let messages = decode_messages(&buf[..len]).unwrap();
        assert_eq!(
            messages,
            vec![("/touches".to_string(), vec!["[]".to_string()])]
        );
        assert_eq!(transport.destination(), format!("osc.udp://127.0.0.1:{port}"));
    }

    #[test]
    fn test_memory_transport_records_and_fails() {
        let mut ok = MemoryTransport::new();
        ok.send("/touches", "[]").unwrap();
        assert_eq!(ok.sent().len(), 1);
        assert_eq!(ok.take().len(), 1);
        assert!(ok.sent().is_empty());

        let mut bad = MemoryTransport::failing();
        assert!(bad.send("/touches", "[]").is_err());
        assert_eq!(bad.attempts(), 1);
        assert!(bad.sent().is_empty());
    }
}
