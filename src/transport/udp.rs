//! UDP datagram transport.
//!
//! A thin wrapper over `tokio::net::UdpSocket`, connected to a single remote
//! peer. The socket is exclusively owned by one client instance; there is no
//! protocol-level sharing or pooling. Lifecycle events (connect, disconnect,
//! raw datagrams) surface as `tracing` events.

use crate::error::Result;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info, instrument, trace};

/// Connected UDP transport for one Query session.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind a local socket and connect it to the remote peer.
    ///
    /// Connecting a UDP socket filters inbound datagrams to the peer address,
    /// which is the only sender this client ever wants to hear from.
    #[instrument(skip(bind_address))]
    pub async fn connect(bind_address: &str, host: &str, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(bind_address).await?;
        socket.connect((host, port)).await?;

        let peer = socket.peer_addr()?;
        info!(%peer, local = %socket.local_addr()?, "udp transport connected");

        Ok(Self { socket, peer })
    }

    /// Send one datagram to the connected peer.
    pub async fn send(&self, datagram: &[u8]) -> Result<()> {
        let sent = self.socket.send(datagram).await?;
        trace!(bytes = sent, "datagram sent");
        Ok(())
    }

    /// Receive one datagram from the connected peer.
    ///
    /// Returns the number of bytes written into `buf`. A datagram larger than
    /// `buf` is truncated by the OS, so callers size the buffer for the
    /// largest expected response.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        let received = self.socket.recv(buf).await?;
        trace!(bytes = received, "datagram received");
        Ok(received)
    }

    /// The remote peer this transport is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// The local address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        debug!(peer = %self.peer, "udp transport disconnected");
    }
}
