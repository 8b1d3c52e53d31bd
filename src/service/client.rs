//! Async Query client over UDP.
//!
//! Owns one [`UdpTransport`] and one [`QueryDriver`]; pumps inbound datagrams
//! through the driver until the awaited response slot resolves.
//!
//! There is no built-in timeout anywhere in this layer: the protocol gives no
//! cancellation or expiry signal, so callers race these futures against
//! `tokio::time::timeout` when they want one. Abandoning a call mid-wait is
//! safe and leaves nothing dangling beyond an ignored waiter registration.

use crate::config::ClientConfig;
use crate::core::packet::{BasicStat, ChallengeToken, FullStat, Packet, SessionId};
use crate::error::{constants, QueryError, Result};
use crate::protocol::driver::{QueryDriver, ResponseSlot, SessionState};
use crate::transport::UdpTransport;
use crate::utils::generate_session_id;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, instrument};

/// Async client for one Query session.
///
/// # Example
/// ```ignore
/// let mut client = QueryClient::connect("mc.example.org", 25565).await?;
/// client.handshake().await?;
/// let stat = client.basic_stat().await?;
/// println!("{} / {} players", stat.num_players, stat.max_players);
/// ```
pub struct QueryClient {
    transport: UdpTransport,
    driver: QueryDriver,
    recv_buf: Vec<u8>,
}

impl QueryClient {
    /// Connect to a server with the default configuration.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let config = ClientConfig::default_with_overrides(|c| c.port = port);
        Self::connect_with_config(host, config).await
    }

    /// Connect to a server with an explicit configuration.
    ///
    /// The session id is fixed here for the lifetime of the client: either
    /// the configured override (masked to the wire constraint) or a fresh
    /// random one.
    #[instrument(skip(config))]
    pub async fn connect_with_config(host: &str, config: ClientConfig) -> Result<Self> {
        let session_id = match config.session_id {
            Some(raw) => SessionId::new(raw),
            None => generate_session_id(),
        };

        let transport = UdpTransport::connect(&config.bind_address, host, config.port).await?;
        debug!(session_id = session_id.value(), "query client ready");

        Ok(Self {
            transport,
            driver: QueryDriver::new(session_id),
            recv_buf: vec![0; config.recv_buffer_size],
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.driver.session_id()
    }

    pub fn state(&self) -> SessionState {
        self.driver.state()
    }

    /// The challenge token from the most recent handshake, if any.
    pub fn challenge_token(&self) -> Option<ChallengeToken> {
        self.driver.challenge_token()
    }

    /// Perform the handshake and store the issued challenge token.
    ///
    /// The token is not refreshed automatically; call this again when the
    /// server stops answering stat requests.
    pub async fn handshake(&mut self) -> Result<ChallengeToken> {
        let (datagram, slot) = self.driver.start_handshake()?;
        match self.exchange(&datagram, slot).await? {
            Packet::HandshakeResponse { challenge_token } => Ok(challenge_token),
            other => Err(unexpected_response(&other)),
        }
    }

    /// Request the compact status summary.
    ///
    /// # Errors
    /// [`QueryError::HandshakeRequired`] if [`Self::handshake`] has not
    /// completed.
    pub async fn basic_stat(&mut self) -> Result<BasicStat> {
        let (datagram, slot) = self.driver.request_basic_stat()?;
        match self.exchange(&datagram, slot).await? {
            Packet::BasicStatResponse(stat) => Ok(stat),
            other => Err(unexpected_response(&other)),
        }
    }

    /// Request the full key/value status dump and player list.
    ///
    /// # Errors
    /// [`QueryError::HandshakeRequired`] if [`Self::handshake`] has not
    /// completed.
    pub async fn full_stat(&mut self) -> Result<FullStat> {
        let (datagram, slot) = self.driver.request_full_stat()?;
        match self.exchange(&datagram, slot).await? {
            Packet::FullStatResponse(stat) => Ok(stat),
            other => Err(unexpected_response(&other)),
        }
    }

    /// Send one request and pump inbound datagrams until the slot resolves.
    async fn exchange(&mut self, datagram: &[u8], mut slot: ResponseSlot) -> Result<Packet> {
        self.transport.send(datagram).await?;

        loop {
            let n = self.transport.recv(&mut self.recv_buf).await?;
            let _ = self.driver.handle_datagram(&self.recv_buf[..n]);

            match slot.try_recv() {
                Ok(packet) => return Ok(packet),
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Closed) => {
                    return Err(QueryError::Custom(
                        constants::ERR_RESPONSE_ABANDONED.to_string(),
                    ))
                }
            }
        }
    }
}

fn unexpected_response(packet: &Packet) -> QueryError {
    QueryError::Custom(format!(
        "response slot resolved with mismatched kind {:?}",
        packet.kind()
    ))
}
