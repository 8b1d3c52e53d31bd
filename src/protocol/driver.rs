//! Session protocol driver.
//!
//! Sequences the handshake-then-stat exchange and holds the challenge-token
//! state. The driver is transport-agnostic: each request operation returns the
//! encoded outbound datagram plus a one-shot response slot, and inbound
//! datagrams are fed in through [`QueryDriver::handle_datagram`].
//!
//! Dispatch is event-driven and single-threaded: one datagram at a time flows
//! through classify → decode → resolve-waiter, and at most one waiter is
//! resolved per arrival. There is no built-in timeout; callers wanting one
//! race the response slot against an external timer. Abandoning a wait is
//! safe — a late or duplicate response is simply left unconsumed.
//!
//! Malformed inbound datagrams are reported through the driver's diagnostic
//! sink and dropped; they never escalate out of the dispatch path. The reader
//! is long-lived and must survive forged datagrams indefinitely.

use crate::core::classify::classify;
use crate::core::codec::{decode, encode};
use crate::core::packet::{ChallengeToken, Packet, PacketKind, SessionId, Side};
use crate::error::{QueryError, Result};
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Caller-suppliable sink for datagram-scoped diagnostics.
///
/// Injected rather than global so the driver stays side-effect-free and
/// independently testable. The default sink logs through `tracing`.
pub type DiagnosticSink = Box<dyn FnMut(&QueryError) + Send>;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No handshake attempted yet.
    Idle,
    /// Handshake request sent, awaiting the challenge token.
    Handshaking,
    /// Challenge token held; stat requests may be issued.
    Ready,
}

/// One-shot receiving end for a pending response.
pub type ResponseSlot = oneshot::Receiver<Packet>;

/// Transport-agnostic session driver for one Query exchange at a time.
pub struct QueryDriver {
    session_id: SessionId,
    state: SessionState,
    challenge_token: Option<ChallengeToken>,
    /// Pending waiter per response kind; dispatch resolves and clears at most
    /// one slot per inbound datagram. Two stat kinds may be pending at once;
    /// the classifier keeps them distinct.
    pending: HashMap<PacketKind, oneshot::Sender<Packet>>,
    on_warning: Option<DiagnosticSink>,
}

impl QueryDriver {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: SessionState::Idle,
            challenge_token: None,
            pending: HashMap::new(),
            on_warning: None,
        }
    }

    /// Replace the default `tracing` warning output with a caller-supplied
    /// sink.
    pub fn with_diagnostic_sink(mut self, sink: DiagnosticSink) -> Self {
        self.on_warning = Some(sink);
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The challenge token from the most recent handshake, if any.
    ///
    /// Never refreshed automatically: the server gives no expiry signal, so
    /// callers re-handshake when stat requests stop being answered.
    pub fn challenge_token(&self) -> Option<ChallengeToken> {
        self.challenge_token
    }

    /// Begin a handshake: returns the encoded request datagram and a slot
    /// that resolves when the challenge token arrives.
    pub fn start_handshake(&mut self) -> Result<(Bytes, ResponseSlot)> {
        let datagram = encode(&Packet::HandshakeRequest, self.session_id, Side::Client)?;
        let slot = self.register_waiter(PacketKind::HandshakeResponse);
        self.state = SessionState::Handshaking;
        Ok((datagram, slot))
    }

    /// Build a basic-stat request with the held challenge token.
    ///
    /// # Errors
    /// [`QueryError::HandshakeRequired`] if no handshake has completed.
    pub fn request_basic_stat(&mut self) -> Result<(Bytes, ResponseSlot)> {
        let challenge_token = self.challenge_token.ok_or(QueryError::HandshakeRequired)?;
        let datagram = encode(
            &Packet::BasicStatRequest { challenge_token },
            self.session_id,
            Side::Client,
        )?;
        Ok((datagram, self.register_waiter(PacketKind::BasicStatResponse)))
    }

    /// Build a full-stat request with the held challenge token.
    ///
    /// # Errors
    /// [`QueryError::HandshakeRequired`] if no handshake has completed.
    pub fn request_full_stat(&mut self) -> Result<(Bytes, ResponseSlot)> {
        let challenge_token = self.challenge_token.ok_or(QueryError::HandshakeRequired)?;
        let datagram = encode(
            &Packet::FullStatRequest { challenge_token },
            self.session_id,
            Side::Client,
        )?;
        Ok((datagram, self.register_waiter(PacketKind::FullStatResponse)))
    }

    /// Feed one inbound datagram through classify → decode → dispatch.
    ///
    /// Returns the kind that was dispatched, or `None` when the datagram was
    /// dropped. Never returns an error: malformed input goes to the
    /// diagnostic sink and the reader keeps listening.
    pub fn handle_datagram(&mut self, raw: &[u8]) -> Option<PacketKind> {
        let classified = match classify(raw, Side::Client) {
            Ok(classified) => classified,
            Err(err) => {
                self.report(&err);
                return None;
            }
        };

        let packet = match decode(classified.kind, classified.payload) {
            Ok(packet) => packet,
            Err(err) => {
                self.report(&err);
                return None;
            }
        };

        let kind = packet.kind();
        debug!(?kind, session_id = classified.session_id, "dispatching inbound packet");

        if let Packet::HandshakeResponse { challenge_token } = packet {
            // Each handshake response overwrites the previous token.
            self.challenge_token = Some(challenge_token);
            self.state = SessionState::Ready;
        }

        if let Some(waiter) = self.pending.remove(&kind) {
            // A dropped receiver means the wait was abandoned; that is fine,
            // the response is simply left unconsumed.
            let _ = waiter.send(packet);
        }

        Some(kind)
    }

    fn register_waiter(&mut self, kind: PacketKind) -> ResponseSlot {
        let (tx, rx) = oneshot::channel();
        // A replaced waiter corresponds to an abandoned earlier wait.
        self.pending.insert(kind, tx);
        rx
    }

    fn report(&mut self, err: &QueryError) {
        match &mut self.on_warning {
            Some(sink) => sink(err),
            None => warn!(error = %err, "dropping malformed datagram"),
        }
    }
}

impl std::fmt::Debug for QueryDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDriver")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("challenge_token", &self.challenge_token)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}
