//! UDP invocation channel with configurable delivery semantics.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time;
use tracing::{debug, warn};

use slotbook_protocol::{Envelope, MAX_DATAGRAM_SIZE, Request, Response};

use crate::error::{ClientError, ClientResult};
use crate::request_id::RequestIdSequence;

/// Invocation semantics for the request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Semantics {
    /// Retransmit on timeout. The server may execute a request more than
    /// once; it is responsible for deduplicating by request id.
    AtLeastOnce,
    /// Send exactly once and never retransmit. A lost datagram means
    /// silent loss.
    AtMostOnce,
}

/// Timeout/retry policy for one channel.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// How long each attempt waits for a reply.
    pub timeout: Duration,
    /// Retransmissions after the first attempt, under at-least-once.
    pub retries: u32,
    /// Delivery guarantee.
    pub semantics: Semantics,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            retries: 2,
            semantics: Semantics::AtLeastOnce,
        }
    }
}

impl RetryPolicy {
    /// Number of send attempts this policy allows.
    pub fn attempts(&self) -> u32 {
        match self.semantics {
            Semantics::AtMostOnce => 1,
            Semantics::AtLeastOnce => self.retries + 1,
        }
    }
}

/// Client endpoint for the request/response exchange.
///
/// Owns the datagram socket and the request-id sequence. Requests are
/// strictly serialized: one outstanding request, blocked until its reply
/// arrives or the policy gives up, before the next may be issued.
pub struct InvocationChannel {
    socket: UdpSocket,
    server: SocketAddr,
    policy: RetryPolicy,
    ids: RequestIdSequence,
}

impl InvocationChannel {
    /// Binds an ephemeral local socket for exchanges with `server`.
    pub async fn connect(server: SocketAddr, policy: RetryPolicy) -> ClientResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        debug!(local = %socket.local_addr()?, %server, "channel bound");
        Ok(Self {
            socket,
            server,
            policy,
            ids: RequestIdSequence::new(),
        })
    }

    /// The server this channel talks to.
    pub fn server(&self) -> SocketAddr {
        self.server
    }

    pub(crate) fn next_request_id(&mut self) -> u8 {
        self.ids.next_id()
    }

    /// Sends `bytes` to the server as one datagram.
    pub(crate) async fn send_raw(&self, bytes: &[u8]) -> ClientResult<()> {
        self.socket.send_to(bytes, self.server).await?;
        Ok(())
    }

    /// Receives one datagram into `buf`, from any source.
    pub(crate) async fn recv_raw(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        let (received, _) = self.socket.recv_from(buf).await?;
        Ok(received)
    }

    /// Sends `request` and waits for its reply under the channel policy.
    ///
    /// Under at-most-once the datagram goes out exactly once and a timeout
    /// fails immediately. Under at-least-once the identical datagram is
    /// retransmitted up to `retries` more times, each attempt waiting the
    /// full timeout; the first reply received wins and the last failure is
    /// surfaced once every attempt is spent.
    ///
    /// Decode failures abort at once and are never retried. A reply whose
    /// echoed header does not match the request is logged as a warning and
    /// still returned; UDP gives no ordering guarantee across
    /// retransmissions, so the mismatch is advisory.
    pub async fn invoke(&mut self, request: &Request) -> ClientResult<Response> {
        let request_id = self.ids.next_id();
        let datagram = request.encode(request_id);
        let attempts = self.policy.attempts();
        let mut last_err = ClientError::Timeout { attempts };

        for attempt in 1..=attempts {
            debug!(attempt, attempts, request_id, "sending request");
            if let Err(err) = self.socket.send_to(&datagram, self.server).await {
                last_err = ClientError::Io(err);
                continue;
            }

            let mut buf = [0u8; MAX_DATAGRAM_SIZE];
            match time::timeout(self.policy.timeout, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((received, _))) => {
                    let (envelope, response) = Response::decode(&buf[..received])?;
                    self.check_correlation(envelope, request, request_id);
                    return Ok(response);
                }
                Ok(Err(err)) => {
                    last_err = ClientError::Io(err);
                }
                Err(_) => {
                    debug!(attempt, timeout = ?self.policy.timeout, "no reply");
                    last_err = ClientError::Timeout { attempts };
                }
            }
        }

        Err(last_err)
    }

    fn check_correlation(&self, envelope: Envelope, request: &Request, request_id: u8) {
        if envelope.request_id != request_id {
            warn!(
                expected = request_id,
                received = envelope.request_id,
                "response request id mismatch"
            );
        }
        if envelope.kind != request.kind() {
            warn!(
                expected = ?request.kind(),
                received = ?envelope.kind,
                "response kind mismatch"
            );
        }
    }
}
