//! Push-subscription monitor session.
//!
//! A session registers interest with one `Monitor` request, then holds the
//! channel's socket in a receive loop for the requested duration. While the
//! subscription is active the server pushes a headerless [`FacilityRecord`]
//! datagram whenever a facility's schedule changes. When the window closes
//! the session sends a best-effort cancellation and is done.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use slotbook_protocol::{FacilityRecord, MAX_DATAGRAM_SIZE, Monitor, Request};

use crate::channel::InvocationChannel;
use crate::error::ClientResult;

/// Upper bound on one blocking receive while listening; keeps the
/// duration check from running arbitrarily late.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Session phases, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Subscribed,
    Listening,
    Cancelling,
}

/// Counters for one completed session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Facility records decoded and delivered.
    pub records: u32,
    /// Pushed datagrams that failed to decode and were skipped.
    pub decode_failures: u32,
}

/// A push-notification subscription driven over an [`InvocationChannel`]'s
/// socket.
///
/// The session borrows the channel exclusively for its whole lifetime, so
/// the request/response path and the push path can never interleave on one
/// socket.
pub struct MonitorSession<'a> {
    channel: &'a mut InvocationChannel,
    state: SessionState,
    stats: MonitorStats,
}

impl<'a> MonitorSession<'a> {
    /// Creates an idle session on `channel`.
    pub fn new(channel: &'a mut InvocationChannel) -> Self {
        Self {
            channel,
            state: SessionState::Idle,
            stats: MonitorStats::default(),
        }
    }

    /// Runs the full session: register for `duration` seconds of pushes,
    /// deliver each decoded record to `on_record` until the window closes,
    /// then cancel.
    pub async fn run<F>(mut self, duration: u32, mut on_record: F) -> ClientResult<MonitorStats>
    where
        F: FnMut(FacilityRecord),
    {
        self.register(duration).await?;
        self.listen(Duration::from_secs(u64::from(duration)), &mut on_record)
            .await;
        self.cancel().await;

        self.transition(SessionState::Idle);
        Ok(self.stats)
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "monitor session state");
        self.state = next;
    }

    /// Registration is a single send with no retry and no reply; a lost
    /// datagram degrades to an update-free session, detectable only by
    /// absence.
    async fn register(&mut self, duration: u32) -> ClientResult<()> {
        let request_id = self.channel.next_request_id();
        let datagram = Request::from(Monitor { duration }).encode(request_id);
        self.channel.send_raw(&datagram).await?;
        self.transition(SessionState::Subscribed);
        info!(duration, "monitor subscription registered");
        Ok(())
    }

    /// Receive loop bounded by wall-clock `window`. A poll timeout is not
    /// an error, it only re-checks the deadline; an undecodable push is
    /// logged and skipped, never fatal to the session.
    async fn listen<F>(&mut self, window: Duration, on_record: &mut F)
    where
        F: FnMut(FacilityRecord),
    {
        self.transition(SessionState::Listening);
        let deadline = Instant::now() + window;
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match time::timeout(remaining.min(POLL_TIMEOUT), self.channel.recv_raw(&mut buf)).await
            {
                Ok(Ok(received)) => match FacilityRecord::decode(&buf[..received]) {
                    Ok(record) => {
                        debug!(facility = %record.name, "push received");
                        self.stats.records += 1;
                        on_record(record);
                    }
                    Err(err) => {
                        self.stats.decode_failures += 1;
                        warn!(error = %err, "discarding undecodable push");
                    }
                },
                Ok(Err(err)) => {
                    warn!(error = %err, "receive failed while listening");
                }
                Err(_) => {
                    // poll timeout; loop back to the deadline check
                }
            }
        }
    }

    /// Best-effort unsubscribe: `Monitor { duration: 0 }`, no reply
    /// awaited, send failures swallowed.
    async fn cancel(&mut self) {
        self.transition(SessionState::Cancelling);
        let request_id = self.channel.next_request_id();
        let datagram = Request::from(Monitor::cancel()).encode(request_id);
        if let Err(err) = self.channel.send_raw(&datagram).await {
            debug!(error = %err, "cancellation send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RetryPolicy;
    use slotbook_protocol::{DaySchedule, SLOTS_PER_DAY};
    use std::net::SocketAddr;
    use tokio::net::UdpSocket;

    async fn test_pair() -> (UdpSocket, SocketAddr) {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        (server, addr)
    }

    fn sample_record(name: &str) -> FacilityRecord {
        let mut schedule = [DaySchedule([0; SLOTS_PER_DAY]); 5];
        schedule[0].0[4] = 2;
        FacilityRecord {
            name: name.to_string(),
            schedule,
        }
    }

    #[tokio::test]
    async fn session_delivers_pushes_then_cancels() {
        let (server, addr) = test_pair().await;
        let mut channel = InvocationChannel::connect(addr, RetryPolicy::default())
            .await
            .unwrap();

        let server_task = tokio::spawn(async move {
            let mut buf = [0u8; MAX_DATAGRAM_SIZE];
            let (received, client) = server.recv_from(&mut buf).await.unwrap();
            let (_, request) = Request::decode(&buf[..received]).unwrap();
            assert_eq!(request, Request::Monitor(Monitor { duration: 1 }));

            for name in ["MainHall", "Gym"] {
                let push = sample_record(name).encode();
                server.send_to(&push, client).await.unwrap();
            }

            // wait for the cancellation after the window closes
            let (received, _) = server.recv_from(&mut buf).await.unwrap();
            let (_, request) = Request::decode(&buf[..received]).unwrap();
            assert_eq!(request, Request::Monitor(Monitor { duration: 0 }));
        });

        let mut seen = Vec::new();
        let stats = MonitorSession::new(&mut channel)
            .run(1, |record| seen.push(record.name))
            .await
            .unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.decode_failures, 0);
        assert_eq!(seen, ["MainHall", "Gym"]);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn undecodable_push_is_skipped() {
        let (server, addr) = test_pair().await;
        let mut channel = InvocationChannel::connect(addr, RetryPolicy::default())
            .await
            .unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; MAX_DATAGRAM_SIZE];
            let (_, client) = server.recv_from(&mut buf).await.unwrap();

            // no NUL terminator anywhere in this datagram
            server.send_to(&[0xFF, 0xFF, 0xFF], client).await.unwrap();
            let push = sample_record("Pool").encode();
            server.send_to(&push, client).await.unwrap();
        });

        let mut seen = Vec::new();
        let stats = MonitorSession::new(&mut channel)
            .run(1, |record| seen.push(record.name))
            .await
            .unwrap();

        assert_eq!(stats.records, 1);
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(seen, ["Pool"]);
    }
}
