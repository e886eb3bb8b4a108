//! Wire codec and message types for the facility booking protocol.
//!
//! This crate defines the binary contract between the `slotbook` client and
//! the booking server, carried over unreliable UDP datagrams.
//!
//! # Wire Overview
//!
//! All multi-byte integers are little-endian. Strings are UTF-8 followed by
//! a single `0x00` terminator.
//!
//! ```text
//! request:   [type:1][request_id:1][payload]
//! response:  [type:1][request_id:1][payload]   (echoes the request header)
//! push:      [payload]                         (headerless FacilityRecord)
//! ```
//!
//! Responses echo the request's two-byte [`Envelope`] so the client can
//! correlate replies across retransmissions. Unsolicited pushes on the
//! monitor path carry no header; a pushed datagram is a bare
//! [`FacilityRecord`]. This asymmetry is the canonical contract.
//!
//! # Example
//!
//! ```rust
//! use slotbook_protocol::{Day, QueryRequest, Request};
//!
//! let request = Request::from(QueryRequest {
//!     name: "MainHall".to_string(),
//!     days: vec![Day::Monday, Day::Wednesday],
//! });
//! let bytes = request.encode(7);
//! assert_eq!(&bytes[..2], &[0, 7]); // [Query tag][request id]
//! ```

mod error;
mod schedule;
mod types;
mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use schedule::{DaySchedule, FacilityRecord};
pub use types::{
    Booking, BookingResponse, Day, Envelope, Monitor, QueryRequest, QueryResponse, Request,
    RequestKind, Response, Update, UpdateResponse,
};

/// Number of half-hour booking slots per day, covering 08:00 to 16:00.
pub const SLOTS_PER_DAY: usize = 16;

/// Largest datagram the client will accept; longer replies are truncated
/// by the receive buffer.
pub const MAX_DATAGRAM_SIZE: usize = 4096;
