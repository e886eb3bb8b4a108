//! Request and response types for the facility booking protocol.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, ProtocolResult};
use crate::schedule::DaySchedule;
use crate::wire;

/// Message kind carried in the leading tag byte of every request and
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestKind {
    /// Query facility availability.
    Query = 0,
    /// Book a range of slots.
    Book = 1,
    /// Shift an existing booking.
    Update = 2,
    /// Register or cancel a push subscription.
    Monitor = 3,
}

impl TryFrom<u8> for RequestKind {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> ProtocolResult<Self> {
        match byte {
            0 => Ok(Self::Query),
            1 => Ok(Self::Book),
            2 => Ok(Self::Update),
            3 => Ok(Self::Monitor),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

/// Two-byte header prefixed to every request and echoed by every normal
/// response. Unsolicited pushes carry no envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Message kind tag.
    pub kind: RequestKind,
    /// Correlation id, chosen by the client and echoed by the server.
    pub request_id: u8,
}

impl Envelope {
    /// Encoded size of the header.
    pub const LEN: usize = 2;

    /// Creates an envelope for a request.
    pub fn new(kind: RequestKind, request_id: u8) -> Self {
        Self { kind, request_id }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_u8(buf, self.kind as u8);
        wire::put_u8(buf, self.request_id);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        let kind = RequestKind::try_from(wire::read_u8(buf, pos)?)?;
        let request_id = wire::read_u8(buf, pos)?;
        Ok(Self { kind, request_id })
    }
}

/// Day of the week, ordinal 0 (Monday) through 6 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Day {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Day {
    /// The days a facility schedule covers, in wire order.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Canonical name of the day.
    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Day {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> ProtocolResult<Self> {
        match byte {
            0 => Ok(Day::Monday),
            1 => Ok(Day::Tuesday),
            2 => Ok(Day::Wednesday),
            3 => Ok(Day::Thursday),
            4 => Ok(Day::Friday),
            5 => Ok(Day::Saturday),
            6 => Ok(Day::Sunday),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

impl FromStr for Day {
    type Err = ProtocolError;

    /// Parses a day name, case-insensitively, ignoring surrounding
    /// whitespace.
    fn from_str(s: &str) -> ProtocolResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" => Ok(Day::Monday),
            "tuesday" => Ok(Day::Tuesday),
            "wednesday" => Ok(Day::Wednesday),
            "thursday" => Ok(Day::Thursday),
            "friday" => Ok(Day::Friday),
            "saturday" => Ok(Day::Saturday),
            "sunday" => Ok(Day::Sunday),
            _ => Err(ProtocolError::UnknownDay(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Availability query for one facility over a list of days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Facility name.
    pub name: String,
    /// Days to query, in the order slots should come back.
    pub days: Vec<Day>,
}

impl QueryRequest {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_str(buf, &self.name);
        for day in &self.days {
            wire::put_u8(buf, *day as u8);
        }
    }

    /// Decodes a query payload; the day list runs to the end of the buffer.
    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        let name = wire::read_str(buf, pos)?;
        let mut days = Vec::with_capacity(buf.len() - *pos);
        while *pos < buf.len() {
            days.push(Day::try_from(wire::read_u8(buf, pos)?)?);
        }
        Ok(Self { name, days })
    }
}

/// Reply to a [`QueryRequest`]: one 16-byte slot vector per requested day,
/// concatenated in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// Raw slot bytes, `16 * days.len()` of them.
    pub available: Vec<u8>,
}

impl QueryResponse {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.available);
    }

    /// Decodes a query reply payload; the slot bytes run to the end of the
    /// buffer.
    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        let available = buf[*pos..].to_vec();
        *pos = buf.len();
        Ok(Self { available })
    }

    /// Projects the raw slot bytes onto the requested days.
    ///
    /// Fails with [`ProtocolError::Truncated`] when the server sent fewer
    /// than `16 * days.len()` bytes; extra trailing bytes are ignored.
    pub fn day_schedules(&self, days: &[Day]) -> ProtocolResult<Vec<(Day, DaySchedule)>> {
        let expected = crate::SLOTS_PER_DAY * days.len();
        if self.available.len() < expected {
            return Err(ProtocolError::Truncated {
                expected,
                received: self.available.len(),
            });
        }
        let mut pos = 0;
        days.iter()
            .map(|&day| Ok((day, DaySchedule::decode(&self.available, &mut pos)?)))
            .collect()
    }
}

/// Booking of `num_slots` consecutive half-hour slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub facility_name: String,
    pub day: Day,
    /// First slot, 0..15.
    pub start_slot: u8,
    pub num_slots: u8,
    /// Owner id, 1..255. Zero marks a free slot and cannot own one.
    pub user_id: u8,
}

impl Booking {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_str(buf, &self.facility_name);
        wire::put_u8(buf, self.day as u8);
        wire::put_u8(buf, self.start_slot);
        wire::put_u8(buf, self.num_slots);
        wire::put_u8(buf, self.user_id);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self {
            facility_name: wire::read_str(buf, pos)?,
            day: Day::try_from(wire::read_u8(buf, pos)?)?,
            start_slot: wire::read_u8(buf, pos)?,
            num_slots: wire::read_u8(buf, pos)?,
            user_id: wire::read_u8(buf, pos)?,
        })
    }
}

/// Reply to a [`Booking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingResponse {
    /// Server-assigned id for later updates. By server convention `0`
    /// signals rejection; the client does not validate this.
    pub confirmation_id: u32,
    /// Human-readable outcome.
    pub message: String,
}

impl BookingResponse {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_u32(buf, self.confirmation_id);
        wire::put_str(buf, &self.message);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self {
            confirmation_id: wire::read_u32(buf, pos)?,
            message: wire::read_str(buf, pos)?,
        })
    }
}

/// Shifts an existing booking by `offset` half-hour slots; negative moves
/// it earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub confirmation_id: u32,
    pub offset: i8,
}

impl Update {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_u32(buf, self.confirmation_id);
        wire::put_i8(buf, self.offset);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self {
            confirmation_id: wire::read_u32(buf, pos)?,
            offset: wire::read_i8(buf, pos)?,
        })
    }
}

/// Reply to an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    /// `0` on success, nonzero on failure.
    pub status: u8,
    pub message: String,
}

impl UpdateResponse {
    /// Whether the update was applied.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_u8(buf, self.status);
        wire::put_str(buf, &self.message);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self {
            status: wire::read_u8(buf, pos)?,
            message: wire::read_str(buf, pos)?,
        })
    }
}

/// Push-subscription registration. `duration == 0` cancels the
/// subscription; the server sends no reply either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Subscription length in seconds.
    pub duration: u32,
}

impl Monitor {
    /// The cancellation sentinel.
    pub fn cancel() -> Self {
        Self { duration: 0 }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::put_u32(buf, self.duration);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self {
            duration: wire::read_u32(buf, pos)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Closed request/response enums
// ---------------------------------------------------------------------------

/// Any client-initiated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query(QueryRequest),
    Book(Booking),
    Update(Update),
    Monitor(Monitor),
}

impl Request {
    /// The tag byte this request is framed with.
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Query(_) => RequestKind::Query,
            Self::Book(_) => RequestKind::Book,
            Self::Update(_) => RequestKind::Update,
            Self::Monitor(_) => RequestKind::Monitor,
        }
    }

    /// Encodes the full datagram: `[tag][request_id][payload]`.
    pub fn encode(&self, request_id: u8) -> Vec<u8> {
        let mut buf = Vec::new();
        Envelope::new(self.kind(), request_id).encode(&mut buf);
        match self {
            Self::Query(query) => query.encode(&mut buf),
            Self::Book(booking) => booking.encode(&mut buf),
            Self::Update(update) => update.encode(&mut buf),
            Self::Monitor(monitor) => monitor.encode(&mut buf),
        }
        buf
    }

    /// Decodes a full request datagram, selecting the payload variant by
    /// the leading tag byte.
    pub fn decode(buf: &[u8]) -> ProtocolResult<(Envelope, Self)> {
        let mut pos = 0;
        let envelope = Envelope::decode(buf, &mut pos)?;
        let request = match envelope.kind {
            RequestKind::Query => Self::Query(QueryRequest::decode(buf, &mut pos)?),
            RequestKind::Book => Self::Book(Booking::decode(buf, &mut pos)?),
            RequestKind::Update => Self::Update(Update::decode(buf, &mut pos)?),
            RequestKind::Monitor => Self::Monitor(Monitor::decode(buf, &mut pos)?),
        };
        Ok((envelope, request))
    }
}

impl From<QueryRequest> for Request {
    fn from(query: QueryRequest) -> Self {
        Self::Query(query)
    }
}

impl From<Booking> for Request {
    fn from(booking: Booking) -> Self {
        Self::Book(booking)
    }
}

impl From<Update> for Request {
    fn from(update: Update) -> Self {
        Self::Update(update)
    }
}

impl From<Monitor> for Request {
    fn from(monitor: Monitor) -> Self {
        Self::Monitor(monitor)
    }
}

/// Any server reply on the request/response channel.
///
/// `Monitor` registrations have no paired response; a `Monitor` tag in a
/// response header fails with [`ProtocolError::UnexpectedKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Query(QueryResponse),
    Book(BookingResponse),
    Update(UpdateResponse),
}

impl Response {
    /// The tag byte this response is framed with.
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Query(_) => RequestKind::Query,
            Self::Book(_) => RequestKind::Book,
            Self::Update(_) => RequestKind::Update,
        }
    }

    /// Encodes the full datagram, echoing `request_id` in the header.
    pub fn encode(&self, request_id: u8) -> Vec<u8> {
        let mut buf = Vec::new();
        Envelope::new(self.kind(), request_id).encode(&mut buf);
        match self {
            Self::Query(query) => query.encode(&mut buf),
            Self::Book(booking) => booking.encode(&mut buf),
            Self::Update(update) => update.encode(&mut buf),
        }
        buf
    }

    /// Decodes a full response datagram, selecting the payload variant by
    /// the echoed tag byte.
    pub fn decode(buf: &[u8]) -> ProtocolResult<(Envelope, Self)> {
        let mut pos = 0;
        let envelope = Envelope::decode(buf, &mut pos)?;
        let response = match envelope.kind {
            RequestKind::Query => Self::Query(QueryResponse::decode(buf, &mut pos)?),
            RequestKind::Book => Self::Book(BookingResponse::decode(buf, &mut pos)?),
            RequestKind::Update => Self::Update(UpdateResponse::decode(buf, &mut pos)?),
            RequestKind::Monitor => {
                return Err(ProtocolError::UnexpectedKind(RequestKind::Monitor));
            }
        };
        Ok((envelope, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_roundtrip() {
        let mut buf = Vec::new();
        Envelope::new(RequestKind::Book, 200).encode(&mut buf);
        assert_eq!(buf, [1, 200]);

        let mut pos = 0;
        let envelope = Envelope::decode(&buf, &mut pos).unwrap();
        assert_eq!(envelope.kind, RequestKind::Book);
        assert_eq!(envelope.request_id, 200);
        assert_eq!(pos, Envelope::LEN);
    }

    #[test]
    fn unknown_kind_tag_rejected() {
        let mut pos = 0;
        assert!(matches!(
            Envelope::decode(&[9, 0], &mut pos),
            Err(ProtocolError::UnknownTag(9))
        ));
    }

    #[test]
    fn day_parses_case_insensitively() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("WEDNESDAY".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("  Sunday \n".parse::<Day>().unwrap(), Day::Sunday);
    }

    #[test]
    fn day_rejects_unknown_name() {
        assert!(matches!(
            "someday".parse::<Day>(),
            Err(ProtocolError::UnknownDay(_))
        ));
    }

    #[test]
    fn query_request_roundtrip() {
        let request = QueryRequest {
            name: "MainHall".to_string(),
            days: vec![Day::Monday, Day::Wednesday],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);

        let mut pos = 0;
        assert_eq!(QueryRequest::decode(&buf, &mut pos).unwrap(), request);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn query_request_empty_days_roundtrip() {
        let request = QueryRequest {
            name: String::new(),
            days: vec![],
        };
        let mut buf = Vec::new();
        request.encode(&mut buf);
        assert_eq!(buf, [0]);

        let mut pos = 0;
        assert_eq!(QueryRequest::decode(&buf, &mut pos).unwrap(), request);
    }

    #[test]
    fn booking_roundtrip() {
        let booking = Booking {
            facility_name: "Gym".to_string(),
            day: Day::Friday,
            start_slot: 0,
            num_slots: 3,
            user_id: 255,
        };
        let mut buf = Vec::new();
        booking.encode(&mut buf);

        let mut pos = 0;
        assert_eq!(Booking::decode(&buf, &mut pos).unwrap(), booking);
    }

    #[test]
    fn booking_response_roundtrip() {
        let response = BookingResponse {
            confirmation_id: 70_000,
            message: "Booking successful".to_string(),
        };
        let mut buf = Vec::new();
        response.encode(&mut buf);

        let mut pos = 0;
        assert_eq!(BookingResponse::decode(&buf, &mut pos).unwrap(), response);
    }

    #[test]
    fn update_wire_layout() {
        // confirmation id 42 as 4 LE bytes, then -2 as 0xFE
        let update = Update {
            confirmation_id: 42,
            offset: -2,
        };
        let mut buf = Vec::new();
        update.encode(&mut buf);
        assert_eq!(buf, [42, 0, 0, 0, 0xFE]);
    }

    #[test]
    fn update_offset_extremes_roundtrip() {
        for offset in [i8::MIN, i8::MAX] {
            let update = Update {
                confirmation_id: 1,
                offset,
            };
            let mut buf = Vec::new();
            update.encode(&mut buf);
            let mut pos = 0;
            assert_eq!(Update::decode(&buf, &mut pos).unwrap(), update);
        }
    }

    #[test]
    fn update_response_roundtrip() {
        let response = UpdateResponse {
            status: 1,
            message: "no such booking".to_string(),
        };
        let mut buf = Vec::new();
        response.encode(&mut buf);

        let mut pos = 0;
        let decoded = UpdateResponse::decode(&buf, &mut pos).unwrap();
        assert!(!decoded.is_success());
        assert_eq!(decoded, response);
    }

    #[test]
    fn monitor_zero_duration_roundtrip() {
        let mut buf = Vec::new();
        Monitor::cancel().encode(&mut buf);
        assert_eq!(buf, [0, 0, 0, 0]);

        let mut pos = 0;
        assert_eq!(
            Monitor::decode(&buf, &mut pos).unwrap(),
            Monitor { duration: 0 }
        );
    }

    #[test]
    fn request_frames_tag_and_id() {
        let request = Request::from(Monitor { duration: 30 });
        let bytes = request.encode(5);
        assert_eq!(bytes, [3, 5, 30, 0, 0, 0]);

        let (envelope, decoded) = Request::decode(&bytes).unwrap();
        assert_eq!(envelope.kind, RequestKind::Monitor);
        assert_eq!(envelope.request_id, 5);
        assert_eq!(decoded, request);
    }

    #[test]
    fn response_roundtrip_all_kinds() {
        let responses = [
            Response::Query(QueryResponse {
                available: vec![0; 16],
            }),
            Response::Book(BookingResponse {
                confirmation_id: 0,
                message: "Booking failed, slots not available".to_string(),
            }),
            Response::Update(UpdateResponse {
                status: 0,
                message: "Booking updated".to_string(),
            }),
        ];
        for response in responses {
            let bytes = response.encode(77);
            let (envelope, decoded) = Response::decode(&bytes).unwrap();
            assert_eq!(envelope.request_id, 77);
            assert_eq!(envelope.kind, response.kind());
            assert_eq!(decoded, response);
        }
    }

    #[test]
    fn monitor_tag_has_no_response_body() {
        assert!(matches!(
            Response::decode(&[3, 0]),
            Err(ProtocolError::UnexpectedKind(RequestKind::Monitor))
        ));
    }

    #[test]
    fn query_response_projects_requested_days() {
        let days = [Day::Monday, Day::Wednesday];
        let mut available = vec![0u8; 16];
        available.extend_from_slice(&[7u8; 16]);
        let response = QueryResponse { available };

        let schedules = response.day_schedules(&days).unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].0, Day::Monday);
        assert!((0..16).all(|slot| schedules[0].1.is_free(slot)));
        assert_eq!(schedules[1].0, Day::Wednesday);
        assert!((0..16).all(|slot| !schedules[1].1.is_free(slot)));
    }

    #[test]
    fn query_response_too_short_for_days() {
        let response = QueryResponse {
            available: vec![0; 20],
        };
        assert!(matches!(
            response.day_schedules(&[Day::Monday, Day::Tuesday]),
            Err(ProtocolError::Truncated {
                expected: 32,
                received: 20,
            })
        ));
    }

    #[test]
    fn query_response_ignores_trailing_bytes() {
        let response = QueryResponse {
            available: vec![0; 40],
        };
        let schedules = response.day_schedules(&[Day::Monday, Day::Tuesday]).unwrap();
        assert_eq!(schedules.len(), 2);
    }
}
