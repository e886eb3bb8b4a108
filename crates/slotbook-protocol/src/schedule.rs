//! Decoded schedule data and its text rendering.
//!
//! Slot index `i` maps to the clock time `08:00 + 30 * i` minutes; a slot
//! value of `0` means free and any nonzero value is the id of the booking
//! owner.

use std::fmt;

use crate::error::ProtocolResult;
use crate::types::Day;
use crate::{SLOTS_PER_DAY, wire};

/// One day's availability, one byte per half-hour slot from 08:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule(pub [u8; SLOTS_PER_DAY]);

impl DaySchedule {
    /// Clock time of slot `i`, as `(hour, minute)`.
    fn slot_time(slot: usize) -> (usize, usize) {
        (8 + slot / 2, if slot % 2 == 0 { 0 } else { 30 })
    }

    /// Whether slot `slot` is unbooked.
    pub fn is_free(&self, slot: usize) -> bool {
        self.0[slot] == 0
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }

    pub fn decode(buf: &[u8], pos: &mut usize) -> ProtocolResult<Self> {
        Ok(Self(wire::read_slots(buf, pos)?))
    }
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, &owner) in self.0.iter().enumerate() {
            let (hour, minute) = Self::slot_time(slot);
            if owner == 0 {
                writeln!(f, "{hour:02}:{minute:02} - Available")?;
            } else {
                writeln!(f, "{hour:02}:{minute:02} - Booked by {owner}")?;
            }
        }
        Ok(())
    }
}

/// Full weekly schedule for one facility, Monday through Friday.
///
/// The server pushes a complete record, headerless, to every subscribed
/// client whenever the facility's schedule changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityRecord {
    /// Facility name.
    pub name: String,
    /// Per-day slot vectors, in [`Day::WEEKDAYS`] order.
    pub schedule: [DaySchedule; Day::WEEKDAYS.len()],
}

impl FacilityRecord {
    /// Looks up the schedule for `day`; `None` for weekend days, which the
    /// wire format does not carry.
    pub fn day(&self, day: Day) -> Option<&DaySchedule> {
        Day::WEEKDAYS
            .iter()
            .position(|&d| d == day)
            .map(|index| &self.schedule[index])
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::put_str(&mut buf, &self.name);
        for day in &self.schedule {
            day.encode(&mut buf);
        }
        buf
    }

    /// Decodes a pushed record: name string, then five 16-byte slot
    /// vectors in weekday order. There is no envelope on this channel.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        let mut pos = 0;
        let name = wire::read_str(buf, &mut pos)?;
        let mut schedule = [DaySchedule([0; SLOTS_PER_DAY]); Day::WEEKDAYS.len()];
        for day in &mut schedule {
            *day = DaySchedule::decode(buf, &mut pos)?;
        }
        Ok(Self { name, schedule })
    }
}

impl fmt::Display for FacilityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Facility update: {} ---", self.name)?;
        for (day, slots) in Day::WEEKDAYS.iter().zip(&self.schedule) {
            writeln!(f, "\n{day}:")?;
            write!(f, "{slots}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    fn sample_record() -> FacilityRecord {
        let mut tuesday = [0u8; SLOTS_PER_DAY];
        tuesday[3] = 9;
        let mut schedule = [DaySchedule([0; SLOTS_PER_DAY]); 5];
        schedule[1] = DaySchedule(tuesday);
        FacilityRecord {
            name: "MainHall".to_string(),
            schedule,
        }
    }

    #[test]
    fn day_schedule_renders_slot_times() {
        let mut slots = [0u8; SLOTS_PER_DAY];
        slots[0] = 7;
        slots[15] = 3;
        let rendered = DaySchedule(slots).to_string();

        assert!(rendered.starts_with("08:00 - Booked by 7\n"));
        assert!(rendered.contains("08:30 - Available"));
        assert!(rendered.ends_with("15:30 - Booked by 3\n"));
        assert_eq!(rendered.lines().count(), SLOTS_PER_DAY);
    }

    #[test]
    fn facility_record_roundtrip() {
        let record = sample_record();
        let bytes = record.encode();
        assert_eq!(bytes.len(), "MainHall".len() + 1 + 5 * SLOTS_PER_DAY);
        assert_eq!(FacilityRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn facility_record_truncated_schedule() {
        let record = sample_record();
        let bytes = record.encode();
        assert!(matches!(
            FacilityRecord::decode(&bytes[..bytes.len() - 4]),
            Err(ProtocolError::Truncated { .. })
        ));
    }

    #[test]
    fn facility_record_day_lookup() {
        let record = sample_record();
        assert!(record.day(Day::Tuesday).is_some());
        assert!(!record.day(Day::Tuesday).unwrap().is_free(3));
        assert!(record.day(Day::Saturday).is_none());
    }

    #[test]
    fn facility_record_render_names_days() {
        let rendered = sample_record().to_string();
        assert!(rendered.contains("MainHall"));
        for day in Day::WEEKDAYS {
            assert!(rendered.contains(day.name()));
        }
        assert!(rendered.contains("09:30 - Booked by 9"));
    }
}
