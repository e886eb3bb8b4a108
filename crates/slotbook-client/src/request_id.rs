//! Request id generation.

/// Wrapping 8-bit sequence of correlation ids.
///
/// Starts at the `0xFF` sentinel so the first id issued is `0`, and wraps
/// mod 256. The channel issues requests serially, one outstanding at a
/// time, so a wrapped id can never collide with one still awaiting its
/// reply.
#[derive(Debug)]
pub struct RequestIdSequence {
    last: u8,
}

impl RequestIdSequence {
    /// Creates a sequence at the sentinel start.
    pub fn new() -> Self {
        Self { last: u8::MAX }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> u8 {
        self.last = self.last.wrapping_add(1);
        self.last
    }
}

impl Default for RequestIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_zero() {
        let mut ids = RequestIdSequence::new();
        let issued: Vec<u8> = (0..256).map(|_| ids.next_id()).collect();
        let expected: Vec<u8> = (0..=255).collect();
        assert_eq!(issued, expected);
    }

    #[test]
    fn wraps_after_255() {
        let mut ids = RequestIdSequence::new();
        for _ in 0..256 {
            ids.next_id();
        }
        assert_eq!(ids.next_id(), 0);
    }
}
