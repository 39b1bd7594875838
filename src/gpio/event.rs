use crate::gpio::uapi;

/// Edge direction of a line event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Rising,
    Falling,
}

/// One edge event read from a line request.
///
/// Timestamps are kernel monotonic-clock nanoseconds; events are consumed
/// once and not persisted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    kind: EdgeKind,
    timestamp_ns: u64,
    offset: u32,
    seqno: u32,
}

impl LineEvent {
    pub(crate) fn from_v2(event: uapi::gpio_line_event) -> std::io::Result<Self> {
        let kind = if event.id == uapi::LineEventId::RISING_EDGE {
            EdgeKind::Rising
        } else if event.id == uapi::LineEventId::FALLING_EDGE {
            EdgeKind::Falling
        } else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid gpio line event ID: 0x{:X}", event.id.bits()),
            ));
        };

        Ok(Self {
            kind,
            timestamp_ns: event.timestamp_ns,
            offset: event.offset,
            seqno: event.seqno,
        })
    }

    pub const fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Kernel timestamp in nanoseconds (monotonic clock).
    pub const fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// Offset of the line that produced the event.
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Kernel sequence number of the event within the request.
    pub const fn seqno(&self) -> u32 {
        self.seqno
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_event(id: uapi::LineEventId) -> uapi::gpio_line_event {
        let mut ev = uapi::gpio_line_event::zeroed();
        ev.id = id;
        ev.timestamp_ns = 1_000_000_123;
        ev.offset = 203;
        ev.seqno = 7;
        ev
    }

    #[test]
    fn converts_rising_and_falling_events() {
        let ev = LineEvent::from_v2(raw_event(uapi::LineEventId::RISING_EDGE)).unwrap();
        assert_eq!(ev.kind(), EdgeKind::Rising);
        assert_eq!(ev.timestamp_ns(), 1_000_000_123);
        assert_eq!(ev.offset(), 203);
        assert_eq!(ev.seqno(), 7);

        let ev = LineEvent::from_v2(raw_event(uapi::LineEventId::FALLING_EDGE)).unwrap();
        assert_eq!(ev.kind(), EdgeKind::Falling);
    }

    #[test]
    fn rejects_unknown_event_ids() {
        let raw = raw_event(uapi::LineEventId::from_bits_retain(0x40));
        assert!(LineEvent::from_v2(raw).is_err());
    }
}
