//! EEPROM write-completion tracking.
//!
//! After a write to an EEPROM backed register the TMP117 needs a few milliseconds
//! before its busy flag becomes meaningful, and then stays busy until programming
//! finishes. The chip also reports busy while loading the EEPROM after power-up or a
//! soft reset. [`EepromTracker`] follows that sequence without blocking: the caller
//! ticks it with a wrapping millisecond counter until it reports idle.

use crate::{fmt::trace, registers::Configuration};

/// Minimum time in milliseconds between an EEPROM write and the first busy poll.
pub const EEPROM_WRITE_DELAY_MS: u16 = 7;

/// Progress of an EEPROM write.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WriteState {
    /// No write pending, register contents are committed.
    Idle = 0,
    /// Power-up or reset, status unknown until the busy flag is read.
    Start = 1,
    /// A write was just issued.
    WriteIssued = 2,
    /// Waiting out [`EEPROM_WRITE_DELAY_MS`].
    WaitingSettle = 3,
    /// Settled, waiting for the busy flag to clear.
    PollingBusy = 4,
}

impl WriteState {
    /// Returns true if the next transition depends on the busy flag.
    #[must_use]
    pub const fn polls_busy(self) -> bool {
        matches!(self, Self::Start | Self::PollingBusy)
    }

    /// Single step of the state machine.
    ///
    /// `written_at` is the millisecond timestamp of the last write, `busy` the EEPROM
    /// busy flag and `now` the current millisecond counter. `busy` is only looked at
    /// in states where [`WriteState::polls_busy`] is true.
    #[must_use]
    pub const fn next(self, written_at: u16, busy: bool, now: u16) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::WriteIssued => Self::WaitingSettle,
            Self::WaitingSettle => {
                // The counter wraps, only the unsigned difference is meaningful
                if now.wrapping_sub(written_at) > EEPROM_WRITE_DELAY_MS {
                    Self::PollingBusy
                } else {
                    Self::WaitingSettle
                }
            }
            Self::Start | Self::PollingBusy if busy => self,
            Self::Start | Self::PollingBusy => Self::Idle,
        }
    }
}

impl From<u8> for WriteState {
    /// Decodes a state tag, unknown tags resolve to [`WriteState::Idle`].
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Start,
            2 => Self::WriteIssued,
            3 => Self::WaitingSettle,
            4 => Self::PollingBusy,
            _ => Self::Idle,
        }
    }
}

/// Tracks completion of the last EEPROM write.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromTracker {
    state: WriteState,
    written_at: u16,
}

impl Default for EepromTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EepromTracker {
    /// Creates a tracker in [`WriteState::Start`], as after power-up.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: WriteState::Start,
            written_at: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> WriteState {
        self.state
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, WriteState::Idle)
    }

    /// Arms the tracker for a write issued at `now`.
    ///
    /// Any write still in progress is forgotten.
    pub fn on_write_issued(&mut self, now: u16) {
        trace!("eeprom write issued at {=u16}ms", now);
        self.state = WriteState::WriteIssued;
        self.written_at = now;
    }

    /// Puts the tracker back into [`WriteState::Start`], e.g. after a soft reset.
    pub fn restart(&mut self) {
        self.state = WriteState::Start;
    }

    /// Advances the tracker, returns true if idle.
    ///
    /// `read_status` returns the configuration register and is called at most once.
    pub fn tick(&mut self, now: u16, read_status: impl FnOnce() -> u16) -> bool {
        match self.try_tick(now, || Ok::<_, core::convert::Infallible>(read_status())) {
            Ok(idle) => idle,
            Err(e) => match e {},
        }
    }

    /// Advances the tracker with a fallible register read, returns true if idle.
    ///
    /// Clock driven transitions are applied until the state settles. The
    /// configuration register is read at most once, and only in states that wait on
    /// the busy flag. A failed read leaves the tracker where it was before the read.
    ///
    /// # Errors
    ///
    /// Returns the error of `read_status`.
    pub fn try_tick<E>(
        &mut self,
        now: u16,
        read_status: impl FnOnce() -> Result<u16, E>,
    ) -> Result<bool, E> {
        let mut read_status = Some(read_status);

        loop {
            let busy = if self.state.polls_busy() {
                match read_status.take() {
                    Some(read) => Configuration(read()?).eeprom_busy(),
                    None => break,
                }
            } else {
                false
            };

            let next = self.state.next(self.written_at, busy, now);
            if next == self.state {
                break;
            }

            trace!("eeprom {} -> {}", self.state, next);
            self.state = next;
        }

        Ok(self.is_idle())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    const BUSY: u16 = Configuration::EEPROM_BUSY;
    const NOT_BUSY: u16 = 0x0220;

    #[test]
    fn transitions() {
        use WriteState::*;

        assert_eq!(Idle.next(0, true, 100), Idle);
        assert_eq!(WriteIssued.next(0, true, 0), WaitingSettle);
        assert_eq!(WaitingSettle.next(100, false, 107), WaitingSettle);
        assert_eq!(WaitingSettle.next(100, true, 108), PollingBusy);
        assert_eq!(PollingBusy.next(100, true, 200), PollingBusy);
        assert_eq!(PollingBusy.next(100, false, 200), Idle);
        assert_eq!(Start.next(0, true, 0), Start);
        assert_eq!(Start.next(0, false, 0), Idle);
    }

    #[test]
    fn settle_ignores_busy_flag() {
        assert_eq!(
            WriteState::WaitingSettle.next(0, false, EEPROM_WRITE_DELAY_MS),
            WriteState::WaitingSettle
        );
    }

    #[test]
    fn elapsed_time_wraps() {
        // 5 - 65530 == 11 (mod 2^16)
        assert_eq!(
            WriteState::WaitingSettle.next(65530, false, 5),
            WriteState::PollingBusy
        );
        // 0 - 65530 == 6
        assert_eq!(
            WriteState::WaitingSettle.next(65530, false, 0),
            WriteState::WaitingSettle
        );
    }

    #[test]
    fn unknown_tags_are_idle() {
        assert_eq!(WriteState::from(4), WriteState::PollingBusy);
        assert_eq!(WriteState::from(5), WriteState::Idle);
        assert_eq!(WriteState::from(0xFF), WriteState::Idle);
    }

    #[test]
    fn start_resolves_once_busy_clears() {
        const N: usize = 3;

        let mut tracker = EepromTracker::new();
        let reads = Cell::new(0);

        for tick in 0..=N {
            let before = reads.get();
            let idle = tracker.tick(tick as u16, || {
                reads.set(reads.get() + 1);
                if reads.get() <= N { BUSY } else { NOT_BUSY }
            });
            assert_eq!(reads.get(), before + 1);
            assert_eq!(idle, tick == N, "tick {tick}");
        }

        // Idle doesn't touch the bus any more
        assert!(tracker.tick(100, || unreachable!()));
    }

    #[test]
    fn write_waits_for_settle_delay() {
        let t0 = 1000;
        let mut tracker = EepromTracker::new();
        tracker.on_write_issued(t0);

        // Still settling, the register is not consulted even though it reads idle
        assert!(!tracker.tick(t0 + EEPROM_WRITE_DELAY_MS - 1, || unreachable!()));
        assert_eq!(tracker.state(), WriteState::WaitingSettle);
        assert!(!tracker.tick(t0 + EEPROM_WRITE_DELAY_MS, || unreachable!()));

        let reads = Cell::new(0);
        let idle = tracker.tick(t0 + EEPROM_WRITE_DELAY_MS + 1, || {
            reads.set(reads.get() + 1);
            BUSY
        });
        assert!(!idle);
        assert_eq!(reads.get(), 1);
        assert_eq!(tracker.state(), WriteState::PollingBusy);

        assert!(tracker.tick(t0 + 20, || NOT_BUSY));
        assert_eq!(tracker.state(), WriteState::Idle);
    }

    #[test]
    fn write_across_counter_wrap() {
        let mut tracker = EepromTracker::new();
        tracker.on_write_issued(65530);
        assert!(!tracker.tick(65534, || unreachable!()));
        assert!(tracker.tick(5, || NOT_BUSY));
    }

    #[test]
    fn new_write_restarts_tracking() {
        let mut tracker = EepromTracker::new();
        tracker.on_write_issued(0);
        assert!(!tracker.tick(10, || BUSY));
        assert_eq!(tracker.state(), WriteState::PollingBusy);

        tracker.on_write_issued(20);
        assert_eq!(tracker.state(), WriteState::WriteIssued);
        assert!(!tracker.tick(21, || unreachable!()));
        assert_eq!(tracker.state(), WriteState::WaitingSettle);
    }

    #[test]
    fn failed_read_keeps_state() {
        let mut tracker = EepromTracker::new();
        tracker.on_write_issued(0);
        assert_eq!(tracker.try_tick(50, || Err(())), Err(()));
        assert_eq!(tracker.state(), WriteState::PollingBusy);
        assert_eq!(tracker.try_tick(51, || Ok::<_, ()>(NOT_BUSY)), Ok(true));
    }
}
