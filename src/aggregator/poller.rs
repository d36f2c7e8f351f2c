//! Poll scheduling state
//!
//! The tokio interval lives in the dashboard loop; this type holds the
//! decisions around it: pause gating and request sequencing. Every outgoing
//! fetch gets a monotonically increasing sequence number, and a response is
//! applied only if its sequence is greater than the last applied one, so a
//! slow older fetch can never overwrite newer data.

/// Pause and sequencing state for the poll loop
#[derive(Debug, Clone, Default)]
pub struct PollScheduler {
    paused: bool,
    next_seq: u64,
    last_applied: u64,
}

impl PollScheduler {
    pub fn new(paused: bool) -> Self {
        Self {
            paused,
            next_seq: 0,
            last_applied: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Gate ticks; returns true when the flag changed. Pausing does not
    /// affect in-flight requests, whose results still apply on arrival.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    /// Whether a tick should issue a fetch
    pub fn should_fetch(&self) -> bool {
        !self.paused
    }

    /// Number the next outgoing request
    pub fn begin_request(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Whether a response with this sequence may still be applied
    pub fn should_apply(&self, seq: u64) -> bool {
        seq > self.last_applied
    }

    pub fn mark_applied(&mut self, seq: u64) {
        debug_assert!(seq > self.last_applied);
        self.last_applied = seq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_increase() {
        let mut scheduler = PollScheduler::new(false);
        let a = scheduler.begin_request();
        let b = scheduler.begin_request();
        assert!(b > a);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut scheduler = PollScheduler::new(false);
        let old = scheduler.begin_request();
        let new = scheduler.begin_request();

        // newer response lands first
        assert!(scheduler.should_apply(new));
        scheduler.mark_applied(new);

        // older one arrives late and must be dropped
        assert!(!scheduler.should_apply(old));
    }

    #[test]
    fn test_pause_gates_fetching() {
        let mut scheduler = PollScheduler::new(false);
        assert!(scheduler.should_fetch());

        assert!(scheduler.set_paused(true));
        assert!(!scheduler.should_fetch());

        // no change, no transition
        assert!(!scheduler.set_paused(true));

        assert!(scheduler.set_paused(false));
        assert!(scheduler.should_fetch());
    }

    #[test]
    fn test_in_flight_result_applies_while_paused() {
        let mut scheduler = PollScheduler::new(false);
        let seq = scheduler.begin_request();
        scheduler.set_paused(true);

        assert!(scheduler.should_apply(seq));
        scheduler.mark_applied(seq);
        assert!(!scheduler.should_apply(seq));
    }
}
