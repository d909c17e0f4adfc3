use near_sdk::{near, Timestamp};

/// Absolute point in time (nanoseconds since the Unix epoch, same unit as
/// `env::block_timestamp`) splitting a swap's life into a claim window and a
/// refund window.
///
/// ```text
///   ... claim ... | deadline ... refund ...
/// ```
///
/// The boundary instant itself belongs to the refund window, so for any `now`
/// exactly one of `claim_window_open` / `refund_window_open` is true.
#[near(serializers = [json, borsh])]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(pub Timestamp);

impl Deadline {
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }

    pub fn as_nanos(&self) -> Timestamp {
        self.0
    }

    /// A deadline is acceptable at initiation only if it lies strictly after `now`.
    pub fn is_future(&self, now: Timestamp) -> bool {
        self.0 > now
    }

    pub fn claim_window_open(&self, now: Timestamp) -> bool {
        now < self.0
    }

    pub fn refund_window_open(&self, now: Timestamp) -> bool {
        now >= self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NANOS_IN_SEC: u64 = 1_000_000_000;

    #[test]
    fn windows_partition_time() {
        let deadline = Deadline::new(60 * NANOS_IN_SEC);
        for now in [0, 59 * NANOS_IN_SEC, 60 * NANOS_IN_SEC - 1, 60 * NANOS_IN_SEC, u64::MAX] {
            assert_ne!(
                deadline.claim_window_open(now),
                deadline.refund_window_open(now),
                "exactly one window must be open at {now}"
            );
        }
    }

    #[test]
    fn boundary_belongs_to_refund() {
        let deadline = Deadline::new(1_000);
        assert!(deadline.claim_window_open(999));
        assert!(!deadline.claim_window_open(1_000));
        assert!(deadline.refund_window_open(1_000));
        assert!(!deadline.refund_window_open(999));
    }

    #[test]
    fn future_is_strict() {
        let deadline = Deadline::new(1_000);
        assert!(deadline.is_future(999));
        assert!(!deadline.is_future(1_000));
        assert!(!deadline.is_future(1_001));
        assert!(!Deadline::new(0).is_future(0));
    }
}
