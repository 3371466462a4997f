//! Cooldown gate and updater
//!
//! Each command owns one [`CommandState`]. The gate is a pure function of the
//! state and the current time; the updater is the only writer.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::RwLock;

/// Gate verdict for one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    /// The command must not run yet
    pub on_cooldown: bool,
    /// Time left until the gate opens, zero when open
    pub remaining: Duration,
}

impl CooldownStatus {
    /// Remaining time in fractional seconds.
    #[must_use]
    pub fn remaining_secs(&self) -> f64 {
        self.remaining.as_secs_f64()
    }
}

/// Computes the gate verdict.
///
/// A command that never completed (`last_completion == None`) is always open.
/// A clock that went backwards counts as zero elapsed time.
#[must_use]
pub fn check_cooldown(
    period: Duration,
    last_completion: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> CooldownStatus {
    let Some(last) = last_completion else {
        return CooldownStatus {
            on_cooldown: false,
            remaining: Duration::ZERO,
        };
    };

    let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
    CooldownStatus {
        on_cooldown: elapsed < period,
        remaining: period.saturating_sub(elapsed),
    }
}

/// Cooldown state of a single command
#[derive(Debug)]
pub struct CommandState {
    cooldown_period: Duration,
    last_completion: RwLock<Option<DateTime<Utc>>>,
}

impl CommandState {
    /// Creates a state that has never completed.
    #[must_use]
    pub const fn new(cooldown_period: Duration) -> Self {
        Self {
            cooldown_period,
            last_completion: RwLock::const_new(None),
        }
    }

    /// Time of the last recorded completion, `None` if the command never ran.
    pub async fn last_completion(&self) -> Option<DateTime<Utc>> {
        *self.last_completion.read().await
    }

    /// Checks the gate at `now`. Has no side effects.
    pub async fn check(&self, now: DateTime<Utc>) -> CooldownStatus {
        check_cooldown(self.cooldown_period, self.last_completion().await, now)
    }

    /// Records a terminal completion at `now`.
    ///
    /// The timestamp never moves backwards; concurrent invocations resolve
    /// to the latest completion time.
    pub async fn record_completion(&self, now: DateTime<Utc>) {
        let mut last = self.last_completion.write().await;
        *last = Some(last.map_or(now, |prev| prev.max(now)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_never_called_is_open() {
        let status = check_cooldown(Duration::from_secs(60), None, at(0));
        assert!(!status.on_cooldown);
        assert_eq!(status.remaining, Duration::ZERO);
    }

    #[test]
    fn test_within_period_is_closed() {
        let status = check_cooldown(Duration::from_secs(60), Some(at(100)), at(115));
        assert!(status.on_cooldown);
        assert_eq!(status.remaining, Duration::from_secs(45));
    }

    #[test]
    fn test_exactly_at_period_is_open() {
        let status = check_cooldown(Duration::from_secs(60), Some(at(100)), at(160));
        assert!(!status.on_cooldown);
        assert_eq!(status.remaining, Duration::ZERO);
    }

    #[test]
    fn test_clock_skew_keeps_full_period() {
        let status = check_cooldown(Duration::from_secs(60), Some(at(100)), at(90));
        assert!(status.on_cooldown);
        assert_eq!(status.remaining, Duration::from_secs(60));
    }

    #[test]
    fn test_zero_period_never_blocks() {
        let status = check_cooldown(Duration::ZERO, Some(at(100)), at(100));
        assert!(!status.on_cooldown);
    }

    #[tokio::test]
    async fn test_record_completion_closes_gate() {
        let state = CommandState::new(Duration::from_secs(60));
        assert!(!state.check(at(0)).await.on_cooldown);

        state.record_completion(at(10)).await;
        assert_eq!(state.last_completion().await, Some(at(10)));
        assert!(state.check(at(30)).await.on_cooldown);
        assert!(!state.check(at(70)).await.on_cooldown);
    }

    #[tokio::test]
    async fn test_record_completion_is_monotonic() {
        let state = CommandState::new(Duration::from_secs(60));
        state.record_completion(at(50)).await;
        state.record_completion(at(20)).await;
        assert_eq!(state.last_completion().await, Some(at(50)));
    }

    proptest! {
        #[test]
        fn prop_remaining_monotonic_and_clamped(
            period in 0u64..3600,
            last in 0i64..1_000_000,
            first in -100i64..10_000,
            step in 0i64..10_000,
        ) {
            let period = Duration::from_secs(period);
            let earlier = check_cooldown(period, Some(at(last)), at(last + first));
            let later = check_cooldown(period, Some(at(last)), at(last + first + step));

            prop_assert!(later.remaining <= earlier.remaining);
            prop_assert!(earlier.remaining <= period);
            prop_assert_eq!(later.on_cooldown, later.remaining > Duration::ZERO);
        }
    }
}
