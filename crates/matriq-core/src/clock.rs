//! Per-question countdown clock.
//!
//! Counts down once per second while a question is active, yields
//! [`Tick::Expired`] exactly once when the budget runs out, then holds until
//! [`SessionClock::reset`] re-arms it for the next question.

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// One second of countdown progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds left on the current question.
    Remaining(u32),
    /// The budget elapsed. Fired at most once per question; the caller
    /// should route this into `TestSession::on_timeout`.
    Expired,
}

/// Countdown timer for the active question.
pub struct SessionClock {
    budget_secs: u32,
    remaining_secs: u32,
    ticker: Interval,
}

impl SessionClock {
    /// Create a clock armed with the full per-question budget.
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
            ticker: one_second_ticker(),
        }
    }

    /// Seconds left on the current question.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// The configured per-question budget.
    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    /// Re-arm to the full budget. Call exactly once per question transition.
    pub fn reset(&mut self) {
        self.remaining_secs = self.budget_secs;
        self.ticker = one_second_ticker();
    }

    /// Wait for the next second of countdown.
    ///
    /// After [`Tick::Expired`] has been returned once, this future never
    /// resolves again until `reset` is called, so a stale select arm cannot
    /// double-fire a timeout.
    pub async fn tick(&mut self) -> Tick {
        if self.remaining_secs == 0 {
            std::future::pending::<()>().await;
            unreachable!("pending future resolved");
        }
        self.ticker.tick().await;
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining_secs)
        }
    }
}

fn one_second_ticker() -> Interval {
    let mut ticker = interval_at(
        Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn counts_down_to_a_single_expiry() {
        let mut clock = SessionClock::new(3);
        assert_eq!(clock.remaining_secs(), 3);

        assert_eq!(clock.tick().await, Tick::Remaining(2));
        assert_eq!(clock.tick().await, Tick::Remaining(1));
        assert_eq!(clock.tick().await, Tick::Expired);
        assert_eq!(clock.remaining_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn holds_after_expiry_until_reset() {
        let mut clock = SessionClock::new(1);
        assert_eq!(clock.tick().await, Tick::Expired);

        // No second expiry, no matter how much time passes.
        advance(Duration::from_secs(60)).await;
        let held = timeout(Duration::from_secs(5), clock.tick()).await;
        assert!(held.is_err(), "expired clock must hold until reset");

        clock.reset();
        assert_eq!(clock.remaining_secs(), 1);
        assert_eq!(clock.tick().await, Tick::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_full_budget_mid_question() {
        let mut clock = SessionClock::new(5);
        assert_eq!(clock.tick().await, Tick::Remaining(4));
        assert_eq!(clock.tick().await, Tick::Remaining(3));

        clock.reset();
        assert_eq!(clock.remaining_secs(), 5);
        assert_eq!(clock.tick().await, Tick::Remaining(4));
    }
}
