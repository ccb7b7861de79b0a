//! Guild attack retry campaign.
//!
//! `/guild attack` is fire-and-forget: the server gives no confirmation and
//! the first attempt is often dropped while the territory is still flipping
//! out of cooldown. A campaign keeps re-sending it on a tight schedule until
//! the success window has elapsed or the attempt cap is reached.

use chrono::TimeDelta;
use tracing::{debug, info, warn};

use crate::common::types::same_territory;
use crate::common::{Announcement, EngineEffect, Instant, PendingRetry};

/// Attempts allowed per campaign before giving up.
pub const MAX_RETRY_ATTEMPTS: u32 = 20;

/// A campaign older than this is assumed to have succeeded.
pub const CAMPAIGN_SUCCESS_WINDOW_MILLIS: i64 = 5_000;

/// Delay between attempts once a campaign is underway.
pub const FOLLOW_UP_DELAY_MILLIS: i64 = 300;

/// Delay before the next attempt given the seconds left on the timer.
///
/// Attempts are spread out while the timer is far from zero and bunched up
/// as it gets close.
pub fn retry_delay(seconds_remaining: i64) -> TimeDelta {
    let millis = match seconds_remaining {
        s if s >= 3 => s * 1000 - 500,
        2 => 1000,
        1 => 100,
        _ => 50,
    };
    TimeDelta::milliseconds(millis)
}

/// Holder of the single in-flight campaign.
#[derive(Debug, Default)]
pub struct RetryCampaign {
    pending: Option<PendingRetry>,
}

impl RetryCampaign {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<&PendingRetry> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Schedule the next attempt for `territory`.
    ///
    /// A campaign for another territory is only replaced once its success
    /// window has elapsed; until then the request is ignored. Returns the
    /// exhaustion announcement when the attempt cap is exceeded.
    pub fn schedule(
        &mut self,
        seconds_remaining: i64,
        territory: &str,
        now: Instant,
    ) -> Option<Announcement> {
        self.schedule_with_delay(retry_delay(seconds_remaining), territory, now)
    }

    /// Process the campaign on a tick.
    ///
    /// When the attempt is due, the attack is only sent if the player is
    /// standing in the campaign's territory. Either way the campaign is
    /// rescheduled until it settles.
    pub fn poll(&mut self, now: Instant, current_territory: Option<&str>) -> Vec<EngineEffect> {
        let Some(pending) = &self.pending else {
            return Vec::new();
        };
        if now < pending.due_at {
            return Vec::new();
        }

        let territory = pending.territory_name.clone();
        if now - pending.schedule_started_at >= success_window() {
            info!(
                "Guild attack campaign for {} settled after {} attempts, assuming success",
                territory, pending.attempt_count
            );
            self.pending = None;
            return Vec::new();
        }

        let mut effects = Vec::new();
        let in_territory =
            current_territory.is_some_and(|current| same_territory(current, &territory));
        if in_territory {
            debug!("Sending guild attack for {} (attempt {})", territory, pending.attempt_count);
            effects.push(EngineEffect::SendGuildAttack {
                territory: territory.clone(),
            });
        } else {
            debug!(
                "Skipping guild attack for {}: player is in {:?}",
                territory, current_territory
            );
        }

        let follow_up = TimeDelta::milliseconds(FOLLOW_UP_DELAY_MILLIS);
        if let Some(announcement) = self.schedule_with_delay(follow_up, &territory, now) {
            effects.push(EngineEffect::Announce(announcement));
        }
        effects
    }

    fn schedule_with_delay(
        &mut self,
        delay: TimeDelta,
        territory: &str,
        now: Instant,
    ) -> Option<Announcement> {
        let resume = match &self.pending {
            Some(pending) if same_territory(&pending.territory_name, territory) => true,
            Some(pending) if now - pending.schedule_started_at < success_window() => {
                debug!(
                    "Ignoring guild attack retry for {}: campaign for {} still running",
                    territory, pending.territory_name
                );
                return None;
            }
            _ => false,
        };

        if !resume {
            self.pending = Some(PendingRetry {
                territory_name: territory.to_string(),
                due_at: now,
                attempt_count: 0,
                schedule_started_at: now,
            });
        }

        let pending = self.pending.as_mut()?;
        pending.attempt_count += 1;
        if pending.attempt_count > MAX_RETRY_ATTEMPTS {
            warn!(
                "Giving up on guild attack for {} after {} attempts",
                territory, MAX_RETRY_ATTEMPTS
            );
            self.pending = None;
            return Some(Announcement::RetryExhausted {
                territory: territory.to_string(),
                attempts: MAX_RETRY_ATTEMPTS,
            });
        }

        pending.due_at = now + delay;
        None
    }
}

fn success_window() -> TimeDelta {
    TimeDelta::milliseconds(CAMPAIGN_SUCCESS_WINDOW_MILLIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::{Clock, ManualClock};

    #[test]
    fn test_retry_delay_table() {
        assert_eq!(retry_delay(10), TimeDelta::milliseconds(9_500));
        assert_eq!(retry_delay(3), TimeDelta::milliseconds(2_500));
        assert_eq!(retry_delay(2), TimeDelta::milliseconds(1_000));
        assert_eq!(retry_delay(1), TimeDelta::milliseconds(100));
        assert_eq!(retry_delay(0), TimeDelta::milliseconds(50));
        assert_eq!(retry_delay(-4), TimeDelta::milliseconds(50));
    }

    #[test]
    fn test_one_second_remaining_fires_after_100ms() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        campaign.schedule(1, "Detlas", clock.now());

        clock.advance_millis(99);
        assert!(campaign.poll(clock.now(), Some("Detlas")).is_empty());

        clock.advance_millis(1);
        assert_eq!(
            campaign.poll(clock.now(), Some("Detlas")),
            vec![EngineEffect::SendGuildAttack {
                territory: "Detlas".to_string()
            }]
        );
    }

    #[test]
    fn test_attack_requires_matching_territory() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        campaign.schedule(0, "Detlas", clock.now());

        clock.advance_millis(50);
        assert!(campaign.poll(clock.now(), Some("Almuj")).is_empty());
        assert!(campaign.poll(clock.now(), None).is_empty());
        // Still rescheduled for another try
        assert_eq!(campaign.pending().map(|p| p.attempt_count), Some(2));

        clock.advance_millis(FOLLOW_UP_DELAY_MILLIS);
        assert_eq!(campaign.poll(clock.now(), Some("detlas")).len(), 1);
    }

    #[test]
    fn test_assumes_success_after_window() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        campaign.schedule(0, "Detlas", clock.now());

        let mut sent = 0;
        for _ in 0..120 {
            clock.advance_millis(50);
            sent += campaign
                .poll(clock.now(), Some("Detlas"))
                .iter()
                .filter(|e| matches!(e, EngineEffect::SendGuildAttack { .. }))
                .count();
        }
        assert!(campaign.pending().is_none());
        assert!(sent > 1);
        assert!(sent <= MAX_RETRY_ATTEMPTS as usize);
    }

    #[test]
    fn test_same_territory_keeps_counter() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        campaign.schedule(5, "Detlas", clock.now());
        clock.advance_millis(100);
        campaign.schedule(4, "Detlas", clock.now());

        let pending = campaign.pending().cloned().unwrap();
        assert_eq!(pending.attempt_count, 2);
        assert_eq!(pending.due_at, clock.now() + TimeDelta::milliseconds(3_500));
    }

    #[test]
    fn test_name_case_keeps_counter() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        campaign.schedule(5, "Detlas", clock.now());
        clock.advance_millis(100);
        campaign.schedule(4, "detlas", clock.now());

        let pending = campaign.pending().cloned().unwrap();
        assert_eq!(pending.territory_name, "Detlas");
        assert_eq!(pending.attempt_count, 2);
    }

    #[test]
    fn test_other_territory_waits_for_window() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        let started = clock.now();
        campaign.schedule(0, "Detlas", started);

        clock.advance_secs(1);
        campaign.schedule(0, "Almuj", clock.now());
        assert_eq!(campaign.pending().map(|p| p.territory_name.as_str()), Some("Detlas"));

        clock.advance_secs(5);
        campaign.schedule(0, "Almuj", clock.now());
        let pending = campaign.pending().cloned().unwrap();
        assert_eq!(pending.territory_name, "Almuj");
        assert_eq!(pending.attempt_count, 1);
        assert_eq!(pending.schedule_started_at, clock.now());
    }

    #[test]
    fn test_exhaustion_clears_and_announces() {
        let clock = ManualClock::at_epoch();
        let mut campaign = RetryCampaign::new();
        for _ in 0..MAX_RETRY_ATTEMPTS {
            assert_eq!(campaign.schedule(0, "Detlas", clock.now()), None);
        }
        assert_eq!(
            campaign.schedule(0, "Detlas", clock.now()),
            Some(Announcement::RetryExhausted {
                territory: "Detlas".to_string(),
                attempts: MAX_RETRY_ATTEMPTS,
            })
        );
        assert!(campaign.pending().is_none());
    }
}
