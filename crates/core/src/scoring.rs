//! Reaction scoring.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Points awarded to one member for spotting the ninja.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPoints {
    pub user_id: UserId,
    pub points: u32,
}

/// Points for a reaction that arrived `elapsed` after the ninja appeared.
///
/// The reaction window is split into `max_points` equal slices; every full
/// slice that has passed costs one point. Anyone who reacts at all gets at
/// least one point.
pub fn win_points(max_points: u32, timeout: Duration, elapsed: Duration) -> u32 {
    if max_points == 0 || timeout.is_zero() {
        return 1;
    }

    let seconds_per_point = timeout.as_secs_f64() / f64::from(max_points);
    let elapsed = elapsed.min(timeout).as_secs_f64();
    let lost = (elapsed / seconds_per_point).floor() as u32;

    max_points.saturating_sub(lost).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn instant_reaction_earns_max_points() {
        assert_eq!(win_points(10, TIMEOUT, Duration::ZERO), 10);
    }

    #[test]
    fn each_full_slice_costs_one_point() {
        // 30s window, 10 points -> one point per 3 seconds
        assert_eq!(win_points(10, TIMEOUT, Duration::from_millis(2_999)), 10);
        assert_eq!(win_points(10, TIMEOUT, Duration::from_secs(3)), 9);
        assert_eq!(win_points(10, TIMEOUT, Duration::from_secs(14)), 6);
    }

    #[test]
    fn late_reactions_still_earn_one_point() {
        assert_eq!(win_points(10, TIMEOUT, Duration::from_secs(29)), 1);
        assert_eq!(win_points(10, TIMEOUT, Duration::from_secs(30)), 1);
        assert_eq!(win_points(10, TIMEOUT, Duration::from_secs(300)), 1);
    }

    #[test]
    fn degenerate_settings_award_one_point() {
        assert_eq!(win_points(0, TIMEOUT, Duration::ZERO), 1);
        assert_eq!(win_points(10, Duration::ZERO, Duration::ZERO), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn points_stay_within_bounds(max in 1u32..1_000, timeout_ms in 1u64..600_000, elapsed_ms in 0u64..1_200_000) {
            let points = win_points(max, Duration::from_millis(timeout_ms), Duration::from_millis(elapsed_ms));
            prop_assert!(points >= 1);
            prop_assert!(points <= max);
        }

        #[test]
        fn later_reactions_never_earn_more(max in 1u32..100, a in 0u64..60_000, b in 0u64..60_000) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let early_points = win_points(max, TIMEOUT, Duration::from_millis(early));
            let late_points = win_points(max, TIMEOUT, Duration::from_millis(late));
            prop_assert!(early_points >= late_points);
        }
    }
}
