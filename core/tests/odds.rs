//! Odds model tests — win thresholds and payout validation.

use martingale_core::odds::{derive_win_threshold, is_valid_payout, WinThreshold};

#[test]
fn win_threshold_matches_published_table() {
    assert_eq!(derive_win_threshold(2.0).as_percent(), 49.5,
        "Win chance incorrectly calculated for payout 2");
    assert_eq!(derive_win_threshold(3.0).as_percent(), 33.0,
        "Win chance incorrectly calculated for payout 3");
    assert_eq!(derive_win_threshold(1.5).as_percent(), 66.0,
        "Win chance incorrectly calculated for payout 1.5");
}

#[test]
fn win_threshold_is_held_in_hundredths() {
    assert_eq!(derive_win_threshold(2.0), WinThreshold::from_hundredths(4950));
    assert_eq!(derive_win_threshold(3.0).hundredths(), 3300);
    assert_eq!(derive_win_threshold(1.5).hundredths(), 6600);
}

#[test]
fn win_threshold_never_increases_with_payout() {
    let mut payout = 1.01202_f64;
    let mut previous = derive_win_threshold(payout);
    while payout <= 9900.0 {
        let current = derive_win_threshold(payout);
        assert!(current <= previous,
            "Threshold rose from {} to {} at payout {payout}",
            previous.as_percent(), current.as_percent());
        previous = current;
        payout *= 1.003;
    }
}

#[test]
fn payout_range_limits() {
    assert!(!is_valid_payout(1.0), "Payout 1 should be below the minimum");
    assert!(is_valid_payout(3.0), "Payout 3 should be allowed");
    assert!(!is_valid_payout(10_000.0), "Payout 10000 should be above the maximum");
    assert!(is_valid_payout(1.01202), "Minimum payout is inclusive");
    assert!(is_valid_payout(9900.0), "Maximum payout is inclusive");
    assert!(!is_valid_payout(f64::NAN), "NaN is never a valid payout");
}

#[test]
fn out_of_range_payout_still_yields_a_threshold() {
    // Above the maximum the chance keeps shrinking toward zero.
    let tiny = derive_win_threshold(20_000.0);
    assert!(tiny.hundredths() <= 1, "Expected a near-zero threshold, got {}", tiny.as_percent());

    // Below 1x the formula exceeds 100%: every roll wins.
    let huge = derive_win_threshold(0.5);
    assert!(huge.hundredths() > 10_000, "Expected a threshold above 100%, got {}", huge.as_percent());
    assert!(huge.wins(9_999));
}

#[test]
fn roll_equal_to_threshold_loses() {
    let threshold = derive_win_threshold(2.0);
    assert!(threshold.wins(4_949), "49.49 should win under 49.50");
    assert!(!threshold.wins(4_950), "49.50 should lose against 49.50");
    assert!(!threshold.wins(9_999));
    assert!(threshold.wins(0));
}
