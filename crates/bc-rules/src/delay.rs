//! The end-of-round delay decay formula (§4.4): how much a robot's core and
//! weapon delay counters shrink based on the bytecodes it burned this turn.
//!
//! Kept as free functions over plain numbers, not methods on `RobotRecord`,
//! so the formula itself can be unit- and property-tested in isolation from
//! world plumbing.

/// The amount subtracted from a delay counter at end of round. Robots that
/// stay under their type's free bytecode threshold decay by a full 1.0;
/// robots that burn through their entire budget only decay by 0.7, so
/// running hot costs you responsiveness even though it never fully stalls.
pub fn decay_amount(bytecodes_used: u32, free_threshold: u32, bytecode_limit: u32) -> f64 {
    if bytecode_limit == 0 || bytecodes_used <= free_threshold {
        return 1.0;
    }
    if bytecodes_used >= bytecode_limit {
        return 0.7;
    }
    let used = bytecodes_used as f64;
    let limit = bytecode_limit as f64;
    1.0 - 0.3 * (used / limit).powf(1.5)
}

/// Apply the decay, floored at zero (a delay counter never goes negative).
pub fn apply_decay(delay: f64, bytecodes_used: u32, free_threshold: u32, bytecode_limit: u32) -> f64 {
    let decay = decay_amount(bytecodes_used, free_threshold, bytecode_limit);
    (delay - decay).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staying_under_threshold_decays_by_a_full_unit() {
        assert_eq!(decay_amount(100, 6000, 10_000), 1.0);
        assert_eq!(decay_amount(6000, 6000, 10_000), 1.0);
    }

    #[test]
    fn maxing_out_bytecodes_decays_by_point_seven() {
        assert_eq!(decay_amount(10_000, 6000, 10_000), 0.7);
        assert_eq!(decay_amount(50_000, 6000, 10_000), 0.7);
    }

    #[test]
    fn decay_amount_is_between_the_two_bounds_in_the_middle_of_the_range() {
        let decay = decay_amount(8000, 6000, 10_000);
        assert!(decay > 0.7 && decay < 1.0);
    }

    #[test]
    fn apply_decay_never_goes_negative() {
        assert_eq!(apply_decay(0.2, 10_000, 6000, 10_000), 0.0);
    }

    #[test]
    fn zero_bytecode_limit_always_fully_decays() {
        assert_eq!(decay_amount(0, 0, 0), 1.0);
    }
}
