//! Time-range helpers shared by facility and resource bookings.

use crate::errors::ModelError;

/// Inclusive overlap test: `[a_start, a_end]` and `[b_start, b_end]` clash when
/// `a_start <= b_end && a_end >= b_start`. Touching endpoints count as a clash.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// A range must start strictly before it ends.
pub fn validate_range<T: PartialOrd>(start: T, end: T) -> Result<(), ModelError> {
    if start >= end {
        return Err(ModelError::Validation("start time must be before end time".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!overlaps(t(9, 0), t(10, 0), t(10, 30), t(11, 0)));
        assert!(!overlaps(t(13, 0), t(14, 0), t(9, 0), t(12, 59)));
    }

    #[test]
    fn nested_and_partial_ranges_overlap() {
        assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(12, 0)));
        assert!(overlaps(t(9, 0), t(10, 30), t(10, 0), t(11, 0)));
    }

    #[test]
    fn touching_endpoints_overlap() {
        assert!(overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [(t(8, 0), t(9, 0)), (t(8, 30), t(9, 30)), (t(9, 0), t(9, 15)), (t(10, 0), t(11, 0))];
        for a in cases {
            for b in cases {
                assert_eq!(overlaps(a.0, a.1, b.0, b.1), overlaps(b.0, b.1, a.0, a.1));
            }
        }
    }

    #[test]
    fn empty_or_inverted_range_is_rejected() {
        assert!(validate_range(t(10, 0), t(10, 0)).is_err());
        assert!(validate_range(t(11, 0), t(10, 0)).is_err());
        assert!(validate_range(t(10, 0), t(10, 1)).is_ok());
    }
}
