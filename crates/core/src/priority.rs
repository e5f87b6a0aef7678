//! Tip-priority ordering of live song requests.
//!
//! Live requests are served by tip amount, highest first. Equal tips fall
//! back to arrival order (oldest first) and finally to the store-assigned id,
//! which makes the order total: the same inputs always produce the same
//! sequence regardless of how they were fetched.
//!
//! The Postgres repository expresses the same key as
//! `ORDER BY tip_amount DESC, created_at ASC, id ASC`; [`sort_by_priority`]
//! is the in-process equivalent.

use std::cmp::Ordering;

use crate::error::CoreError;
use crate::types::{Cents, DbId, Timestamp};

/// Anything that can be placed in a tip-priority queue.
pub trait Prioritized {
    fn tip_amount(&self) -> Cents;
    fn created_at(&self) -> Timestamp;
    /// Final tie-break for requests admitted within the same clock tick.
    fn sequence(&self) -> DbId;
}

/// Compare two requests by (tip desc, created_at asc, sequence asc).
///
/// `Ordering::Less` means `a` is served before `b`.
pub fn tip_priority<T: Prioritized>(a: &T, b: &T) -> Ordering {
    b.tip_amount()
        .cmp(&a.tip_amount())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.sequence().cmp(&b.sequence()))
}

/// Sort requests in place into serving order.
pub fn sort_by_priority<T: Prioritized>(items: &mut [T]) {
    items.sort_by(tip_priority);
}

/// Check that a sequence is already in serving order.
pub fn is_priority_ordered<T: Prioritized>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|pair| tip_priority(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Sum of tips over a set of requests, saturating at `Cents::MAX`.
pub fn total_tips<T: Prioritized>(items: &[T]) -> Cents {
    items
        .iter()
        .fold(0, |total: Cents, item| total.saturating_add(item.tip_amount()))
}

/// Check a caller-supplied snapshot limit. `None` means the whole queue;
/// zero and negative limits are rejected rather than read as "no limit".
pub fn snapshot_limit(limit: Option<i64>) -> Result<Option<usize>, CoreError> {
    match limit {
        None => Ok(None),
        Some(l) if l <= 0 => Err(CoreError::Validation(format!(
            "limit must be a positive number of items (got {l})"
        ))),
        Some(l) => Ok(Some(usize::try_from(l).unwrap_or(usize::MAX))),
    }
}

/// Truncate an ordered queue to the first `limit` entries.
pub fn apply_limit<T>(items: &mut Vec<T>, limit: Option<usize>) {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Req {
        name: &'static str,
        tip: Cents,
        t: i64,
        seq: DbId,
    }

    impl Prioritized for Req {
        fn tip_amount(&self) -> Cents {
            self.tip
        }
        fn created_at(&self) -> Timestamp {
            Utc.timestamp_opt(self.t, 0).unwrap()
        }
        fn sequence(&self) -> DbId {
            self.seq
        }
    }

    fn req(name: &'static str, tip: Cents, t: i64, seq: DbId) -> Req {
        Req { name, tip, t, seq }
    }

    fn names(items: &[Req]) -> Vec<&'static str> {
        items.iter().map(|r| r.name).collect()
    }

    #[test]
    fn higher_tip_first_then_arrival() {
        let mut items = vec![
            req("A", 500, 1, 1),
            req("B", 2000, 2, 2),
            req("C", 2000, 3, 3),
        ];
        sort_by_priority(&mut items);
        assert_eq!(names(&items), ["B", "C", "A"]);
    }

    #[test]
    fn same_tip_same_instant_falls_back_to_sequence() {
        let mut items = vec![req("late", 1000, 5, 9), req("early", 1000, 5, 4)];
        sort_by_priority(&mut items);
        assert_eq!(names(&items), ["early", "late"]);
    }

    #[test]
    fn sort_is_independent_of_input_order() {
        let base = vec![
            req("w", 300, 1, 1),
            req("x", 700, 2, 2),
            req("y", 300, 3, 3),
            req("z", 700, 2, 4),
        ];
        let mut forward = base.clone();
        let mut reversed: Vec<Req> = base.into_iter().rev().collect();
        sort_by_priority(&mut forward);
        sort_by_priority(&mut reversed);
        assert_eq!(forward, reversed);
        assert_eq!(names(&forward), ["x", "z", "w", "y"]);
    }

    #[test]
    fn ordered_check_detects_inversions() {
        assert!(is_priority_ordered(&[req("a", 900, 1, 1), req("b", 100, 0, 2)]));
        assert!(!is_priority_ordered(&[req("a", 100, 1, 1), req("b", 900, 2, 2)]));
        assert!(is_priority_ordered::<Req>(&[]));
    }

    #[test]
    fn total_sums_all_tips() {
        let items = [req("a", 500, 1, 1), req("b", 1000, 2, 2)];
        assert_eq!(total_tips(&items), 1500);
        assert_eq!(total_tips::<Req>(&[]), 0);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let huge = i64::MAX / 2 + 1;
        let items = [req("a", huge, 1, 1), req("b", huge, 2, 2)];
        assert_eq!(total_tips(&items), Cents::MAX);
    }

    #[test]
    fn limit_truncates_the_front_of_the_queue() {
        let mut items = vec![1, 2, 3, 4, 5];
        apply_limit(&mut items, Some(3));
        assert_eq!(items, [1, 2, 3]);

        apply_limit(&mut items, None);
        assert_eq!(items.len(), 3);

        apply_limit(&mut items, Some(10));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn non_positive_limits_are_rejected() {
        assert_eq!(snapshot_limit(None).unwrap(), None);
        assert_eq!(snapshot_limit(Some(5)).unwrap(), Some(5));
        assert!(matches!(snapshot_limit(Some(0)), Err(CoreError::Validation(_))));
        assert!(matches!(snapshot_limit(Some(-1)), Err(CoreError::Validation(_))));
    }
}
