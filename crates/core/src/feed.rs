//! Personalized feed composition.
//!
//! The feed shows public events created by the viewer or by accounts the
//! viewer follows. When that personalized list comes back empty but public
//! events exist, the whole public set is shown instead -- an empty
//! personalized feed is worse than an unpersonalized one. The fallback
//! never fires on a genuinely empty public set, so new installs still get
//! the empty state.
//!
//! [`compose_feed`] is deliberately pure: the HTTP handler re-reads the
//! follow set and the public event list on every request and recomputes
//! from scratch, so it is correct no matter which input changed last.

use std::collections::HashSet;

use crate::types::DbId;

/// Anything that can appear in a feed and has an owning user.
///
/// Implemented by the `PublicEvent` row model in `gatherly-db`.
pub trait Authored {
    /// The id of the user that created this item.
    fn owner_id(&self) -> DbId;
}

/// Compose the displayed feed for `viewer_id`.
///
/// `public_events` must already be ordered newest-first; relative order is
/// preserved in the output.
///
/// - Keeps events whose owner is the viewer or is in `following`.
/// - If the filtered list is empty and `public_events` is not, returns the
///   entire public set.
/// - If `public_events` is empty, returns an empty list.
pub fn compose_feed<T: Authored + Clone>(
    viewer_id: DbId,
    following: &HashSet<DbId>,
    public_events: &[T],
) -> Vec<T> {
    let filtered: Vec<T> = public_events
        .iter()
        .filter(|e| e.owner_id() == viewer_id || following.contains(&e.owner_id()))
        .cloned()
        .collect();

    if filtered.is_empty() && !public_events.is_empty() {
        return public_events.to_vec();
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: DbId,
        owner: DbId,
    }

    impl Authored for Item {
        fn owner_id(&self) -> DbId {
            self.owner
        }
    }

    fn item(id: DbId, owner: DbId) -> Item {
        Item { id, owner }
    }

    fn ids(items: &[Item]) -> Vec<DbId> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn keeps_own_and_followed_events_in_order() {
        let following: HashSet<DbId> = [20].into_iter().collect();
        let public = vec![item(1, 20), item(2, 30), item(3, 10), item(4, 40)];

        // Viewer 10 follows 20; event 2 and 4 are from strangers.
        let feed = compose_feed(10, &following, &public);
        assert_eq!(ids(&feed), vec![1, 3]);
    }

    #[test]
    fn falls_back_to_full_public_set_when_filter_is_empty() {
        let following: HashSet<DbId> = HashSet::new();
        let public = vec![item(1, 20), item(2, 30)];

        let feed = compose_feed(10, &following, &public);
        assert_eq!(ids(&feed), vec![1, 2], "unpersonalized fallback");
    }

    #[test]
    fn no_fallback_when_public_set_is_empty() {
        let following: HashSet<DbId> = [20].into_iter().collect();
        let feed = compose_feed(10, &following, &Vec::<Item>::new());
        assert!(feed.is_empty());
    }

    #[test]
    fn own_events_count_as_personalized() {
        let following: HashSet<DbId> = HashSet::new();
        let public = vec![item(1, 10), item(2, 30)];

        // Event 1 belongs to the viewer, so the filter is non-empty and
        // the stranger event must NOT leak in via the fallback.
        let feed = compose_feed(10, &following, &public);
        assert_eq!(ids(&feed), vec![1]);
    }

    #[test]
    fn following_update_changes_recomputation() {
        let public = vec![item(1, 20), item(2, 30)];

        // Same public snapshot, two different follow snapshots. Whichever
        // input arrives last, recomputing over both gives the right answer.
        let before: HashSet<DbId> = HashSet::new();
        let after: HashSet<DbId> = [30].into_iter().collect();

        assert_eq!(ids(&compose_feed(10, &before, &public)), vec![1, 2]);
        assert_eq!(ids(&compose_feed(10, &after, &public)), vec![2]);
    }
}
