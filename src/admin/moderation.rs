use super::domain::{ListingStatus, ModerationAction};

impl ModerationAction {
    /// Destination status for this action applied to `current`.
    ///
    /// Approve always lands on `Active`, which covers first approval from
    /// `Pending` as well as re-approval of `Rejected` or `Inactive`
    /// listings. Reject is reachable from any state. Toggle flips an
    /// active listing off and turns every other state on; callers must
    /// pass the status fetched from the store at call time, not a cached
    /// projection value.
    pub const fn destination(self, current: ListingStatus) -> ListingStatus {
        match (self, current) {
            (ModerationAction::Approve, _) => ListingStatus::Active,
            (ModerationAction::Reject, _) => ListingStatus::Rejected,
            (ModerationAction::ToggleActive, ListingStatus::Active) => ListingStatus::Inactive,
            (ModerationAction::ToggleActive, _) => ListingStatus::Active,
        }
    }
}
