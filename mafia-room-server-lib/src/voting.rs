//! A single ballot/tally pair for one voting lane (public, mafia, or sheriff).

use std::collections::HashMap;
use std::sync::Arc;

use mafia_room_lib::VotingView;

/// Tracks one ballot per eligible voter over a fixed set of eligible suspects.
///
/// The tally is kept as a `Vec` rather than a `HashMap` so that iteration order is the
/// construction order (voters/suspects as they joined the room) — this is what `winner()`'s
/// tie-break depends on, mirroring the source's reliance on Python dict insertion order.
pub(crate) struct Voting {
    ballot: HashMap<Arc<str>, Option<Arc<str>>>,
    tally: Vec<(Arc<str>, u32)>,
}

impl Voting {
    /// Builds a new voting lane. `voters` are who may cast a ballot; `suspects` are who may be
    /// targeted. Both are expected in the room's stable join order.
    pub(crate) fn new<'a>(
        voters: impl Iterator<Item = &'a Arc<str>>,
        suspects: impl Iterator<Item = &'a Arc<str>>,
    ) -> Self {
        Self {
            ballot: voters.map(|v| (Arc::clone(v), None)).collect(),
            tally: suspects.map(|s| (Arc::clone(s), 0)).collect(),
        }
    }

    /// Casts or changes `voter`'s ballot to `suspect`, atomically swapping the tally.
    ///
    /// Both `voter` and `suspect` are assumed to be members of the sets this lane was constructed
    /// with; callers validate membership before calling this.
    pub(crate) fn vote(&mut self, voter: &Arc<str>, suspect: &Arc<str>) {
        let previous = self
            .ballot
            .get_mut(voter)
            .expect("voter is eligible for this lane")
            .replace(Arc::clone(suspect));

        if let Some(previous) = previous {
            if let Some(entry) = self.tally.iter_mut().find(|(s, _)| *s == previous) {
                entry.1 -= 1;
            }
        }

        if let Some(entry) = self.tally.iter_mut().find(|(s, _)| *s == *suspect) {
            entry.1 += 1;
        }
    }

    pub(crate) fn count(&self, suspect: &str) -> u32 {
        self.tally
            .iter()
            .find(|(s, _)| s.as_ref() == suspect)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Returns `true` if `username` is one of the voters eligible for this lane.
    pub(crate) fn can_vote(&self, username: &str) -> bool {
        self.ballot.contains_key(username)
    }

    /// Returns `true` if `username` is one of the suspects eligible for this lane.
    pub(crate) fn can_be_suspect(&self, username: &str) -> bool {
        self.tally.iter().any(|(s, _)| s.as_ref() == username)
    }

    /// The suspect with the highest tally, breaking ties by construction order (first suspect to
    /// reach the maximum wins).
    ///
    /// `Iterator::max_by_key` resolves ties by keeping the *last* maximal element, which is the
    /// opposite of what we want here, so the max is tracked by hand over construction order.
    pub(crate) fn winner(&self) -> Arc<str> {
        let mut best: Option<&(Arc<str>, u32)> = None;

        for entry in &self.tally {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }

        Arc::clone(&best.expect("voting lane always has at least one suspect").0)
    }

    /// `true` iff every eligible voter has cast a non-null ballot.
    pub(crate) fn everyone_voted(&self) -> bool {
        self.ballot.values().all(|v| v.is_some())
    }

    pub(crate) fn project(&self) -> VotingView {
        VotingView {
            votes: self.tally.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<Arc<str>> {
        names.iter().map(|n| Arc::from(*n)).collect()
    }

    #[test]
    fn vote_swap_is_atomic() {
        let voters = names(&["a", "b"]);
        let suspects = names(&["x", "y"]);
        let mut voting = Voting::new(voters.iter(), suspects.iter());

        voting.vote(&voters[0], &suspects[0]);
        assert_eq!(voting.count("x"), 1);
        assert_eq!(voting.count("y"), 0);

        voting.vote(&voters[0], &suspects[1]);
        assert_eq!(voting.count("x"), 0);
        assert_eq!(voting.count("y"), 1);
    }

    #[test]
    fn tally_sums_to_non_null_ballots() {
        let voters = names(&["a", "b", "c"]);
        let suspects = names(&["x", "y"]);
        let mut voting = Voting::new(voters.iter(), suspects.iter());

        voting.vote(&voters[0], &suspects[0]);
        voting.vote(&voters[1], &suspects[0]);

        let total: u32 = voting.tally.iter().map(|(_, c)| *c).sum();
        assert_eq!(total, 2);
        assert!(!voting.everyone_voted());

        voting.vote(&voters[2], &suspects[1]);
        assert!(voting.everyone_voted());
    }

    #[test]
    fn winner_ties_break_by_construction_order() {
        let voters = names(&["a", "b", "c", "d"]);
        let suspects = names(&["x", "y", "z"]);
        let mut voting = Voting::new(voters.iter(), suspects.iter());

        voting.vote(&voters[0], &suspects[1]); // y
        voting.vote(&voters[1], &suspects[1]); // y
        voting.vote(&voters[2], &suspects[0]); // x
        voting.vote(&voters[3], &suspects[0]); // x

        // x and y tie at 2 votes; x was constructed first.
        assert_eq!(voting.winner().as_ref(), "x");
    }
}
