//! Ballots and the per-round ballot box
//!
//! A `BallotBox` is opened for one vote round with a fixed electorate and a
//! fixed candidate list. It accepts at most one ballot per eligible voter and
//! is consumed when the round closes, so a closed round can never be amended.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PlayerId;

/// One voter's choice in a vote round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallotChoice {
    Target(PlayerId),
    /// Explicit abstain
    Skip,
}

impl BallotChoice {
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            BallotChoice::Target(id) => Some(*id),
            BallotChoice::Skip => None,
        }
    }
}

/// Reasons a ballot is refused at the submission boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BallotError {
    #[error("Player {0} is not eligible to vote in this round")]
    NotEligible(PlayerId),

    #[error("Player {0} has already voted")]
    AlreadyVoted(PlayerId),

    #[error("Player {0} is not a candidate in this round")]
    InvalidTarget(PlayerId),

    #[error("Skipping is not allowed in this round")]
    SkipNotAllowed,
}

impl BallotError {
    /// Localization key used to tell the submitter why the ballot was refused
    pub fn key(&self) -> &'static str {
        match self {
            BallotError::NotEligible(_) => "BallotNotEligible",
            BallotError::AlreadyVoted(_) => "BallotAlreadyVoted",
            BallotError::InvalidTarget(_) => "BallotInvalidTarget",
            BallotError::SkipNotAllowed => "BallotSkipNotAllowed",
        }
    }
}

/// Collects ballots for a single vote round
#[derive(Debug, Clone)]
pub struct BallotBox {
    electorate: HashSet<PlayerId>,
    candidates: HashSet<PlayerId>,
    allow_skip: bool,
    ballots: HashMap<PlayerId, BallotChoice>,
    /// Voters in submission order
    order: Vec<PlayerId>,
}

impl BallotBox {
    pub fn open(
        electorate: impl IntoIterator<Item = PlayerId>,
        candidates: impl IntoIterator<Item = PlayerId>,
        allow_skip: bool,
    ) -> Self {
        Self {
            electorate: electorate.into_iter().collect(),
            candidates: candidates.into_iter().collect(),
            allow_skip,
            ballots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Record a ballot. A rejected ballot leaves the box untouched.
    pub fn cast(&mut self, voter: PlayerId, choice: BallotChoice) -> Result<(), BallotError> {
        if !self.electorate.contains(&voter) {
            return Err(BallotError::NotEligible(voter));
        }
        if self.ballots.contains_key(&voter) {
            return Err(BallotError::AlreadyVoted(voter));
        }
        match choice {
            BallotChoice::Target(target) if !self.candidates.contains(&target) => {
                return Err(BallotError::InvalidTarget(target));
            }
            BallotChoice::Skip if !self.allow_skip => return Err(BallotError::SkipNotAllowed),
            _ => {}
        }

        self.ballots.insert(voter, choice);
        self.order.push(voter);
        Ok(())
    }

    /// Record an implicit abstain for a voter who never answered.
    /// Counts toward the ballot total even when explicit skips are refused.
    pub fn abstain(&mut self, voter: PlayerId) -> Result<(), BallotError> {
        if !self.electorate.contains(&voter) {
            return Err(BallotError::NotEligible(voter));
        }
        if self.ballots.contains_key(&voter) {
            return Err(BallotError::AlreadyVoted(voter));
        }
        self.ballots.insert(voter, BallotChoice::Skip);
        self.order.push(voter);
        Ok(())
    }

    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.ballots.contains_key(&voter)
    }

    pub fn ballot_count(&self) -> usize {
        self.order.len()
    }

    /// Close the round, yielding ballot values in submission order
    pub fn close(self) -> Vec<Option<PlayerId>> {
        self.order
            .iter()
            .filter_map(|voter| self.ballots.get(voter))
            .map(BallotChoice::target)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PlayerId> {
        raw.iter().copied().map(PlayerId::new).collect()
    }

    #[test]
    fn test_cast_and_close_preserves_order() {
        let mut ballot_box = BallotBox::open(ids(&[1, 2, 3]), ids(&[1, 2, 3]), true);
        ballot_box.cast(PlayerId::new(3), BallotChoice::Skip).unwrap();
        ballot_box
            .cast(PlayerId::new(1), BallotChoice::Target(PlayerId::new(2)))
            .unwrap();

        assert_eq!(ballot_box.ballot_count(), 2);
        assert_eq!(ballot_box.close(), vec![None, Some(PlayerId::new(2))]);
    }

    #[test]
    fn test_duplicate_ballot_keeps_first() {
        let mut ballot_box = BallotBox::open(ids(&[1, 2]), ids(&[1, 2]), true);
        ballot_box
            .cast(PlayerId::new(1), BallotChoice::Target(PlayerId::new(2)))
            .unwrap();

        let result = ballot_box.cast(PlayerId::new(1), BallotChoice::Skip);
        assert_eq!(result, Err(BallotError::AlreadyVoted(PlayerId::new(1))));
        assert_eq!(ballot_box.close(), vec![Some(PlayerId::new(2))]);
    }

    #[test]
    fn test_non_member_cannot_vote() {
        let mut ballot_box = BallotBox::open(ids(&[1, 2]), ids(&[1, 2]), true);
        let result = ballot_box.cast(PlayerId::new(9), BallotChoice::Skip);
        assert_eq!(result, Err(BallotError::NotEligible(PlayerId::new(9))));
        assert!(!ballot_box.has_voted(PlayerId::new(9)));
    }

    #[test]
    fn test_non_candidate_target_rejected() {
        let mut ballot_box = BallotBox::open(ids(&[1, 2]), ids(&[2]), false);
        let result = ballot_box.cast(PlayerId::new(1), BallotChoice::Target(PlayerId::new(1)));
        assert_eq!(result, Err(BallotError::InvalidTarget(PlayerId::new(1))));

        let result = ballot_box.cast(PlayerId::new(1), BallotChoice::Skip);
        assert_eq!(result, Err(BallotError::SkipNotAllowed));
        assert_eq!(ballot_box.ballot_count(), 0);
    }

    #[test]
    fn test_implicit_abstain_counts_even_without_skip() {
        let mut ballot_box = BallotBox::open(ids(&[1, 2]), ids(&[1, 2]), false);
        ballot_box.abstain(PlayerId::new(1)).unwrap();
        ballot_box
            .cast(PlayerId::new(2), BallotChoice::Target(PlayerId::new(1)))
            .unwrap();

        assert_eq!(
            ballot_box.abstain(PlayerId::new(2)),
            Err(BallotError::AlreadyVoted(PlayerId::new(2)))
        );
        assert_eq!(ballot_box.close(), vec![None, Some(PlayerId::new(1))]);
    }
}
