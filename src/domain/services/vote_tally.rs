//! Vote tally - Plurality resolution shared by the night attack and the day vote
//!
//! Ballots are `Option<T>`: `None` is an abstain. The two policies differ only
//! in how they treat abstains and ties.

use rand::seq::SliceRandom;
use rand::Rng;

/// How a vote round turns ballots into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyPolicy {
    /// Night attack: any tie among the leaders is broken uniformly at random
    RandomTieBreak,
    /// Day execution: half or more abstaining, or a tie, means no result
    NoResultOnSkipOrTie,
}

/// Resolve a closed round of ballots
pub fn tally<T, R>(ballots: &[Option<T>], policy: TallyPolicy, rng: &mut R) -> Option<T>
where
    T: Copy + Eq,
    R: Rng + ?Sized,
{
    if ballots.is_empty() {
        return None;
    }

    if policy == TallyPolicy::NoResultOnSkipOrTie {
        let abstains = ballots.iter().filter(|b| b.is_none()).count();
        if abstains * 2 >= ballots.len() {
            return None;
        }
    }

    let leaders = leaders(ballots);
    match (policy, leaders.as_slice()) {
        (_, []) => None,
        (_, [only]) => Some(*only),
        (TallyPolicy::RandomTieBreak, tied) => tied.choose(rng).copied(),
        (TallyPolicy::NoResultOnSkipOrTie, _) => None,
    }
}

/// Targets holding the maximum count, in first-appearance order
fn leaders<T: Copy + Eq>(ballots: &[Option<T>]) -> Vec<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for target in ballots.iter().flatten() {
        match counts.iter_mut().find(|(t, _)| t == target) {
            Some((_, n)) => *n += 1,
            None => counts.push((*target, 1)),
        }
    }

    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    counts
        .into_iter()
        .filter(|(_, n)| *n == max)
        .map(|(t, _)| t)
        .collect()
}
