use log::debug;
use std::collections::HashSet;

use crate::config::*;

/// Checks all the preconditions on the input, before anything gets counted.
pub(crate) fn check_ballots(ballots: &[Ballot], seats: u32) -> Result<(), InputViolation> {
    if seats == 0 {
        return Err(InputViolation::NoSeats);
    }
    if ballots.is_empty() {
        return Err(InputViolation::EmptyElection);
    }
    for (idx, b) in ballots.iter().enumerate() {
        // Also rejects NaN and infinities.
        if !(b.weight.is_finite() && b.weight > 0.0) {
            return Err(InputViolation::InvalidWeight { ballot: idx });
        }
        if b.candidates.is_empty() {
            return Err(InputViolation::EmptyBallot { ballot: idx });
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for c in b.candidates.iter() {
            if !seen.insert(c.as_str()) {
                return Err(InputViolation::DuplicateCandidate {
                    ballot: idx,
                    candidate: c.clone(),
                });
            }
        }
    }
    Ok(())
}

/// The fractional Droop quota: total weight / (seats + 1).
///
/// There is no rounding and no +1 offset, so two candidates may reach the
/// quota exactly at the same time.
pub fn compute_quota(ballots: &[Ballot], seats: u32) -> Result<f64, VotingErrors> {
    check_ballots(ballots, seats)?;
    let total: f64 = ballots.iter().map(|b| b.weight).sum();
    let quota = total / (seats as f64 + 1.0);
    debug!(
        "compute_quota: total weight {:?}, seats {:?} -> quota {:?}",
        total, seats, quota
    );
    Ok(quota)
}
