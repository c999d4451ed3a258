/*!
Fractional Single Transferable Vote (STV) for multi-seat elections with
weighted ballots.

```
use stv_voting::{compute, Ballot};
# use stv_voting::VotingErrors;

let alice = "Alice".to_string();
let bob = "Bob".to_string();
let ballots = vec![
    Ballot::new(1.0, &[alice.clone(), bob.clone()]),
    Ballot::new(1.0, &[bob.clone(), alice.clone()]),
    Ballot::new(2.0, &[alice.clone()]),
];
let outcome = compute(&ballots, 1)?;
assert_eq!(outcome.winners, vec!["Alice".to_string()]);
# Ok::<(), VotingErrors>(())
```

See the [manual] for a description of the counting rules.
*/

pub mod builder;
mod config;
mod ledger;
pub mod manual;
mod observer;
mod quota;
mod transfer;

use log::{debug, info};

pub use crate::config::*;
pub use crate::observer::{EventLog, Observer};
pub use crate::quota::compute_quota;

use crate::ledger::{CandidateId, Status, VoteLedger};
use crate::transfer::{transfer, TransferMode, TransferStats};

/// Runs the count and records every event.
///
/// Arguments:
/// * `ballots` the ballots, in input order. The order in which the names first
/// appear decides the order of the candidates for tie breaks and reporting.
/// * `seats` the number of seats to fill
pub fn compute(ballots: &[Ballot], seats: u32) -> Result<ElectionOutcome, VotingErrors> {
    let mut log = EventLog::new();
    let res = compute_with_observer(ballots, seats, &mut log)?;
    Ok(ElectionOutcome {
        winners: res.winners,
        quota: res.quota,
        exhausted: res.exhausted,
        logs: log.into_logs(),
    })
}

/// Runs the count and sends every event to the given observer.
///
/// Nothing is sent to the observer if the input is rejected.
pub fn compute_with_observer(
    ballots: &[Ballot],
    seats: u32,
    observer: &mut dyn Observer,
) -> Result<StvResult, VotingErrors> {
    info!("Processing {:?} ballots, {:?} seats", ballots.len(), seats);

    let quota = compute_quota(ballots, seats)?;
    info!("Quota: {}", quota);
    observer.on_quota_set(quota);

    let ledger = VoteLedger::seed(ballots);
    for (idx, (cid, weight)) in ledger.tally().iter().enumerate() {
        info!("Candidate: {}: {} ({})", idx + 1, ledger.name(*cid), weight);
    }
    observer.on_distribution_snapshot(ledger.snapshot());

    let engine = RoundEngine {
        ledger,
        quota,
        seats,
        winners: Vec::new(),
    };
    engine.run(observer)
}

// **** Private structures ****

type RoundId = u32;

struct RoundEngine {
    ledger: VoteLedger,
    // Fixed for the whole count.
    quota: f64,
    seats: u32,
    // In order of election.
    winners: Vec<CandidateId>,
}

impl RoundEngine {
    fn run(mut self, observer: &mut dyn Observer) -> Result<StvResult, VotingErrors> {
        // Every round resolves at least one candidate.
        let max_rounds = self.ledger.num_candidates() as RoundId;
        let mut round_id: RoundId = 0;
        while !self.is_done() {
            if round_id >= max_rounds {
                return Err(VotingErrors::NoConvergence);
            }
            round_id += 1;
            self.run_one_round(round_id, observer)?;
        }

        let winners: Vec<String> = self
            .winners
            .iter()
            .map(|cid| self.ledger.name(*cid).to_string())
            .collect();
        info!(
            "Done after {} rounds: winners {:?}, exhausted {}",
            round_id,
            winners,
            self.ledger.exhausted()
        );
        Ok(StvResult {
            winners,
            quota: self.quota,
            exhausted: self.ledger.exhausted(),
        })
    }

    // Only checked between rounds: a round may elect more candidates than
    // there are seats left.
    fn is_done(&self) -> bool {
        self.winners.len() >= self.seats as usize || self.ledger.tally().is_empty()
    }

    fn run_one_round(
        &mut self,
        round_id: RoundId,
        observer: &mut dyn Observer,
    ) -> Result<(), VotingErrors> {
        let tally = self.ledger.tally();
        debug!("run_one_round: round {}: tally: {:?}", round_id, tally);

        // All the candidates are compared to the tally at the start of the round.
        let above_quota: Vec<CandidateId> = tally
            .iter()
            .filter(|(_, weight)| *weight >= self.quota)
            .map(|(cid, _)| *cid)
            .collect();

        if above_quota.is_empty() {
            let cid = find_eliminated_candidate(&tally).ok_or(VotingErrors::NoConvergence)?;
            self.eliminate(cid, observer);
        } else {
            for cid in above_quota.iter() {
                observer.on_above_quota(self.ledger.name(*cid));
            }
            for cid in above_quota {
                self.elect(cid, observer);
            }
        }
        Ok(())
    }

    fn elect(&mut self, cid: CandidateId, observer: &mut dyn Observer) {
        let total = self.ledger.total_weight(cid);
        let surplus = total - self.quota;
        let ratio = if total > 0.0 { surplus / total } else { 0.0 };
        info!(
            "{} -> elected with {} (surplus {})",
            self.ledger.name(cid),
            total,
            surplus
        );

        let wallets = self.ledger.remove_candidate(cid, Status::Elected);
        let stats = transfer(cid, wallets, TransferMode::Scaled(ratio), &mut self.ledger);
        self.log_transfers(&stats);
        self.winners.push(cid);
        observer.on_elected(self.ledger.name(cid), self.ledger.snapshot());
    }

    fn eliminate(&mut self, cid: CandidateId, observer: &mut dyn Observer) {
        info!(
            "{} -> eliminated with {}",
            self.ledger.name(cid),
            self.ledger.total_weight(cid)
        );
        let wallets = self.ledger.remove_candidate(cid, Status::Eliminated);
        let stats = transfer(cid, wallets, TransferMode::Full, &mut self.ledger);
        self.log_transfers(&stats);
        observer.on_eliminated(self.ledger.name(cid), self.ledger.snapshot());
    }

    fn log_transfers(&self, stats: &TransferStats) {
        for (cid, weight) in stats.transfers.iter() {
            info!("  {} -> {}", self.ledger.name(*cid), weight);
        }
        if stats.exhausted > 0.0 {
            info!("  exhausted -> {}", stats.exhausted);
        }
    }
}

// The lowest candidate. On a tie, the first one in candidate order.
fn find_eliminated_candidate(tally: &[(CandidateId, f64)]) -> Option<CandidateId> {
    let mut lowest: Option<(CandidateId, f64)> = None;
    for &(cid, weight) in tally.iter() {
        match lowest {
            Some((_, lowest_weight)) if lowest_weight <= weight => {}
            _ => lowest = Some((cid, weight)),
        }
    }
    lowest.map(|(cid, _)| cid)
}
