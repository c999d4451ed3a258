use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// The position of a candidate in the canonical order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub(crate) struct CandidateId(pub(crate) u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub(crate) enum Status {
    Active,
    Elected,
    Eliminated,
}

/// A group of ballots with the same remaining preferences, held by one candidate.
///
/// The first element of the order is the holder. Resolved candidates are never
/// removed from an order, they are skipped when reading it.
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct Wallet {
    pub(crate) weight: f64,
    pub(crate) order: Vec<CandidateId>,
}

#[derive(PartialEq, Debug, Clone)]
struct LedgerEntry {
    name: String,
    status: Status,
    wallets: Vec<Wallet>,
    // Invariant: effective order -> position of the first wallet with that order.
    by_order: HashMap<Vec<CandidateId>, usize>,
    // Invariant: the sum of the weights of the wallets.
    total_weight: f64,
}

impl LedgerEntry {
    fn new(name: &str) -> LedgerEntry {
        LedgerEntry {
            name: name.to_string(),
            status: Status::Active,
            wallets: Vec::new(),
            by_order: HashMap::new(),
            total_weight: 0.0,
        }
    }

    fn update_total(&mut self) {
        self.total_weight = self.wallets.iter().map(|w| w.weight).sum();
    }
}

/// The wallets of every candidate, in canonical order.
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct VoteLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<String, CandidateId>,
    exhausted: f64,
}

impl VoteLedger {
    /// Registers the candidates in the order they first appear in the
    /// ballots and gives each ballot to its first choice.
    ///
    /// A candidate that is never a first choice starts with no wallet.
    pub(crate) fn seed(ballots: &[Ballot]) -> VoteLedger {
        let mut ledger = VoteLedger {
            entries: Vec::new(),
            index: HashMap::new(),
            exhausted: 0.0,
        };
        for name in ballots.iter().flat_map(|b| b.candidates.iter()) {
            if !ledger.index.contains_key(name) {
                let cid = CandidateId(ledger.entries.len() as u32);
                ledger.index.insert(name.clone(), cid);
                ledger.entries.push(LedgerEntry::new(name));
            }
        }

        for b in ballots.iter() {
            let order: Vec<CandidateId> = b
                .candidates
                .iter()
                .filter_map(|name| ledger.index.get(name).cloned())
                .collect();
            if let Some(&first) = order.first() {
                ledger.receive_wallet(
                    first,
                    Wallet {
                        weight: b.weight,
                        order,
                    },
                );
            }
        }
        ledger
    }

    pub(crate) fn num_candidates(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn name(&self, cid: CandidateId) -> &str {
        self.entries[cid.0 as usize].name.as_str()
    }

    pub(crate) fn status(&self, cid: CandidateId) -> Status {
        self.entries[cid.0 as usize].status
    }

    pub(crate) fn is_active(&self, cid: CandidateId) -> bool {
        self.status(cid) == Status::Active
    }

    pub(crate) fn total_weight(&self, cid: CandidateId) -> f64 {
        self.entries[cid.0 as usize].total_weight
    }

    pub(crate) fn exhausted(&self) -> f64 {
        self.exhausted
    }

    /// The active candidates in canonical order, with their current weight.
    pub(crate) fn tally(&self) -> Vec<(CandidateId, f64)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status == Status::Active)
            .map(|(idx, e)| (CandidateId(idx as u32), e.total_weight))
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Vec<CandidateVoteSummary> {
        self.entries
            .iter()
            .filter(|e| e.status == Status::Active)
            .map(|e| CandidateVoteSummary {
                candidate: e.name.clone(),
                total_votes: e.total_weight,
                total_wallets: e.wallets.len(),
            })
            .collect()
    }

    /// Marks the candidate as resolved and hands over its wallets.
    pub(crate) fn remove_candidate(&mut self, cid: CandidateId, status: Status) -> Vec<Wallet> {
        // Invariant: statuses only go from Active to Elected or Eliminated, once.
        assert!(status != Status::Active, "A candidate cannot be reactivated");
        let entry = &mut self.entries[cid.0 as usize];
        assert_eq!(
            entry.status,
            Status::Active,
            "Candidate {} is already resolved",
            entry.name
        );
        entry.status = status;
        entry.by_order.clear();
        let wallets = std::mem::take(&mut entry.wallets);
        entry.update_total();
        self.reindex(cid);
        wallets
    }

    // The effective orders that go through the resolved candidate change:
    // rebuilds the index of the holders of such wallets.
    fn reindex(&mut self, resolved: CandidateId) {
        for idx in 0..self.entries.len() {
            let entry = &self.entries[idx];
            if entry.status != Status::Active
                || !entry.wallets.iter().any(|w| w.order.contains(&resolved))
            {
                continue;
            }
            let mut by_order: HashMap<Vec<CandidateId>, usize> = HashMap::new();
            for (widx, w) in entry.wallets.iter().enumerate() {
                by_order.entry(self.effective_order(w)).or_insert(widx);
            }
            self.entries[idx].by_order = by_order;
        }
    }

    /// Gives a wallet to an active candidate.
    ///
    /// A wallet with the same remaining preferences as a wallet already held
    /// is merged into it.
    pub(crate) fn receive_wallet(&mut self, cid: CandidateId, wallet: Wallet) {
        if !self.is_active(cid) {
            debug!(
                "receive_wallet: {} is not running anymore, discarding {:?}",
                self.name(cid),
                wallet.weight
            );
            self.discard(wallet.weight);
            return;
        }
        let incoming = self.effective_order(&wallet);
        let entry = &mut self.entries[cid.0 as usize];
        match entry.by_order.get(&incoming).cloned() {
            Some(idx) => {
                debug!(
                    "receive_wallet: {}: merging {:?} into {:?}",
                    entry.name, wallet.weight, entry.wallets[idx].weight
                );
                entry.wallets[idx] = Wallet {
                    weight: entry.wallets[idx].weight + wallet.weight,
                    order: wallet.order,
                };
            }
            None => {
                entry.by_order.insert(incoming, entry.wallets.len());
                entry.wallets.push(wallet);
            }
        }
        entry.update_total();
    }

    /// Records weight that could not go to any candidate.
    pub(crate) fn discard(&mut self, weight: f64) {
        self.exhausted += weight;
    }

    /// The order of the wallet, without the candidates that were resolved.
    pub(crate) fn effective_order(&self, wallet: &Wallet) -> Vec<CandidateId> {
        wallet
            .order
            .iter()
            .filter(|cid| self.is_active(**cid))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn id(&self, name: &str) -> Option<CandidateId> {
        self.index.get(name).cloned()
    }

    #[cfg(test)]
    pub(crate) fn wallets(&self, cid: CandidateId) -> &[Wallet] {
        &self.entries[cid.0 as usize].wallets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot(weight: f64, names: &[&str]) -> Ballot {
        Ballot {
            weight,
            candidates: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn names(summary: &[CandidateVoteSummary]) -> Vec<String> {
        summary.iter().map(|s| s.candidate.clone()).collect()
    }

    #[test]
    fn seed_registers_candidates_in_order_of_appearance() {
        let ledger = VoteLedger::seed(&[
            ballot(1.0, &["Bob", "Zoe", "Alice"]),
            ballot(1.0, &["Alice"]),
            ballot(2.0, &["Bob", "Alice"]),
            ballot(1.0, &["Charlie", "Bob"]),
        ]);
        assert_eq!(ledger.num_candidates(), 4);
        assert_eq!(
            names(&ledger.snapshot()),
            vec![
                "Bob".to_string(),
                "Zoe".to_string(),
                "Alice".to_string(),
                "Charlie".to_string()
            ]
        );
        // Zoe is never a first choice and runs with nothing.
        let zoe = ledger.id("Zoe").unwrap();
        assert!(ledger.is_active(zoe));
        assert_eq!(ledger.total_weight(zoe), 0.0);
        assert!(ledger.wallets(zoe).is_empty());
        // The orders are kept whole.
        let bob = ledger.id("Bob").unwrap();
        assert_eq!(ledger.total_weight(bob), 3.0);
        assert_eq!(
            ledger.wallets(bob)[0].order,
            vec![bob, zoe, ledger.id("Alice").unwrap()]
        );
        assert_eq!(ledger.wallets(bob)[1].order, vec![bob, ledger.id("Alice").unwrap()]);
    }

    #[test]
    fn seed_merges_identical_ballots() {
        let ledger = VoteLedger::seed(&[
            ballot(1.0, &["Alice", "Bob", "Charlie"]),
            ballot(1.0, &["Bob", "Charlie", "Alice"]),
            ballot(1.0, &["Charlie", "Alice", "Bob"]),
            ballot(1.0, &["Alice", "Bob", "Charlie"]),
        ]);
        let snap = ledger.snapshot();
        assert_eq!(
            snap[0],
            CandidateVoteSummary {
                candidate: "Alice".to_string(),
                total_votes: 2.0,
                total_wallets: 1
            }
        );
        assert_eq!(snap[1].total_wallets, 1);
        assert_eq!(snap[2].total_wallets, 1);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let ledger = VoteLedger::seed(&[ballot(1.5, &["A", "B"]), ballot(2.0, &["B"])]);
        assert_eq!(ledger.snapshot(), ledger.snapshot());
    }

    #[test]
    fn removed_candidates_are_skipped() {
        let mut ledger = VoteLedger::seed(&[
            ballot(1.0, &["A", "B"]),
            ballot(2.0, &["B"]),
            ballot(3.0, &["C", "A"]),
        ]);
        let a = ledger.id("A").unwrap();
        let wallets = ledger.remove_candidate(a, Status::Eliminated);
        assert_eq!(wallets.len(), 1);
        assert_eq!(ledger.status(a), Status::Eliminated);
        assert_eq!(ledger.total_weight(a), 0.0);
        assert_eq!(names(&ledger.snapshot()), vec!["B".to_string(), "C".to_string()]);
        let tally: Vec<CandidateId> = ledger.tally().iter().map(|p| p.0).collect();
        assert_eq!(tally, vec![ledger.id("B").unwrap(), ledger.id("C").unwrap()]);
    }

    #[test]
    fn merges_only_identical_effective_orders() {
        let mut ledger = VoteLedger::seed(&[
            ballot(1.0, &["A", "B", "C"]),
            ballot(1.0, &["B", "A"]),
            ballot(1.0, &["C", "A"]),
        ]);
        let (a, b, c) = (
            ledger.id("A").unwrap(),
            ledger.id("B").unwrap(),
            ledger.id("C").unwrap(),
        );
        // [A, C] differs from [A, B, C] while B is running.
        ledger.receive_wallet(
            a,
            Wallet {
                weight: 0.5,
                order: vec![a, c],
            },
        );
        assert_eq!(ledger.wallets(a).len(), 2);

        ledger.remove_candidate(b, Status::Elected);
        // Now [A, B, C] and [A, C] read the same, and so does the new wallet.
        ledger.receive_wallet(
            a,
            Wallet {
                weight: 0.25,
                order: vec![b, a, c],
            },
        );
        assert_eq!(ledger.wallets(a).len(), 2);
        assert_eq!(ledger.wallets(a)[0].weight, 1.25);
        assert_eq!(ledger.total_weight(a), 1.75);
    }

    #[test]
    fn wallets_for_resolved_candidates_are_exhausted() {
        let mut ledger = VoteLedger::seed(&[ballot(1.0, &["A"]), ballot(2.0, &["B"])]);
        let a = ledger.id("A").unwrap();
        ledger.remove_candidate(a, Status::Eliminated);
        ledger.receive_wallet(
            a,
            Wallet {
                weight: 2.0,
                order: vec![a],
            },
        );
        assert_eq!(ledger.exhausted(), 2.0);
        assert_eq!(ledger.snapshot().len(), 1);
    }

    #[test]
    fn merges_after_a_lower_choice_is_resolved() {
        let mut ledger = VoteLedger::seed(&[
            ballot(1.0, &["A", "B", "C"]),
            ballot(1.0, &["A", "C", "B"]),
            ballot(1.0, &["B"]),
            ballot(1.0, &["C"]),
        ]);
        let (a, b, c) = (
            ledger.id("A").unwrap(),
            ledger.id("B").unwrap(),
            ledger.id("C").unwrap(),
        );
        assert_eq!(ledger.wallets(a).len(), 2);
        ledger.remove_candidate(c, Status::Eliminated);
        // Both wallets of A now read [A, B]: a new one joins the first.
        ledger.receive_wallet(
            a,
            Wallet {
                weight: 0.5,
                order: vec![a, b],
            },
        );
        assert_eq!(ledger.wallets(a).len(), 2);
        assert_eq!(ledger.wallets(a)[0].weight, 1.5);
        assert_eq!(ledger.wallets(a)[1].weight, 1.0);
        // [A] alone is still a different order.
        ledger.receive_wallet(
            a,
            Wallet {
                weight: 0.25,
                order: vec![a],
            },
        );
        assert_eq!(ledger.wallets(a).len(), 3);
        assert_eq!(ledger.total_weight(a), 2.75);
    }

    #[test]
    #[should_panic]
    fn candidates_are_resolved_once() {
        let mut ledger = VoteLedger::seed(&[ballot(1.0, &["A"]), ballot(2.0, &["B"])]);
        let a = ledger.id("A").unwrap();
        ledger.remove_candidate(a, Status::Eliminated);
        ledger.remove_candidate(a, Status::Elected);
    }
}
