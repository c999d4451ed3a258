use log::debug;

use crate::ledger::{CandidateId, VoteLedger, Wallet};

#[derive(PartialEq, Debug, Clone, Copy)]
pub(crate) enum TransferMode {
    /// Surplus transfer of an elected candidate: every wallet moves at a
    /// fraction of its weight.
    Scaled(f64),
    /// Transfer of an eliminated candidate, at full weight.
    Full,
}

impl TransferMode {
    fn ratio(&self) -> f64 {
        match self {
            TransferMode::Scaled(r) => *r,
            TransferMode::Full => 1.0,
        }
    }
}

/// What happened to the wallets of a resolved candidate.
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct TransferStats {
    /// Weight received by each candidate, in canonical order.
    pub(crate) transfers: Vec<(CandidateId, f64)>,
    pub(crate) exhausted: f64,
}

/// Moves the wallets of a candidate that just got resolved to the next
/// running candidate of each wallet.
///
/// The candidate must already be removed from the ledger.
pub(crate) fn transfer(
    resolved: CandidateId,
    wallets: Vec<Wallet>,
    mode: TransferMode,
    ledger: &mut VoteLedger,
) -> TransferStats {
    let ratio = mode.ratio();
    let mut stats = TransferStats {
        transfers: Vec::new(),
        exhausted: 0.0,
    };
    for wallet in wallets {
        let weight = wallet.weight * ratio;
        // Nothing to move (candidate elected right at the quota).
        if weight <= 0.0 {
            continue;
        }
        let next = wallet
            .order
            .iter()
            .position(|cid| *cid != resolved && ledger.is_active(*cid));
        match next {
            Some(idx) => {
                let recipient = wallet.order[idx];
                match stats.transfers.iter_mut().find(|(cid, _)| *cid == recipient) {
                    Some((_, w)) => *w += weight,
                    None => stats.transfers.push((recipient, weight)),
                }
                ledger.receive_wallet(
                    recipient,
                    Wallet {
                        weight,
                        order: wallet.order[idx..].to_vec(),
                    },
                );
            }
            None => {
                // Ballot exhausted.
                stats.exhausted += weight;
                ledger.discard(weight);
            }
        }
    }
    stats.transfers.sort_by_key(|(cid, _)| *cid);
    debug!(
        "transfer: {} ({:?}): {:?}",
        ledger.name(resolved),
        mode,
        stats
    );
    stats
}
