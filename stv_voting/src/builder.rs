pub use crate::config::*;

/// A builder for adding ballots one at a time.
///
/// Ballots are checked as they are added, so that a faulty ballot is reported
/// with its position.
///
/// ```
/// pub use stv_voting::builder::Builder;
/// # use stv_voting::VotingErrors;
///
/// let mut builder = Builder::new(2)?;
///
/// builder.add_ballot_simple(&["Anna".to_string(), "Clara".to_string()])?;
/// builder.add_ballot(2.5, &["Bob".to_string()])?;
/// builder.add_ballot(1.0, &["Clara".to_string(), "".to_string(), "Bob".to_string()])?;
///
/// let outcome = builder.compute()?;
/// assert_eq!(outcome.winners, vec!["Bob".to_string(), "Clara".to_string()]);
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _seats: u32,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(seats: u32) -> Result<Builder, VotingErrors> {
        if seats == 0 {
            return Err(InputViolation::NoSeats.into());
        }
        Ok(Builder {
            _seats: seats,
            _ballots: Vec::new(),
        })
    }

    /// Adds a ballot with a weight of 1.
    pub fn add_ballot_simple(&mut self, candidates: &[String]) -> Result<(), VotingErrors> {
        self.add_ballot(1.0, candidates)
    }

    /// Adds a weighted ballot.
    ///
    /// candidates: the choices made by the voter, in order. Blank choices are
    /// skipped. The remaining choices must be distinct and there must be at
    /// least one.
    pub fn add_ballot(&mut self, weight: f64, candidates: &[String]) -> Result<(), VotingErrors> {
        let names: Vec<String> = candidates
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        self.add_ballot_2(Ballot {
            candidates: names,
            weight,
        })
    }

    pub fn add_ballot_2(&mut self, ballot: Ballot) -> Result<(), VotingErrors> {
        let idx = self._ballots.len();
        self._ballots.push(ballot);
        // Only check the new ballot, and report it with its position.
        if let Err(v) = crate::quota::check_ballots(&self._ballots[idx..], self._seats) {
            self._ballots.pop();
            return Err(match v {
                InputViolation::InvalidWeight { .. } => InputViolation::InvalidWeight { ballot: idx },
                InputViolation::EmptyBallot { .. } => InputViolation::EmptyBallot { ballot: idx },
                InputViolation::DuplicateCandidate { candidate, .. } => {
                    InputViolation::DuplicateCandidate {
                        ballot: idx,
                        candidate,
                    }
                }
                x => x,
            }
            .into());
        }
        Ok(())
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self._ballots
    }

    pub fn compute(&self) -> Result<ElectionOutcome, VotingErrors> {
        crate::compute(&self._ballots, self._seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_no_seats() {
        assert!(matches!(
            Builder::new(0),
            Err(VotingErrors::InvalidInput(InputViolation::NoSeats))
        ));
    }

    #[test]
    fn reports_the_position_of_bad_ballots() {
        let mut b = Builder::new(1).unwrap();
        b.add_ballot_simple(&strings(&["A", "B"])).unwrap();
        assert_eq!(
            b.add_ballot(1.0, &strings(&["B", "", "B"])),
            Err(VotingErrors::InvalidInput(
                InputViolation::DuplicateCandidate {
                    ballot: 1,
                    candidate: "B".to_string()
                }
            ))
        );
        assert_eq!(
            b.add_ballot(0.0, &strings(&["B"])),
            Err(VotingErrors::InvalidInput(InputViolation::InvalidWeight {
                ballot: 1
            }))
        );
        assert_eq!(
            b.add_ballot(1.0, &strings(&["", " "])),
            Err(VotingErrors::InvalidInput(InputViolation::EmptyBallot {
                ballot: 1
            }))
        );
        // Rejected ballots are not kept.
        assert_eq!(b.ballots().len(), 1);
    }

    #[test]
    fn computes_the_outcome() {
        let mut b = Builder::new(1).unwrap();
        b.add_ballot(3.0, &strings(&["A", "B"])).unwrap();
        b.add_ballot(1.0, &strings(&["B", "A"])).unwrap();
        let res = b.compute().unwrap();
        assert_eq!(res.winners, strings(&["A"]));
        assert_eq!(res.quota, 2.0);
    }

    #[test]
    fn empty_builder_is_an_empty_election() {
        let b = Builder::new(3).unwrap();
        assert_eq!(
            b.compute(),
            Err(VotingErrors::InvalidInput(InputViolation::EmptyElection))
        );
    }
}
