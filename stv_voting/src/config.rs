// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A weighted, ranked ballot.
///
/// The weight is usually the number of voters who cast this exact ranking,
/// but any strictly positive real number is accepted.
#[derive(PartialEq, Debug, Clone)]
pub struct Ballot {
    /// The candidates, most preferred first. They must be distinct.
    pub candidates: Vec<String>,
    pub weight: f64,
}

impl Ballot {
    pub fn new(weight: f64, candidates: &[String]) -> Ballot {
        Ballot {
            candidates: candidates.to_vec(),
            weight,
        }
    }
}

// ******** Output data structures *********

/// The state of one candidate at some point of the count.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateVoteSummary {
    pub candidate: String,
    pub total_votes: f64,
    pub total_wallets: usize,
}

/// One entry of the audit trail, in the order the count produced it.
#[derive(PartialEq, Debug, Clone)]
pub enum LogEvent {
    QuotaSet(f64),
    Distribution(Vec<CandidateVoteSummary>),
    AboveQuota(String),
    /// The distribution is taken after the surplus of the candidate was transferred.
    Elected {
        candidate: String,
        distribution: Vec<CandidateVoteSummary>,
    },
    /// The distribution is taken after the votes of the candidate were transferred.
    Eliminated {
        candidate: String,
        distribution: Vec<CandidateVoteSummary>,
    },
}

/// The result of a count whose events were sent to an external observer.
#[derive(PartialEq, Debug, Clone)]
pub struct StvResult {
    /// In the order of election. It may hold more names than seats when
    /// several candidates reach the quota in the same round.
    pub winners: Vec<String>,
    pub quota: f64,
    /// The weight of the ballots that ran out of continuing candidates.
    pub exhausted: f64,
}

/// The result of a count, with its full event log.
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionOutcome {
    pub winners: Vec<String>,
    pub quota: f64,
    pub exhausted: f64,
    pub logs: Vec<LogEvent>,
}

/// The precondition that an input failed.
#[derive(PartialEq, Debug, Clone)]
pub enum InputViolation {
    NoSeats,
    EmptyElection,
    /// The weight is zero, negative or not a finite number.
    InvalidWeight { ballot: usize },
    EmptyBallot { ballot: usize },
    DuplicateCandidate { ballot: usize, candidate: String },
}

impl Display for InputViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputViolation::NoSeats => write!(f, "the number of seats must be positive"),
            InputViolation::EmptyElection => write!(f, "no ballot was provided"),
            InputViolation::InvalidWeight { ballot } => {
                write!(f, "ballot #{} has a weight that is not positive", ballot)
            }
            InputViolation::EmptyBallot { ballot } => {
                write!(f, "ballot #{} does not rank any candidate", ballot)
            }
            InputViolation::DuplicateCandidate { ballot, candidate } => {
                write!(f, "ballot #{} ranks {} more than once", ballot, candidate)
            }
        }
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(PartialEq, Debug, Clone)]
pub enum VotingErrors {
    InvalidInput(InputViolation),
    /// The round loop did not terminate within the number of candidates.
    NoConvergence,
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidInput(v) => write!(f, "Invalid input in stv_voting: {}", v),
            VotingErrors::NoConvergence => write!(f, "VotingError in stv_voting: no convergence"),
        }
    }
}

impl From<InputViolation> for VotingErrors {
    fn from(v: InputViolation) -> Self {
        VotingErrors::InvalidInput(v)
    }
}
