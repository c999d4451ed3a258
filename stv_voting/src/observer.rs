use crate::config::{CandidateVoteSummary, LogEvent};

/// Receives every state change of a count, in order.
///
/// The engine calls the observer synchronously; an observer cannot influence
/// the outcome of the count.
pub trait Observer {
    fn on_quota_set(&mut self, quota: f64);
    fn on_distribution_snapshot(&mut self, distribution: Vec<CandidateVoteSummary>);
    fn on_above_quota(&mut self, candidate: &str);
    fn on_elected(&mut self, candidate: &str, distribution: Vec<CandidateVoteSummary>);
    fn on_eliminated(&mut self, candidate: &str, distribution: Vec<CandidateVoteSummary>);
}

/// An observer that keeps all the events.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct EventLog {
    logs: Vec<LogEvent>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog { logs: Vec::new() }
    }

    pub fn logs(&self) -> &[LogEvent] {
        &self.logs
    }

    pub fn into_logs(self) -> Vec<LogEvent> {
        self.logs
    }
}

impl Observer for EventLog {
    fn on_quota_set(&mut self, quota: f64) {
        self.logs.push(LogEvent::QuotaSet(quota));
    }

    fn on_distribution_snapshot(&mut self, distribution: Vec<CandidateVoteSummary>) {
        self.logs.push(LogEvent::Distribution(distribution));
    }

    fn on_above_quota(&mut self, candidate: &str) {
        self.logs.push(LogEvent::AboveQuota(candidate.to_string()));
    }

    fn on_elected(&mut self, candidate: &str, distribution: Vec<CandidateVoteSummary>) {
        self.logs.push(LogEvent::Elected {
            candidate: candidate.to_string(),
            distribution,
        });
    }

    fn on_eliminated(&mut self, candidate: &str, distribution: Vec<CandidateVoteSummary>) {
        self.logs.push(LogEvent::Eliminated {
            candidate: candidate.to_string(),
            distribution,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert!(EventLog::new().logs().is_empty());
    }

    #[test]
    fn keeps_events_in_call_order() {
        let mut log = EventLog::new();
        let dist = vec![CandidateVoteSummary {
            candidate: "Alice".to_string(),
            total_votes: 20.0,
            total_wallets: 2,
        }];
        log.on_quota_set(3.0);
        log.on_above_quota("Alice");
        log.on_elected("Alice", dist.clone());
        log.on_eliminated("Bob", vec![]);
        assert_eq!(
            log.into_logs(),
            vec![
                LogEvent::QuotaSet(3.0),
                LogEvent::AboveQuota("Alice".to_string()),
                LogEvent::Elected {
                    candidate: "Alice".to_string(),
                    distribution: dist
                },
                LogEvent::Eliminated {
                    candidate: "Bob".to_string(),
                    distribution: vec![]
                },
            ]
        );
    }
}
