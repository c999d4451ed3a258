use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use stv_voting::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::stv::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;

#[derive(Debug, Snafu)]
pub enum StvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read an index from {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: {value:?} is not a weight"))]
    InvalidWeight { lineno: usize, value: String },
    #[snafu(display("Error accessing {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error during the count: {source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, StvError>;

/// A ballot, as parsed by the readers.
/// This is before dropping the blank choices and applying the default weight.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub weight: Option<f64>,
    pub choices: Vec<String>,
}

// Vote totals are written with a fixed number of decimals, so that a summary
// reads back to the same values.
fn round_votes(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

fn distribution_to_json(distribution: &[CandidateVoteSummary]) -> JSValue {
    let l: Vec<JSValue> = distribution
        .iter()
        .map(|s| {
            json!({
                "candidate": s.candidate,
                "totalVotes": round_votes(s.total_votes),
                "totalWallets": s.total_wallets,
            })
        })
        .collect();
    JSValue::Array(l)
}

fn result_logs_to_json(logs: &[LogEvent]) -> Vec<JSValue> {
    logs.iter()
        .map(|e| match e {
            LogEvent::QuotaSet(quota) => json!({
                "type": "quotaSet",
                "quota": round_votes(*quota),
            }),
            LogEvent::Distribution(d) => json!({
                "type": "distribution",
                "distribution": distribution_to_json(d),
            }),
            LogEvent::AboveQuota(candidate) => json!({
                "type": "aboveQuota",
                "candidate": candidate,
            }),
            LogEvent::Elected {
                candidate,
                distribution,
            } => json!({
                "type": "elected",
                "candidate": candidate,
                "distribution": distribution_to_json(distribution),
            }),
            LogEvent::Eliminated {
                candidate,
                distribution,
            } => json!({
                "type": "eliminated",
                "candidate": candidate,
                "distribution": distribution_to_json(distribution),
            }),
        })
        .collect()
}

fn build_summary_js(config: &StvConfig, outcome: &ElectionOutcome) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
        office: config.output_settings.contest_office.clone(),
        seats: config.rules.number_of_winners,
        quota: round_votes(outcome.quota),
    };
    json!({
        "config": c,
        "winners": outcome.winners,
        "exhausted": round_votes(outcome.exhausted),
        "results": result_logs_to_json(&outcome.logs),
    })
}

// Drops the blank choices and the ballots left without any choice.
// The other names are kept exactly as written.
fn validate_ballots(parsed_ballots: &[ParsedBallot]) -> Vec<Ballot> {
    let mut res: Vec<Ballot> = Vec::new();
    for pb in parsed_ballots.iter() {
        let candidates: Vec<String> = pb
            .choices
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        debug!("Choices for ballot {:?}: {:?}", pb.id, candidates);

        if candidates.is_empty() {
            warn!("validate_ballots: ballot {:?} has no choice, skipping", pb.id);
            continue;
        }
        // Default of 1 if not specified
        let weight = pb.weight.unwrap_or(1.0);
        res.push(Ballot { candidates, weight });
    }
    res
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> TallyResult<Vec<Ballot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    let parsed_ballots = match cfs.provider.as_str() {
        "json" => io_json::read_json_ranking(&p2, cfs),
        "csv" => io_csv::read_csv_ranking(&p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }?;
    Ok(validate_ballots(&parsed_ballots))
}

fn input_provider(input_type: &Option<String>, path: &str) -> String {
    match input_type {
        Some(x) => x.clone(),
        None if path.to_lowercase().ends_with(".csv") => "csv".to_string(),
        None => "json".to_string(),
    }
}

fn default_config(input: &str, input_type: &Option<String>) -> StvConfig {
    StvConfig {
        output_settings: OutputSettings {
            contest_name: io_common::simplify_file_name(input),
            output_directory: None,
            contest_date: None,
            contest_jurisdiction: None,
            contest_office: None,
        },
        cvr_file_sources: vec![FileSource::from_path(
            &input_provider(input_type, input),
            input,
        )],
        rules: StvRules {
            number_of_winners: 1,
            rules_description: None,
        },
    }
}

/// The configuration of the election, and the directory its paths are relative to.
fn make_config(args: &Args) -> TallyResult<(StvConfig, PathBuf)> {
    let (mut config, root_p) = match (&args.config, &args.input) {
        (Some(config_path), input_o) => {
            let mut config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            // The input on the command line replaces the sources of the configuration.
            if let Some(input) = input_o {
                let full_path = fs::canonicalize(input).context(ReadingFileSnafu { path: input })?;
                config.cvr_file_sources = vec![FileSource::from_path(
                    &input_provider(&args.input_type, input),
                    &full_path.display().to_string(),
                )];
            }
            (config, root_p)
        }
        (None, Some(input)) => (default_config(input, &args.input_type), PathBuf::new()),
        (None, None) => whatever!("No election to tabulate: use --config or --input"),
    };
    if let Some(seats) = args.seats {
        config.rules.number_of_winners = seats;
    }
    Ok((config, root_p))
}

// None means the standard output.
fn summary_destination(args: &Args, config: &StvConfig, root_p: &Path) -> Option<PathBuf> {
    match (&args.out, &config.output_settings.output_directory) {
        (Some(out), _) if out == "stdout" => None,
        (Some(out), _) => Some(PathBuf::from(out)),
        (None, Some(dir)) => Some(root_p.join(dir).join("summary.json")),
        (None, None) => None,
    }
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> TallyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_election(args: &Args) -> TallyResult<()> {
    let (config, root_p) = make_config(args)?;
    info!("config: {:?}", config);

    if config.cvr_file_sources.is_empty() {
        whatever!("No file source in the configuration");
    }

    let mut data: Vec<Ballot> = Vec::new();
    for cfs in config.cvr_file_sources.iter() {
        let mut file_data = read_ranking_data(&root_p, cfs)?;
        data.append(&mut file_data);
    }
    info!("Read {} ballots", data.len());

    let outcome = compute(&data, config.rules.number_of_winners).context(VotingSnafu {})?;
    info!("Winners: {:?}", outcome.winners);
    if outcome.winners.len() > config.rules.number_of_winners as usize {
        warn!(
            "{} winners for {} seats: several candidates reached the quota in the same round",
            outcome.winners.len(),
            config.rules.number_of_winners
        );
    }

    // Assemble the final json
    let result_js = build_summary_js(&config, &outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match summary_destination(args, &config, &root_p) {
        Some(out_p) => {
            let path = out_p.display().to_string();
            if let Some(parent) = out_p.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).context(WritingOutputSnafu { path: &path })?;
                }
            }
            fs::write(&out_p, &pretty_js_stats).context(WritingOutputSnafu { path: &path })?;
            info!("Summary written to {}", path);
        }
        None => println!("{}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_reference(summary_p, &pretty_js_stats)?;
    }

    Ok(())
}
