// Reads ballots written as a JSON list.

use crate::stv::{io_common::make_default_id, *};

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonBallot {
    id: Option<String>,
    weight: Option<f64>,
    candidates: Vec<String>,
}

pub fn read_json_ranking(path: &str, _cfs: &FileSource) -> TallyResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_json_ballots(&contents, make_default_id(path))
}

pub(crate) fn parse_json_ballots(
    contents: &str,
    default_id: impl Fn(usize) -> String,
) -> TallyResult<Vec<ParsedBallot>> {
    let ballots: Vec<JsonBallot> = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    debug!("parse_json_ballots: {} ballots", ballots.len());
    Ok(ballots
        .into_iter()
        .enumerate()
        .map(|(idx, jb)| ParsedBallot {
            id: Some(jb.id.unwrap_or_else(|| default_id(idx + 1))),
            weight: jb.weight,
            choices: jb.candidates,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_id(idx: usize) -> String {
        format!("#{}", idx)
    }

    #[test]
    fn reads_ballots() {
        let res = parse_json_ballots(
            r#"[
                {"weight": 2.5, "candidates": ["Alice", "Bob"]},
                {"id": "b2", "candidates": ["Bob"]}
            ]"#,
            default_id,
        )
        .unwrap();
        assert_eq!(
            res,
            vec![
                ParsedBallot {
                    id: Some("#1".to_string()),
                    weight: Some(2.5),
                    choices: vec!["Alice".to_string(), "Bob".to_string()],
                },
                ParsedBallot {
                    id: Some("b2".to_string()),
                    weight: None,
                    choices: vec!["Bob".to_string()],
                },
            ]
        );
    }

    #[test]
    fn rejects_malformed_ballots() {
        let res = parse_json_ballots(r#"[{"weight": 1}]"#, default_id);
        assert!(matches!(res, Err(StvError::ParsingJson { .. })));
        let res = parse_json_ballots(r#"{"candidates": []}"#, default_id);
        assert!(matches!(res, Err(StvError::ParsingJson { .. })));
    }
}
