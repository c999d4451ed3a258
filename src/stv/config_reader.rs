use crate::stv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The header of the summary file.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub seats: u32,
    pub quota: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    pub _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    pub _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "weightColumnIndex")]
    pub weight_column_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
}

impl FileSource {
    /// A source with all the default settings.
    pub fn from_path(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            weight_column_index: None,
            id_column_index: None,
        }
    }

    /// The first column with a choice (0-based).
    pub fn first_vote_column_index(&self) -> TallyResult<usize> {
        match &self._first_vote_column_index {
            None => Ok(0),
            x => Ok(read_js_int(x)? - 1),
        }
    }

    /// The number of rows to skip before the first ballot.
    pub fn skipped_rows(&self) -> TallyResult<usize> {
        match &self._first_vote_row_index {
            None => Ok(1),
            x => Ok(read_js_int(x)? - 1),
        }
    }

    pub fn weight_column_index_int(&self) -> TallyResult<Option<usize>> {
        match &self.weight_column_index {
            None => Ok(None),
            x => read_js_int(x).map(|i| Some(i - 1)),
        }
    }

    pub fn id_column_index_int(&self) -> TallyResult<Option<usize>> {
        match &self.id_column_index {
            None => Ok(None),
            x => read_js_int(x).map(|i| Some(i - 1)),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StvRules {
    #[serde(rename = "numberOfWinners")]
    pub number_of_winners: u32,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    pub rules: StvRules,
}

pub fn read_config(path: &str) -> TallyResult<StvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> TallyResult<StvConfig> {
    let config: StvConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> TallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Reads a 1-based index, as a number, a string or Excel-style column letters.
fn read_js_int(x: &Option<JSValue>) -> TallyResult<usize> {
    let value = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            Some(s.to_ascii_lowercase().chars().fold(0, |acc, c| {
                acc * 26 + (c as usize) - ('a' as usize) + 1
            }))
        }
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match value {
        Some(i) if i >= 1 => Ok(i),
        _ => ParsingJsonNumberSnafu {
            value: format!("{:?}", x),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_full_config() {
        let config = parse_config(
            r#"{
                "outputSettings": {
                    "contestName": "Board",
                    "contestDate": "2022-10-01",
                    "outputDirectory": "out"
                },
                "cvrFileSources": [
                    {
                        "provider": "csv",
                        "filePath": "ballots.csv",
                        "firstVoteColumnIndex": "B",
                        "firstVoteRowIndex": 3,
                        "weightColumnIndex": "1"
                    }
                ],
                "rules": { "numberOfWinners": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.output_settings.contest_name, "Board");
        assert_eq!(config.output_settings.contest_office, None);
        assert_eq!(config.rules.number_of_winners, 3);
        let cfs = &config.cvr_file_sources[0];
        assert_eq!(cfs.first_vote_column_index().unwrap(), 1);
        assert_eq!(cfs.skipped_rows().unwrap(), 2);
        assert_eq!(cfs.weight_column_index_int().unwrap(), Some(0));
        assert_eq!(cfs.id_column_index_int().unwrap(), None);
    }

    #[test]
    fn rejects_a_config_without_rules() {
        let res = parse_config(
            r#"{"outputSettings": {"contestName": "x"}, "cvrFileSources": []}"#,
        );
        assert!(matches!(res, Err(StvError::ParsingJson { .. })));
    }

    #[test]
    fn defaults_of_a_file_source() {
        let cfs = FileSource::from_path("csv", "a.csv");
        assert_eq!(cfs.first_vote_column_index().unwrap(), 0);
        assert_eq!(cfs.skipped_rows().unwrap(), 1);
        assert_eq!(cfs.weight_column_index_int().unwrap(), None);
    }

    #[test]
    fn reads_indexes() {
        assert_eq!(read_js_int(&Some(json!(4))).unwrap(), 4);
        assert_eq!(read_js_int(&Some(json!("12"))).unwrap(), 12);
        assert_eq!(read_js_int(&Some(json!("a"))).unwrap(), 1);
        assert_eq!(read_js_int(&Some(json!("C"))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("AA"))).unwrap(), 27);
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(read_js_int(&Some(json!(-2))).is_err());
        assert!(read_js_int(&Some(json!(true))).is_err());
        assert!(read_js_int(&None).is_err());
    }
}
