// Primitives for reading CSV files.

use std::io::Read;

use crate::stv::{io_common::make_default_id, *};

pub fn read_csv_ranking(path: &str, cfs: &FileSource) -> TallyResult<Vec<ParsedBallot>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_csv_records(rdr, cfs, make_default_id(path))
}

pub(crate) fn read_csv_records<R: Read>(
    rdr: csv::Reader<R>,
    cfs: &FileSource,
    default_id: impl Fn(usize) -> String,
) -> TallyResult<Vec<ParsedBallot>> {
    let id_idx_o = cfs.id_column_index_int()?;
    let weight_idx_o = cfs.weight_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let row_offset = cfs.skipped_rows()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    // The line numbers start at 1 to respect most conventions in the spreadsheet world.
    for (idx, line_r) in rdr.into_records().enumerate().skip(row_offset) {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_records: {:?} {:?}", lineno, line);

        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string()
        } else {
            default_id(lineno)
        };

        let weight: Option<f64> = if let Some(weight_idx) = weight_idx_o {
            let cell = line
                .get(weight_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .trim();
            let w = cell.parse::<f64>().ok().context(InvalidWeightSnafu {
                lineno,
                value: cell,
            })?;
            Some(w)
        } else {
            None
        };

        // The id and weight columns are never choices.
        let choices: Vec<String> = line
            .iter()
            .enumerate()
            .skip(choices_start_col)
            .filter(|(col, _)| Some(*col) != id_idx_o && Some(*col) != weight_idx_o)
            .map(|(_, s)| s.to_string())
            .collect();

        res.push(ParsedBallot {
            id: Some(id),
            weight,
            choices,
        });
    }
    Ok(res)
}
