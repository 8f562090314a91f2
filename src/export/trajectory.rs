//! Evaluation trajectory as tab-separated values
//!
//! Columns: action, reward (15 decimals), state, info. No header row. The
//! info column is written verbatim; it may hold commas.

use std::{io::Write, path::Path};

use csv::{QuoteStyle, WriterBuilder};

use crate::{Error, Result, pipeline::History};

/// Write one row per history record.
pub fn write_trajectory<W: Write>(writer: W, history: &History) -> Result<()> {
    let mut tsv = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    for record in history {
        tsv.write_record([
            record.action.to_string(),
            format!("{:.15}", record.reward),
            record.state.to_string(),
            record.info.clone(),
        ])?;
    }
    tsv.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `history` to it.
pub fn save_trajectory(history: &History, path: &Path) -> Result<()> {
    let writer = super::create_file(path)?;
    write_trajectory(writer, history).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(format!("write {}", path.display()), source),
        other => other,
    })
}
