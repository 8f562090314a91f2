//! Per-episode returns, one `{:.15}` value per line

use std::{io::Write, path::Path};

use crate::{Error, Result};

/// Write one line per return.
pub fn write_returns<W: Write>(writer: &mut W, returns: &[f64]) -> Result<()> {
    for value in returns {
        writeln!(writer, "{value:.15}")?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write `returns` to it.
pub fn save_returns(returns: &[f64], path: &Path) -> Result<()> {
    let mut writer = super::create_file(path)?;
    write_returns(&mut writer, returns)
        .and_then(|()| writer.flush().map_err(Error::from))
        .map_err(|e| match e {
            Error::Io { source, .. } => Error::io(format!("write {}", path.display()), source),
            other => other,
        })
}
