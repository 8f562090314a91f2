//! Output files written after a run
//!
//! - Returns file: one training-episode return per line
//! - Trajectory file: tab-separated evaluation history
//! - Run summary: pretty-printed JSON of any serializable report

mod returns;
mod trajectory;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

pub use returns::{save_returns, write_returns};
pub use trajectory::{save_trajectory, write_trajectory};

use crate::{Error, Result};

/// Create `path` for writing, naming the file in the error.
pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::io(format!("create {}", path.display()), source))
}

/// Write `value` as pretty-printed JSON to `path`.
pub fn save_json_summary<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(|source| Error::io(format!("write {}", path.display()), source))?;
    writer
        .flush()
        .map_err(|source| Error::io(format!("flush {}", path.display()), source))
}
