//! Results serialization (§4.12, §6): writes the `{ standings, players,
//! awards, finals_mvp }` shape produced by a completed season.

use std::path::Path;

use crate::awards::SeasonReportOutput;
use crate::error::Result;

/// Write a completed season's report to `path` as pretty-printed JSON.
pub fn write_results(path: impl AsRef<Path>, report: &SeasonReportOutput) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_back() {
        let report = SeasonReportOutput::default();
        let file = tempfile::NamedTempFile::new().unwrap();
        write_results(file.path(), &report).unwrap();
        let bytes = std::fs::read(file.path()).unwrap();
        let parsed: SeasonReportOutput = serde_json::from_slice(&bytes).unwrap();
        assert!(parsed.standings.is_empty());
    }
}
